//! Source-file resolution for file-backed generators.

use crate::error::ResourceError;
use std::fs;
use std::path::{Path, PathBuf};

/// Locate a file referenced by a generation document.
///
/// Absolute paths must exist as given. Relative paths are looked up in
/// `base_dir` first, then in its parent.
pub fn locate_file(base_dir: &Path, name: &str) -> Result<PathBuf, ResourceError> {
    let not_found = || ResourceError::NotFound {
        name: name.to_string(),
        dir: base_dir.to_path_buf(),
    };

    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return if candidate.exists() {
            Ok(candidate.to_path_buf())
        } else {
            Err(not_found())
        };
    }

    let in_dir = base_dir.join(candidate);
    if in_dir.exists() {
        return Ok(in_dir);
    }

    base_dir
        .parent()
        .map(|parent| parent.join(candidate))
        .filter(|p| p.exists())
        .ok_or_else(not_found)
}

/// Read a newline-delimited file into memory, one entry per line.
///
/// A trailing newline does not produce an empty final entry; `\r\n` line
/// endings are accepted.
pub fn read_lines(path: &Path) -> Result<Vec<String>, ResourceError> {
    let content = fs::read_to_string(path).map_err(|source| ResourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locate_in_base_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("names.txt"), "a\n").unwrap();

        let found = locate_file(dir.path(), "names.txt").unwrap();
        assert_eq!(found, dir.path().join("names.txt"));
    }

    #[test]
    fn test_locate_in_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("jobs");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("names.txt"), "a\n").unwrap();

        let found = locate_file(&nested, "names.txt").unwrap();
        assert_eq!(found, dir.path().join("names.txt"));
    }

    #[test]
    fn test_locate_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abs.txt");
        fs::write(&path, "a\n").unwrap();

        let found = locate_file(Path::new("/nonexistent"), path.to_str().unwrap()).unwrap();
        assert_eq!(found, path);
    }

    #[test]
    fn test_locate_missing() {
        let dir = TempDir::new().unwrap();
        let err = locate_file(dir.path(), "nope.txt").unwrap_err();
        assert!(matches!(err, ResourceError::NotFound { .. }));
        assert!(err.to_string().contains("nope.txt"));
    }

    #[test]
    fn test_read_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lines.txt");
        fs::write(&path, "one\r\ntwo\nthree\n").unwrap();

        assert_eq!(read_lines(&path).unwrap(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_read_lines_unreadable() {
        let dir = TempDir::new().unwrap();
        let err = read_lines(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, ResourceError::Read { .. }));
    }
}
