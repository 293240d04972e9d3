//! Atomic file writes
//!
//! Content goes to a hidden sibling file first and is then renamed over the
//! target, so a failed write never leaves a truncated manifest or lockfile.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Write `content` to `path` through a sibling temp file
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let temp = temp_path(path)?;

    if let Err(e) = fs::write(&temp, content) {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }
    if let Err(e) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }
    Ok(())
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a file path: {}", path.display()),
        )
    })?;

    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(".lockbump.tmp");
    Ok(path.with_file_name(temp_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.json");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!temp_path(&path).unwrap().exists());
    }

    #[test]
    fn test_write_atomic_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("yarn.lock");

        write_atomic(&path, "# yarn lockfile v1\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "# yarn lockfile v1\n");
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("package.json");
        assert!(write_atomic(&path, "{}").is_err());
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path(Path::new("/repo/packages/b/package.json")).unwrap();
        assert_eq!(temp, Path::new("/repo/packages/b/.package.json.lockbump.tmp"));
    }

    #[test]
    fn test_temp_path_rejects_root() {
        assert!(temp_path(Path::new("/")).is_err());
    }
}
