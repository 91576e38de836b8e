//! Input validation: confirm a path names an existing regular file before any I/O.

use std::path::Path;

use tracing::warn;

/// Returns `true` only when `path` exists and is a regular file.
///
/// The probe uses `lstat` semantics, so a symlink is rejected even if it points
/// at a file. Probe errors (missing path, permission denied, I/O failure) are
/// reported as a warning and turn into `false`; nothing is propagated.
pub fn validate_path(path: &Path) -> bool {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_file() => true,
        Ok(meta) => {
            let kind = if meta.is_dir() {
                "directory"
            } else if meta.file_type().is_symlink() {
                "symlink"
            } else {
                "special file"
            };
            warn!(path = %path.display(), kind, "Path did not resolve to a regular file");
            false
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Invalid path detected");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn accepts_regular_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("input.txt");
        fs::write(&file, "A,B,C").unwrap();
        assert!(validate_path(&file));
    }

    #[test]
    fn rejects_missing_path_directory_and_empty_path() {
        let dir = tempdir().unwrap();
        assert!(!validate_path(&dir.path().join("missing.txt")));
        assert!(!validate_path(dir.path()));
        assert!(!validate_path(Path::new("")));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_symlink_even_to_a_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("real.txt");
        fs::write(&target, "data").unwrap();
        let link = dir.path().join("link.txt");
        std::os::unix::fs::symlink(&target, &link).unwrap();
        assert!(!validate_path(&link));
    }
}
