use std::fs;
use std::io;
use std::path::Path;

use crate::sorting::domain::file_mover::FileMover;

/// Moves files with `rename`, falling back to copy + delete when the rename
/// crosses filesystems.
pub struct FsFileMover;

impl FileMover for FsFileMover {
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                if !from.is_file() {
                    return Err(rename_err);
                }
                log::debug!(
                    "rename {} -> {} failed ({rename_err}); copying instead",
                    from.display(),
                    to.display()
                );
                fs::copy(from, to)?;
                fs::remove_file(from)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_relocates_file() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.jpg");
        let to = dir.path().join("sub").join("a.jpg");
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(&from, b"pixels").unwrap();

        FsFileMover.move_file(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"pixels");
        assert!(!FsFileMover.is_dry_run());
    }

    #[test]
    fn test_move_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = FsFileMover.move_file(&dir.path().join("gone.jpg"), &dir.path().join("x.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn test_move_into_missing_directory_fails_and_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.jpg");
        fs::write(&from, b"pixels").unwrap();
        let result = FsFileMover.move_file(&from, &dir.path().join("nope").join("a.jpg"));
        assert!(result.is_err());
        assert!(from.exists());
    }
}
