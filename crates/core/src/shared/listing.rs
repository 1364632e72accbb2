//! Sorted, non-recursive directory listings.
//!
//! Entries whose names are not valid UTF-8 are skipped.

use std::fs;
use std::io;
use std::path::Path;

/// Names of the immediate subdirectories of `dir`, sorted.
pub fn list_subdirectories(dir: &Path) -> io::Result<Vec<String>> {
    list_names(dir, |path| path.is_dir())
}

/// Names of regular files in `dir` ending with `suffix`, sorted.
///
/// The suffix comparison is case-sensitive.
pub fn list_files_with_suffix(dir: &Path, suffix: &str) -> io::Result<Vec<String>> {
    let mut names = list_names(dir, |path| path.is_file())?;
    names.retain(|name| name.ends_with(suffix));
    Ok(names)
}

fn list_names(dir: &Path, keep: impl Fn(&Path) -> bool) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !keep(&path) {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => log::debug!("Skipping non UTF-8 entry {raw:?} in {}", dir.display()),
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("b_swing")).unwrap();
        fs::create_dir(dir.path().join("a_swing")).unwrap();
        fs::create_dir(dir.path().join("folder.jpg")).unwrap();
        fs::write(dir.path().join("2.jpg"), b"").unwrap();
        fs::write(dir.path().join("1.jpg"), b"").unwrap();
        fs::write(dir.path().join("3.JPG"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        dir
    }

    #[test]
    fn test_subdirectories_sorted() {
        let dir = fixture();
        assert_eq!(
            list_subdirectories(dir.path()).unwrap(),
            vec!["a_swing", "b_swing", "folder.jpg"]
        );
    }

    #[test]
    fn test_files_filtered_by_suffix_and_sorted() {
        let dir = fixture();
        assert_eq!(
            list_files_with_suffix(dir.path(), ".jpg").unwrap(),
            vec!["1.jpg", "2.jpg"]
        );
    }

    #[test]
    fn test_missing_directory_is_error() {
        assert!(list_subdirectories(Path::new("/nonexistent/dir")).is_err());
    }
}
