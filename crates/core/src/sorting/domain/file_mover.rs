use std::io;
use std::path::Path;

/// Relocates a file; the source no longer exists afterwards.
pub trait FileMover: Send {
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// True when moves are only recorded; callers then leave the target
    /// tree alone too.
    fn is_dry_run(&self) -> bool {
        false
    }
}
