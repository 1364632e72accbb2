use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::sorting::domain::file_mover::FileMover;

/// Records and logs moves without touching the filesystem.
#[derive(Default)]
pub struct DryRunFileMover {
    planned: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
}

impl DryRunFileMover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the recorded `(from, to)` pairs.
    pub fn planned(&self) -> Arc<Mutex<Vec<(PathBuf, PathBuf)>>> {
        Arc::clone(&self.planned)
    }
}

impl FileMover for DryRunFileMover {
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        log::info!("[dry run] {} -> {}", from.display(), to.display());
        self.planned
            .lock()
            .map_err(|_| io::Error::other("dry-run move log poisoned"))?
            .push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
