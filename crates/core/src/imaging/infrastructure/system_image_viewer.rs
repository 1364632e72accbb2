use std::path::Path;

use crate::imaging::domain::image_viewer::ImageViewer;

/// Opens images with the platform's default viewer application.
pub struct SystemImageViewer;

impl ImageViewer for SystemImageViewer {
    fn show(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        open::that_detached(path)?;
        Ok(())
    }
}
