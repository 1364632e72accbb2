use std::path::Path;

/// Displays a written output image to the user.
pub trait ImageViewer: Send {
    fn show(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>>;
}
