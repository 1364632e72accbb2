use crate::pose::domain::pose_result::PoseResult;
use crate::shared::frame::Frame;

/// Renders a pose result onto a background image.
pub trait PoseVisualizer: Send {
    /// Returns a new frame; `background` is left untouched.
    fn draw(
        &self,
        background: &Frame,
        result: &PoseResult,
    ) -> Result<Frame, Box<dyn std::error::Error>>;
}
