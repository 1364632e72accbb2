use thiserror::Error;

use super::skeleton_style::SkeletonStyle;

#[derive(Error, Debug, PartialEq)]
pub enum VisualizerSettingsError {
    #[error("keypoint threshold must be between 0.0 and 1.0, got {0}")]
    KeypointThreshold(f32),
    #[error("alpha must be between 0.0 and 1.0, got {0}")]
    Alpha(f32),
    #[error("radius must be positive")]
    Radius,
    #[error("line width must be positive")]
    LineWidth,
}

/// Drawing parameters for pose overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualizerSettings {
    /// Keypoint circle radius in pixels.
    pub radius: u32,
    /// Link thickness in pixels.
    pub line_width: u32,
    /// Opacity of the overlay drawn over the background.
    pub alpha: f32,
    /// Keypoints with score at or below this are hidden, along with their links.
    pub kpt_thr: f32,
    pub skeleton_style: SkeletonStyle,
    pub draw_bbox: bool,
    pub draw_heatmap: bool,
    pub show_kpt_idx: bool,
}

impl VisualizerSettings {
    pub fn validate(&self) -> Result<(), VisualizerSettingsError> {
        if !(0.0..=1.0).contains(&self.kpt_thr) {
            return Err(VisualizerSettingsError::KeypointThreshold(self.kpt_thr));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(VisualizerSettingsError::Alpha(self.alpha));
        }
        if self.radius == 0 {
            return Err(VisualizerSettingsError::Radius);
        }
        if self.line_width == 0 {
            return Err(VisualizerSettingsError::LineWidth);
        }
        Ok(())
    }
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            radius: 3,
            line_width: 1,
            alpha: 0.8,
            kpt_thr: 0.3,
            skeleton_style: SkeletonStyle::Mmpose,
            draw_bbox: true,
            draw_heatmap: false,
            show_kpt_idx: false,
        }
    }
}
