use crate::pose::domain::dataset_meta::DatasetMeta;
use crate::pose::domain::pose_result::PoseResult;
use crate::shared::frame::Frame;

/// Domain interface for single-image pose estimation.
///
/// Implementations own their model handle (session, device, weights) and are
/// injected into the pipeline, so nothing here depends on a particular runtime.
pub trait PoseEstimator: Send {
    fn estimate(&mut self, frame: &Frame) -> Result<PoseResult, Box<dyn std::error::Error>>;

    /// Keypoint layout and skeleton the model was trained on.
    fn dataset_meta(&self) -> &DatasetMeta;
}
