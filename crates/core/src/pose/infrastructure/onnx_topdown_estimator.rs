/// Top-down heatmap pose estimator using ONNX Runtime via `ort`.
///
/// Without a person detector the whole image is the single bounding box, so
/// each image yields exactly one pose instance.
use std::path::Path;

use crate::pose::domain::dataset_meta::DatasetMeta;
use crate::pose::domain::pose_estimator::PoseEstimator;
use crate::pose::domain::pose_result::{BoundingBox, Heatmaps, PoseInstance, PoseResult};
use crate::shared::frame::Frame;

use super::execution_provider::{execution_providers, Device};
use super::model_config::ModelConfig;
use super::topdown_codec::{decode_heatmaps, CropTransform};

/// Score assigned to the implicit full-image bounding box.
const FULL_IMAGE_BBOX_SCORE: f32 = 1.0;

pub struct OnnxTopdownEstimator {
    session: ort::session::Session,
    config: ModelConfig,
    keep_heatmaps: bool,
}

impl OnnxTopdownEstimator {
    /// Load an exported top-down heatmap model (`[1, 3, H, W]` in,
    /// `[1, K, h, w]` out).
    ///
    /// `keep_heatmaps` attaches the raw heatmaps to every result so they can
    /// be drawn.
    pub fn new(
        model_path: &Path,
        config: ModelConfig,
        device: Device,
        keep_heatmaps: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_execution_providers(execution_providers(device))?
            .commit_from_file(model_path)?;

        log::info!(
            "Loaded pose model {} ({}x{} input, {} keypoints) on {device}",
            model_path.display(),
            config.input_width(),
            config.input_height(),
            config.dataset.num_keypoints()
        );

        Ok(Self {
            session,
            config,
            keep_heatmaps,
        })
    }
}

impl PoseEstimator for OnnxTopdownEstimator {
    fn estimate(&mut self, frame: &Frame) -> Result<PoseResult, Box<dyn std::error::Error>> {
        let bbox = BoundingBox::full_image(frame.width(), frame.height());
        let transform = CropTransform::from_bbox(
            &bbox,
            self.config.bbox_padding,
            self.config.input_width(),
            self.config.input_height(),
        );

        // 1. Preprocess: affine crop + normalise -> NCHW float32
        let input_tensor = transform.crop_to_tensor(frame, self.config.mean, self.config.std);

        // 2. Inference
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("Pose model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        if shape.len() != 4 || shape[0] != 1 {
            return Err(format!("Unexpected heatmap output shape: {shape:?}").into());
        }
        let expected = self.config.dataset.num_keypoints();
        if shape[1] != expected {
            return Err(format!(
                "Model predicts {} keypoints but the dataset defines {expected}",
                shape[1]
            )
            .into());
        }

        // 3. Decode
        let heatmaps = tensor
            .to_owned()
            .into_shape_with_order((shape[1], shape[2], shape[3]))?;
        let keypoints = decode_heatmaps(heatmaps.view(), &transform);

        Ok(PoseResult {
            instances: vec![PoseInstance {
                bbox,
                bbox_score: FULL_IMAGE_BBOX_SCORE,
                keypoints,
            }],
            heatmaps: self.keep_heatmaps.then(|| Heatmaps {
                data: heatmaps,
                region: transform.region(),
            }),
        })
    }

    fn dataset_meta(&self) -> &DatasetMeta {
        &self.config.dataset
    }
}
