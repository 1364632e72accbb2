use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::pose::domain::dataset_meta::{DatasetMeta, DatasetMetaError};

#[derive(Error, Debug)]
pub enum ModelConfigError {
    #[error("failed to read model config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid model config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid dataset in model config: {0}")]
    Dataset(#[from] DatasetMetaError),
    #[error("input size must be non-zero, got {0}x{1}")]
    InputSize(u32, u32),
    #[error("normalisation std must be non-zero, got {0:?}")]
    Std([f32; 3]),
}

/// Preprocessing parameters and dataset metadata for a top-down heatmap model.
///
/// Every field is optional in the JSON file; omitted fields take the values of
/// an HRNet COCO 256x192 model.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model input as `[width, height]`.
    pub input_size: [u32; 2],
    /// Per-channel RGB mean subtracted before inference.
    pub mean: [f32; 3],
    /// Per-channel RGB std dividing after mean subtraction.
    pub std: [f32; 3],
    /// Scale applied to the bounding box before cropping.
    pub bbox_padding: f32,
    pub dataset: DatasetMeta,
}

impl ModelConfig {
    pub fn load(path: &Path) -> Result<Self, ModelConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ModelConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| ModelConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ModelConfigError> {
        let [w, h] = self.input_size;
        if w == 0 || h == 0 {
            return Err(ModelConfigError::InputSize(w, h));
        }
        if self.std.iter().any(|&s| s == 0.0) {
            return Err(ModelConfigError::Std(self.std));
        }
        self.dataset.validate()?;
        Ok(())
    }

    pub fn input_width(&self) -> u32 {
        self.input_size[0]
    }

    pub fn input_height(&self) -> u32 {
        self.input_size[1]
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            input_size: [192, 256],
            mean: [123.675, 116.28, 103.53],
            std: [58.395, 57.12, 57.375],
            bbox_padding: 1.25,
            dataset: DatasetMeta::coco(),
        }
    }
}
