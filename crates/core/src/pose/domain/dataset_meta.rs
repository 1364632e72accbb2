//! Keypoint layout, skeleton topology and palette of a pose dataset.
//!
//! Defaults describe the 17-keypoint COCO body layout with the left side in
//! green, the right side in orange and the face/torso in blue.

use serde::Deserialize;
use thiserror::Error;

const BLUE: [u8; 3] = [51, 153, 255];
const GREEN: [u8; 3] = [0, 255, 0];
const ORANGE: [u8; 3] = [255, 128, 0];

pub const COCO_KEYPOINT_NAMES: [&str; 17] = [
    "nose",
    "left_eye",
    "right_eye",
    "left_ear",
    "right_ear",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
];

pub const COCO_SKELETON: [[usize; 2]; 19] = [
    [15, 13],
    [13, 11],
    [16, 14],
    [14, 12],
    [11, 12],
    [5, 11],
    [6, 12],
    [5, 6],
    [5, 7],
    [6, 8],
    [7, 9],
    [8, 10],
    [1, 2],
    [0, 1],
    [0, 2],
    [1, 3],
    [2, 4],
    [3, 5],
    [4, 6],
];

const COCO_LINK_COLORS: [[u8; 3]; 19] = [
    GREEN, GREEN, ORANGE, ORANGE, BLUE, BLUE, BLUE, BLUE, GREEN, ORANGE, GREEN, ORANGE, BLUE,
    BLUE, BLUE, BLUE, BLUE, BLUE, BLUE,
];

const COCO_KEYPOINT_COLORS: [[u8; 3]; 17] = [
    BLUE, BLUE, BLUE, BLUE, BLUE, GREEN, ORANGE, GREEN, ORANGE, GREEN, ORANGE, GREEN, ORANGE,
    GREEN, ORANGE, GREEN, ORANGE,
];

#[derive(Error, Debug, PartialEq)]
pub enum DatasetMetaError {
    #[error("dataset has {names} keypoint names but {colors} keypoint colours")]
    KeypointColorCount { names: usize, colors: usize },
    #[error("dataset has {links} skeleton links but {colors} link colours")]
    LinkColorCount { links: usize, colors: usize },
    #[error("skeleton link {link:?} references keypoint outside 0..{count}")]
    LinkOutOfRange { link: [usize; 2], count: usize },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatasetMeta {
    pub name: String,
    pub keypoint_names: Vec<String>,
    pub skeleton_links: Vec<[usize; 2]>,
    pub keypoint_colors: Vec<[u8; 3]>,
    pub link_colors: Vec<[u8; 3]>,
}

impl DatasetMeta {
    pub fn coco() -> Self {
        Self {
            name: "coco".to_string(),
            keypoint_names: COCO_KEYPOINT_NAMES.iter().map(|s| s.to_string()).collect(),
            skeleton_links: COCO_SKELETON.to_vec(),
            keypoint_colors: COCO_KEYPOINT_COLORS.to_vec(),
            link_colors: COCO_LINK_COLORS.to_vec(),
        }
    }

    pub fn num_keypoints(&self) -> usize {
        self.keypoint_names.len()
    }

    /// True for the 17-point COCO body layout, which the OpenPose skeleton
    /// style knows how to remap.
    pub fn is_coco_body(&self) -> bool {
        self.keypoint_names
            .iter()
            .map(String::as_str)
            .eq(COCO_KEYPOINT_NAMES.iter().copied())
    }

    pub fn validate(&self) -> Result<(), DatasetMetaError> {
        if self.keypoint_colors.len() != self.keypoint_names.len() {
            return Err(DatasetMetaError::KeypointColorCount {
                names: self.keypoint_names.len(),
                colors: self.keypoint_colors.len(),
            });
        }
        if self.link_colors.len() != self.skeleton_links.len() {
            return Err(DatasetMetaError::LinkColorCount {
                links: self.skeleton_links.len(),
                colors: self.link_colors.len(),
            });
        }
        let count = self.num_keypoints();
        if let Some(link) = self
            .skeleton_links
            .iter()
            .find(|[a, b]| *a >= count || *b >= count)
        {
            return Err(DatasetMetaError::LinkOutOfRange { link: *link, count });
        }
        Ok(())
    }
}

impl Default for DatasetMeta {
    fn default() -> Self {
        Self::coco()
    }
}
