//! OpenPose-style body layout on top of COCO keypoints.
//!
//! COCO has no neck, so one is appended at index 17 as the shoulder midpoint.

use crate::pose::domain::pose_result::Keypoint;

const LEFT_SHOULDER: usize = 5;
const RIGHT_SHOULDER: usize = 6;
pub const NECK: usize = 17;

/// Links over COCO indices plus the synthesised neck.
pub const OPENPOSE_LINKS: [[usize; 2]; 17] = [
    [NECK, 6],
    [NECK, 5],
    [6, 8],
    [8, 10],
    [5, 7],
    [7, 9],
    [NECK, 12],
    [12, 14],
    [14, 16],
    [NECK, 11],
    [11, 13],
    [13, 15],
    [NECK, 0],
    [0, 2],
    [2, 4],
    [0, 1],
    [1, 3],
];

/// The 18-colour OpenPose rainbow palette.
pub const OPENPOSE_COLORS: [[u8; 3]; 18] = [
    [255, 0, 0],
    [255, 85, 0],
    [255, 170, 0],
    [255, 255, 0],
    [170, 255, 0],
    [85, 255, 0],
    [0, 255, 0],
    [0, 255, 85],
    [0, 255, 170],
    [0, 255, 255],
    [0, 170, 255],
    [0, 85, 255],
    [0, 0, 255],
    [85, 0, 255],
    [170, 0, 255],
    [255, 0, 255],
    [255, 0, 170],
    [255, 0, 85],
];

/// Appends a neck keypoint to a 17-point COCO pose.
///
/// The neck is visible (score = weaker shoulder) only when both shoulders
/// clear `kpt_thr`; otherwise its score is zero.
pub fn with_neck(keypoints: &[Keypoint], kpt_thr: f32) -> Vec<Keypoint> {
    let mut out = keypoints.to_vec();
    let (l, r) = (keypoints[LEFT_SHOULDER], keypoints[RIGHT_SHOULDER]);
    let score = if l.is_visible(kpt_thr) && r.is_visible(kpt_thr) {
        l.score.min(r.score)
    } else {
        0.0
    };
    out.push(Keypoint::new((l.x + r.x) / 2.0, (l.y + r.y) / 2.0, score));
    out
}
