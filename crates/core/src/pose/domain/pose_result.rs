use ndarray::Array3;

/// A keypoint in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub score: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, score: f32) -> Self {
        Self { x, y, score }
    }

    pub fn is_visible(&self, threshold: f32) -> bool {
        self.score > threshold
    }
}

/// Axis-aligned box as `(x1, y1, x2, y2)` in image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box covering a whole `width` x `height` image.
    pub fn full_image(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn size(&self) -> (f32, f32) {
        (self.x2 - self.x1, self.y2 - self.y1)
    }
}

/// One detected person.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseInstance {
    pub bbox: BoundingBox,
    pub bbox_score: f32,
    pub keypoints: Vec<Keypoint>,
}

/// Raw model heatmaps, shaped `(keypoints, height, width)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Heatmaps {
    pub data: Array3<f32>,
    /// Image-space rectangle the heatmap grid spans; may extend past the image.
    pub region: BoundingBox,
}

impl Heatmaps {
    pub fn num_keypoints(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn height(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn width(&self) -> usize {
        self.data.shape()[2]
    }

    /// Per-pixel maximum over all keypoint channels, row-major.
    pub fn max_projection(&self) -> Vec<f32> {
        let (h, w) = (self.height(), self.width());
        let mut out = vec![f32::NEG_INFINITY; h * w];
        for channel in self.data.outer_iter() {
            for ((y, x), &v) in channel.indexed_iter() {
                let slot = &mut out[y * w + x];
                if v > *slot {
                    *slot = v;
                }
            }
        }
        if self.num_keypoints() == 0 {
            out.fill(0.0);
        }
        out
    }
}

/// Everything an estimator reports for one image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseResult {
    pub instances: Vec<PoseInstance>,
    pub heatmaps: Option<Heatmaps>,
}
