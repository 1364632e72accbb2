//! Top-down pre/post-processing: affine crop of a bounding box into the model
//! input, and heatmap decoding back to image coordinates.

use ndarray::{Array4, ArrayView3};

use crate::pose::domain::pose_result::{BoundingBox, Keypoint};
use crate::shared::frame::Frame;

/// Maps between model-input pixels and image pixels for one bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropTransform {
    center: (f32, f32),
    /// Box size in image pixels after padding and aspect-ratio fix.
    scale: (f32, f32),
    input_size: (u32, u32),
}

impl CropTransform {
    /// Pads `bbox` by `padding` and widens or heightens it to match the input
    /// aspect ratio, keeping its centre.
    pub fn from_bbox(
        bbox: &BoundingBox,
        padding: f32,
        input_width: u32,
        input_height: u32,
    ) -> Self {
        let (w, h) = bbox.size();
        let (mut w, mut h) = (w * padding, h * padding);
        let aspect = input_width as f32 / input_height as f32;
        if w > h * aspect {
            h = w / aspect;
        } else {
            w = h * aspect;
        }
        Self {
            center: bbox.center(),
            scale: (w, h),
            input_size: (input_width, input_height),
        }
    }

    pub fn scale(&self) -> (f32, f32) {
        self.scale
    }

    /// Image-space rectangle covered by the model input.
    pub fn region(&self) -> BoundingBox {
        BoundingBox::new(
            self.center.0 - self.scale.0 / 2.0,
            self.center.1 - self.scale.1 / 2.0,
            self.center.0 + self.scale.0 / 2.0,
            self.center.1 + self.scale.1 / 2.0,
        )
    }

    /// Continuous input coordinates to image coordinates.
    pub fn to_image(&self, u: f32, v: f32) -> (f32, f32) {
        let (iw, ih) = (self.input_size.0 as f32, self.input_size.1 as f32);
        (
            self.center.0 - self.scale.0 / 2.0 + u * self.scale.0 / iw,
            self.center.1 - self.scale.1 / 2.0 + v * self.scale.1 / ih,
        )
    }

    /// Samples the transformed crop into a normalised NCHW tensor.
    ///
    /// Pixels outside the frame read as black before normalisation.
    pub fn crop_to_tensor(&self, frame: &Frame, mean: [f32; 3], std: [f32; 3]) -> Array4<f32> {
        let (iw, ih) = (self.input_size.0 as usize, self.input_size.1 as usize);
        let mut tensor = Array4::<f32>::zeros((1, 3, ih, iw));

        for v in 0..ih {
            for u in 0..iw {
                let (x, y) = self.to_image(u as f32 + 0.5, v as f32 + 0.5);
                let rgb = sample_bilinear(frame, x - 0.5, y - 0.5);
                for c in 0..3 {
                    tensor[[0, c, v, u]] = (rgb[c] - mean[c]) / std[c];
                }
            }
        }
        tensor
    }
}

fn sample_bilinear(frame: &Frame, x: f32, y: f32) -> [f32; 3] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let mut out = [0.0f32; 3];
    for (dx, dy, weight) in [
        (0, 0, (1.0 - fx) * (1.0 - fy)),
        (1, 0, fx * (1.0 - fy)),
        (0, 1, (1.0 - fx) * fy),
        (1, 1, fx * fy),
    ] {
        if weight == 0.0 {
            continue;
        }
        let (px, py) = (x0 + dx, y0 + dy);
        if px < 0 || py < 0 || px >= frame.width() as i64 || py >= frame.height() as i64 {
            continue;
        }
        let pixel = frame.pixel(px as u32, py as u32);
        for c in 0..3 {
            out[c] += weight * pixel[c] as f32;
        }
    }
    out
}

/// Decodes `(K, H, W)` heatmaps into one keypoint per channel.
///
/// The location is the channel argmax shifted a quarter pixel toward the
/// higher neighbour on each axis; the score is the heatmap maximum. Channels
/// whose maximum is not positive decode to heatmap location `(-1, -1)`.
pub fn decode_heatmaps(heatmaps: ArrayView3<'_, f32>, transform: &CropTransform) -> Vec<Keypoint> {
    let (k, h, w) = heatmaps.dim();
    let mut keypoints = Vec::with_capacity(k);

    for channel in heatmaps.outer_iter() {
        let mut best = (0usize, 0usize);
        let mut best_val = f32::NEG_INFINITY;
        for ((y, x), &v) in channel.indexed_iter() {
            if v > best_val {
                best_val = v;
                best = (x, y);
            }
        }

        let (mut hx, mut hy) = if best_val > 0.0 {
            (best.0 as f32, best.1 as f32)
        } else {
            (-1.0, -1.0)
        };

        if best_val > 0.0 {
            let (x, y) = best;
            if x > 1 && x + 1 < w && y > 0 && y < h {
                hx += 0.25 * sign(channel[[y, x + 1]] - channel[[y, x - 1]]);
            }
            if y > 1 && y + 1 < h && x > 0 && x < w {
                hy += 0.25 * sign(channel[[y + 1, x]] - channel[[y - 1, x]]);
            }
        }

        let (iw, ih) = (transform.input_size.0 as f32, transform.input_size.1 as f32);
        let (ix, iy) = transform.to_image(hx * iw / w as f32, hy * ih / h as f32);
        keypoints.push(Keypoint::new(ix, iy, best_val.max(f32::MIN)));
    }

    keypoints
}

fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
