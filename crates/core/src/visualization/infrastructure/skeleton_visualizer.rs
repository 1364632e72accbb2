use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_polygon_mut,
    draw_text_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::pose::domain::dataset_meta::DatasetMeta;
use crate::pose::domain::pose_result::{BoundingBox, Heatmaps, Keypoint, PoseInstance, PoseResult};
use crate::shared::frame::Frame;
use crate::visualization::domain::pose_visualizer::PoseVisualizer;
use crate::visualization::domain::skeleton_style::SkeletonStyle;
use crate::visualization::domain::visualizer_settings::VisualizerSettings;

use super::colormap::{jet, normalize};
use super::openpose_layout::{with_neck, OPENPOSE_COLORS, OPENPOSE_LINKS};

const BBOX_COLOR: [u8; 3] = [0, 255, 0];
const FALLBACK_COLOR: [u8; 3] = [255, 255, 255];
const HEATMAP_ALPHA: f32 = 0.5;
const COCO_BODY_KEYPOINTS: usize = 17;

/// Loads a TrueType/OpenType font for keypoint index labels.
pub fn load_font(path: &Path) -> Result<FontVec, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    let font = FontVec::try_from_vec(bytes)
        .map_err(|e| format!("Invalid font {}: {e}", path.display()))?;
    Ok(font)
}

/// Links and palette after applying the skeleton style to the dataset.
#[derive(Clone, Debug, PartialEq)]
struct SkeletonLayout {
    openpose: bool,
    links: Vec<[usize; 2]>,
    link_colors: Vec<[u8; 3]>,
    keypoint_colors: Vec<[u8; 3]>,
}

impl SkeletonLayout {
    fn resolve(meta: &DatasetMeta, style: SkeletonStyle) -> Self {
        if style == SkeletonStyle::Openpose {
            if meta.is_coco_body() {
                return Self {
                    openpose: true,
                    links: OPENPOSE_LINKS.to_vec(),
                    link_colors: OPENPOSE_COLORS[..OPENPOSE_LINKS.len()].to_vec(),
                    keypoint_colors: OPENPOSE_COLORS.to_vec(),
                };
            }
            log::warn!(
                "OpenPose style needs the COCO body layout; drawing '{}' with its own skeleton",
                meta.name
            );
        }
        Self {
            openpose: false,
            links: meta.skeleton_links.clone(),
            link_colors: meta.link_colors.clone(),
            keypoint_colors: meta.keypoint_colors.clone(),
        }
    }
}

/// Draws bounding boxes, skeleton links, keypoints and optional heatmaps with
/// `imageproc`, alpha-blending the overlay onto the background.
pub struct SkeletonVisualizer {
    settings: VisualizerSettings,
    layout: SkeletonLayout,
    font: Option<FontVec>,
}

impl SkeletonVisualizer {
    pub fn new(meta: &DatasetMeta, settings: VisualizerSettings, font: Option<FontVec>) -> Self {
        if settings.show_kpt_idx && font.is_none() {
            log::warn!("Keypoint indices requested without a font; labels will not be drawn");
        }
        let layout = SkeletonLayout::resolve(meta, settings.skeleton_style);
        Self {
            settings,
            layout,
            font,
        }
    }

    fn draw_instance(&self, canvas: &mut RgbImage, instance: &PoseInstance) {
        let thr = self.settings.kpt_thr;
        let keypoints = if self.layout.openpose && instance.keypoints.len() == COCO_BODY_KEYPOINTS {
            with_neck(&instance.keypoints, thr)
        } else {
            instance.keypoints.clone()
        };

        if self.settings.draw_bbox {
            draw_thick_rect(canvas, &instance.bbox, self.settings.line_width, Rgb(BBOX_COLOR));
        }

        for (link, color) in self.layout.links.iter().zip(&self.layout.link_colors) {
            let (Some(a), Some(b)) = (keypoints.get(link[0]), keypoints.get(link[1])) else {
                continue;
            };
            if a.is_visible(thr) && b.is_visible(thr) {
                draw_thick_line(canvas, a, b, self.settings.line_width, Rgb(*color));
            }
        }

        let radius = self.settings.radius as i32;
        for (i, kp) in keypoints.iter().enumerate() {
            if !kp.is_visible(thr) {
                continue;
            }
            let color = Rgb(*self.layout.keypoint_colors.get(i).unwrap_or(&FALLBACK_COLOR));
            let center = (kp.x.round() as i32, kp.y.round() as i32);
            draw_filled_circle_mut(canvas, center, radius, color);

            if let (true, Some(font)) = (self.settings.show_kpt_idx, self.font.as_ref()) {
                let scale = PxScale::from((radius * 4).max(12) as f32);
                draw_text_mut(
                    canvas,
                    color,
                    center.0 + radius,
                    center.1 - radius,
                    scale,
                    font,
                    &i.to_string(),
                );
            }
        }
    }
}

impl PoseVisualizer for SkeletonVisualizer {
    fn draw(
        &self,
        background: &Frame,
        result: &PoseResult,
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        let base: RgbImage = background.clone().into();
        let mut overlay = base.clone();
        for instance in &result.instances {
            self.draw_instance(&mut overlay, instance);
        }
        let mut drawn = blend(&base, &overlay, self.settings.alpha);

        if self.settings.draw_heatmap {
            match &result.heatmaps {
                Some(heatmaps) => {
                    let panel = render_heatmap(heatmaps, &base);
                    drawn = stack_vertically(&drawn, &panel);
                }
                None => log::debug!("Heatmap drawing requested but the result has none"),
            }
        }

        Ok(Frame::from(drawn))
    }
}

fn draw_thick_rect(canvas: &mut RgbImage, bbox: &BoundingBox, line_width: u32, color: Rgb<u8>) {
    let x = bbox.x1.round() as i32;
    let y = bbox.y1.round() as i32;
    let w = (bbox.x2 - bbox.x1).round();
    let h = (bbox.y2 - bbox.y1).round();
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let (w, h) = (w as u32, h as u32);
    for inset in 0..line_width {
        let shrink = inset * 2;
        if w <= shrink || h <= shrink {
            break;
        }
        let rect = Rect::at(x + inset as i32, y + inset as i32).of_size(w - shrink, h - shrink);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

fn draw_thick_line(canvas: &mut RgbImage, a: &Keypoint, b: &Keypoint, width: u32, color: Rgb<u8>) {
    if width <= 1 {
        draw_line_segment_mut(canvas, (a.x, a.y), (b.x, b.y), color);
        return;
    }

    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len = (dx * dx + dy * dy).sqrt();
    let half = width as f32 / 2.0;
    if len >= 1.0 {
        let (nx, ny) = (-dy / len * half, dx / len * half);
        let corner = |x: f32, y: f32| Point::new(x.round() as i32, y.round() as i32);
        let poly = [
            corner(a.x + nx, a.y + ny),
            corner(b.x + nx, b.y + ny),
            corner(b.x - nx, b.y - ny),
            corner(a.x - nx, a.y - ny),
        ];
        if poly[0] != poly[3] {
            draw_polygon_mut(canvas, &poly, color);
        }
    }
    // Round caps
    let cap = (half.round() as i32).max(1);
    for p in [a, b] {
        draw_filled_circle_mut(canvas, (p.x.round() as i32, p.y.round() as i32), cap, color);
    }
}

fn blend(base: &RgbImage, overlay: &RgbImage, alpha: f32) -> RgbImage {
    let mut out = base.clone();
    for (dst, (b, o)) in out.pixels_mut().zip(base.pixels().zip(overlay.pixels())) {
        for c in 0..3 {
            let v = b.0[c] as f32 * (1.0 - alpha) + o.0[c] as f32 * alpha;
            dst.0[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Colour-maps the keypoint-maximum heatmap into image space over `base`.
fn render_heatmap(heatmaps: &Heatmaps, base: &RgbImage) -> RgbImage {
    let values = normalize(&heatmaps.max_projection());
    let (hw, hh) = (heatmaps.width(), heatmaps.height());
    let region = heatmaps.region;
    let (rw, rh) = region.size();

    let mut panel = base.clone();
    for (x, y, pixel) in panel.enumerate_pixels_mut() {
        let hx = ((x as f32 + 0.5 - region.x1) / rw * hw as f32).floor();
        let hy = ((y as f32 + 0.5 - region.y1) / rh * hh as f32).floor();
        let v = if hx >= 0.0 && hy >= 0.0 && (hx as usize) < hw && (hy as usize) < hh {
            values[hy as usize * hw + hx as usize]
        } else {
            0.0
        };
        let color = jet(v);
        for c in 0..3 {
            let blended =
                pixel.0[c] as f32 * (1.0 - HEATMAP_ALPHA) + color[c] as f32 * HEATMAP_ALPHA;
            pixel.0[c] = blended.round() as u8;
        }
    }
    panel
}

fn stack_vertically(top: &RgbImage, bottom: &RgbImage) -> RgbImage {
    let width = top.width().max(bottom.width());
    let mut out = RgbImage::new(width, top.height() + bottom.height());
    image::imageops::replace(&mut out, top, 0, 0);
    image::imageops::replace(&mut out, bottom, 0, top.height() as i64);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    const RED: [u8; 3] = [255, 0, 0];
    const BLUE: [u8; 3] = [0, 0, 255];
    const LINK: [u8; 3] = [200, 0, 200];

    fn two_point_meta() -> DatasetMeta {
        DatasetMeta {
            name: "pair".to_string(),
            keypoint_names: vec!["a".to_string(), "b".to_string()],
            skeleton_links: vec![[0, 1]],
            keypoint_colors: vec![RED, BLUE],
            link_colors: vec![LINK],
        }
    }

    fn opaque_settings() -> VisualizerSettings {
        VisualizerSettings {
            radius: 2,
            line_width: 1,
            alpha: 1.0,
            kpt_thr: 0.3,
            draw_bbox: false,
            ..Default::default()
        }
    }

    fn result_with(keypoints: Vec<Keypoint>) -> PoseResult {
        PoseResult {
            instances: vec![PoseInstance {
                bbox: BoundingBox::full_image(40, 20),
                bbox_score: 1.0,
                keypoints,
            }],
            heatmaps: None,
        }
    }

    fn draw(settings: VisualizerSettings, result: &PoseResult) -> Frame {
        let visualizer = SkeletonVisualizer::new(&two_point_meta(), settings, None);
        visualizer
            .draw(&Frame::filled(40, 20, [255, 255, 255]), result)
            .unwrap()
    }

    #[test]
    fn test_visible_keypoints_drawn_in_their_colours() {
        let result = result_with(vec![
            Keypoint::new(5.0, 10.0, 0.9),
            Keypoint::new(35.0, 10.0, 0.9),
        ]);
        let out = draw(opaque_settings(), &result);
        assert_eq!(out.pixel(5, 10), RED);
        assert_eq!(out.pixel(35, 10), BLUE);
    }

    #[test]
    fn test_link_drawn_between_visible_keypoints() {
        let result = result_with(vec![
            Keypoint::new(5.0, 10.0, 0.9),
            Keypoint::new(35.0, 10.0, 0.9),
        ]);
        let out = draw(opaque_settings(), &result);
        assert_eq!(out.pixel(20, 10), LINK);
    }

    #[test]
    fn test_low_score_hides_keypoint_and_its_links() {
        let result = result_with(vec![
            Keypoint::new(5.0, 10.0, 0.9),
            Keypoint::new(35.0, 10.0, 0.3),
        ]);
        let out = draw(opaque_settings(), &result);
        assert_eq!(out.pixel(35, 10), [255, 255, 255]);
        assert_eq!(out.pixel(20, 10), [255, 255, 255]);
        assert_eq!(out.pixel(5, 10), RED);
    }

    #[test]
    fn test_thick_link_covers_neighbouring_rows() {
        let settings = VisualizerSettings {
            line_width: 4,
            ..opaque_settings()
        };
        let result = result_with(vec![
            Keypoint::new(5.0, 10.0, 0.9),
            Keypoint::new(35.0, 10.0, 0.9),
        ]);
        let out = draw(settings, &result);
        assert_eq!(out.pixel(20, 9), LINK);
        assert_eq!(out.pixel(20, 11), LINK);
        assert_eq!(out.pixel(20, 16), [255, 255, 255]);
    }

    #[test]
    fn test_alpha_blends_with_background() {
        let settings = VisualizerSettings {
            alpha: 0.5,
            ..opaque_settings()
        };
        let result = result_with(vec![
            Keypoint::new(5.0, 10.0, 0.9),
            Keypoint::new(35.0, 10.0, 0.0),
        ]);
        let out = draw(settings, &result);
        assert_eq!(out.pixel(5, 10), [255, 128, 128]);
    }

    #[test]
    fn test_zero_alpha_leaves_background() {
        let settings = VisualizerSettings {
            alpha: 0.0,
            draw_bbox: true,
            ..opaque_settings()
        };
        let result = result_with(vec![
            Keypoint::new(5.0, 10.0, 0.9),
            Keypoint::new(35.0, 10.0, 0.9),
        ]);
        let out = draw(settings, &result);
        assert!(out.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_bbox_outline_drawn() {
        let settings = VisualizerSettings {
            draw_bbox: true,
            ..opaque_settings()
        };
        let out = draw(settings, &result_with(vec![]));
        assert_eq!(out.pixel(0, 0), BBOX_COLOR);
        assert_eq!(out.pixel(39, 19), BBOX_COLOR);
        assert_eq!(out.pixel(20, 10), [255, 255, 255]);
    }

    #[test]
    fn test_background_not_modified_and_size_kept() {
        let background = Frame::filled(40, 20, [10, 20, 30]);
        let visualizer = SkeletonVisualizer::new(&two_point_meta(), opaque_settings(), None);
        let result = result_with(vec![
            Keypoint::new(5.0, 10.0, 0.9),
            Keypoint::new(35.0, 10.0, 0.9),
        ]);
        let out = visualizer.draw(&background, &result).unwrap();
        assert_eq!((out.width(), out.height()), (40, 20));
        assert_eq!(background.pixel(5, 10), [10, 20, 30]);
    }

    #[test]
    fn test_heatmap_panel_stacked_below() {
        let settings = VisualizerSettings {
            draw_heatmap: true,
            ..opaque_settings()
        };
        let mut data = Array3::<f32>::zeros((2, 4, 8));
        data[[1, 2, 3]] = 1.0;
        let mut result = result_with(vec![]);
        result.heatmaps = Some(Heatmaps {
            data,
            region: BoundingBox::full_image(40, 20),
        });
        let out = draw(settings, &result);
        assert_eq!((out.width(), out.height()), (40, 40));
        // Peak cell (x 15..20, y 10..15) is red-dominant, the rest blue-dominant
        let peak = out.pixel(17, 20 + 12);
        assert!(peak[0] > peak[2]);
        let cold = out.pixel(2, 20 + 2);
        assert!(cold[2] > cold[0]);
    }

    #[test]
    fn test_heatmap_requested_without_data_keeps_size() {
        let settings = VisualizerSettings {
            draw_heatmap: true,
            ..opaque_settings()
        };
        let out = draw(settings, &result_with(vec![]));
        assert_eq!(out.height(), 20);
    }

    #[test]
    fn test_openpose_style_used_for_coco_layout() {
        let layout = SkeletonLayout::resolve(&DatasetMeta::coco(), SkeletonStyle::Openpose);
        assert!(layout.openpose);
        assert_eq!(layout.links.len(), OPENPOSE_LINKS.len());
    }

    #[test]
    fn test_openpose_style_falls_back_for_other_layouts() {
        let layout = SkeletonLayout::resolve(&two_point_meta(), SkeletonStyle::Openpose);
        assert!(!layout.openpose);
        assert_eq!(layout.links, vec![[0, 1]]);
    }

    #[test]
    fn test_openpose_draws_neck_link() {
        let settings = VisualizerSettings {
            skeleton_style: SkeletonStyle::Openpose,
            ..opaque_settings()
        };
        let mut keypoints = vec![Keypoint::new(0.0, 0.0, 0.0); 17];
        keypoints[0] = Keypoint::new(20.0, 2.0, 0.9); // nose
        keypoints[5] = Keypoint::new(10.0, 18.0, 0.9); // left shoulder
        keypoints[6] = Keypoint::new(30.0, 18.0, 0.9); // right shoulder
        let visualizer = SkeletonVisualizer::new(&DatasetMeta::coco(), settings, None);
        let out = visualizer
            .draw(&Frame::filled(40, 20, [255, 255, 255]), &result_with(keypoints))
            .unwrap();
        // Neck (20, 18) to nose (20, 2) is link 12
        assert_eq!(out.pixel(20, 10), OPENPOSE_COLORS[12]);
    }

    #[test]
    fn test_load_font_rejects_invalid_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(load_font(&path).is_err());
    }
}
