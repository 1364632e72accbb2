/// Input frames are picked up by this extension only (case-sensitive).
pub const INPUT_IMAGE_EXTENSION: &str = ".jpg";

/// Appended to the input file name to form the visualization output name.
pub const OUTPUT_SUFFIX: &str = "_vis_results.jpg";

pub const DEFAULT_BASE_FOLDER: &str = "datafolder/1_original_event_frames";
pub const DEFAULT_OUTPUT_FOLDER: &str = "datafolder/2_pose_extraction/with_bg";
pub const DEFAULT_MODEL_CONFIG: &str = "models/td-hm_hrnet-w48_8xb32-210e_coco-256x192.json";
pub const DEFAULT_CHECKPOINT: &str = "models/td-hm_hrnet-w48_8xb32-210e_coco-256x192.onnx";

pub const LABEL_FONT_NAME: &str = "Arial.ttf";
pub const LABEL_FONT_URL: &str =
    "https://github.com/ultralytics/assets/releases/download/v0.0.0/Arial.ttf";

/// Returns the output file name for an input image file name.
pub fn output_file_name(input_name: &str) -> String {
    format!("{input_name}{OUTPUT_SUFFIX}")
}
