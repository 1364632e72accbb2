mod progress_logger;

use std::path::{Path, PathBuf};
use std::process;

use ab_glyph::FontVec;
use clap::{ArgAction, Parser};
use env_logger::Env;

use swingpose_core::imaging::domain::image_viewer::ImageViewer;
use swingpose_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use swingpose_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use swingpose_core::imaging::infrastructure::system_image_viewer::SystemImageViewer;
use swingpose_core::pipeline::extract_poses_use_case::{ExtractOptions, ExtractPosesUseCase};
use swingpose_core::pipeline::pipeline_logger::PipelineLogger;
use swingpose_core::pipeline::sort_swing_phases_use_case::SortSwingPhasesUseCase;
use swingpose_core::pose::domain::pose_estimator::PoseEstimator;
use swingpose_core::pose::infrastructure::execution_provider::Device;
use swingpose_core::pose::infrastructure::model_config::ModelConfig;
use swingpose_core::pose::infrastructure::onnx_topdown_estimator::OnnxTopdownEstimator;
use swingpose_core::shared::asset_resolver;
use swingpose_core::shared::constants::{
    DEFAULT_BASE_FOLDER, DEFAULT_CHECKPOINT, DEFAULT_MODEL_CONFIG, DEFAULT_OUTPUT_FOLDER,
    LABEL_FONT_NAME, LABEL_FONT_URL,
};
use swingpose_core::sorting::domain::file_mover::FileMover;
use swingpose_core::sorting::infrastructure::dry_run_file_mover::DryRunFileMover;
use swingpose_core::sorting::infrastructure::fs_file_mover::FsFileMover;
use swingpose_core::visualization::domain::skeleton_style::SkeletonStyle;
use swingpose_core::visualization::domain::visualizer_settings::VisualizerSettings;
use swingpose_core::visualization::infrastructure::skeleton_visualizer::{
    load_font, SkeletonVisualizer,
};

use progress_logger::ProgressBarLogger;

/// Golf swing pose extraction and swing-phase sorting.
///
/// Draws the estimated skeleton of every event frame, then files the drawn
/// frames of each swing into one folder per phase.
#[derive(Parser, Debug)]
#[command(name = "swingpose", version)]
struct Cli {
    /// Folder holding one subfolder of `.jpg` event frames per swing.
    #[arg(long, default_value = DEFAULT_BASE_FOLDER)]
    base_folder: PathBuf,

    /// Folder receiving `<file>_vis_results.jpg` and the phase folders.
    #[arg(long, default_value = DEFAULT_OUTPUT_FOLDER)]
    output_folder: PathBuf,

    /// Model config file (JSON: input size, normalisation, keypoint layout).
    #[arg(long, default_value = DEFAULT_MODEL_CONFIG)]
    config: PathBuf,

    /// Exported ONNX pose model.
    #[arg(long, default_value = DEFAULT_CHECKPOINT)]
    checkpoint: PathBuf,

    /// Inference device: cpu, cuda or cuda:N.
    #[arg(long, default_value = "cuda:0")]
    device: String,

    /// Stack the keypoint heatmaps below each drawn image.
    #[arg(long)]
    draw_heatmap: bool,

    /// Label every keypoint with its index.
    #[arg(long)]
    show_kpt_idx: bool,

    /// Skeleton style: mmpose or openpose.
    #[arg(long, default_value = "mmpose")]
    skeleton_style: SkeletonStyle,

    /// Keypoints scoring at or below this are not drawn (0.0-1.0).
    #[arg(long, default_value = "0.3")]
    kpt_thr: f32,

    /// Keypoint radius in pixels.
    #[arg(long, default_value = "3")]
    radius: u32,

    /// Link thickness in pixels.
    #[arg(long, default_value = "1")]
    thickness: u32,

    /// Overlay opacity (0.0-1.0).
    #[arg(long, default_value = "0.8")]
    alpha: f32,

    /// Open every written image in the system viewer.
    #[arg(long)]
    show: bool,

    /// Leave images whose output already exists.
    #[arg(long)]
    skip_processed: bool,

    /// Draw on the original image (true) or on a white canvas (false).
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    with_original_img: bool,

    /// TrueType font for keypoint labels (downloaded when omitted).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Skip pose extraction and only sort the output folder.
    #[arg(long)]
    sort_only: bool,

    /// Log the moves the sorter would make without moving anything.
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    if !cli.sort_only {
        run_extraction(&cli)?;
    }

    log::info!("Reorganizing images...");
    run_sort(&cli.output_folder, cli.dry_run)?;
    log::info!("Done");
    Ok(())
}

fn run_extraction(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let estimator = build_estimator(cli)?;
    let settings = visualizer_settings(cli);
    let font = if settings.show_kpt_idx {
        Some(resolve_font(cli.font.as_deref())?)
    } else {
        None
    };
    let visualizer = SkeletonVisualizer::new(estimator.dataset_meta(), settings, font);
    let viewer: Option<Box<dyn ImageViewer>> = if cli.show {
        Some(Box::new(SystemImageViewer))
    } else {
        None
    };

    let mut use_case = ExtractPosesUseCase::new(
        Box::new(ImageFileReader::new()),
        estimator,
        Box::new(visualizer),
        Box::new(ImageFileWriter::new()),
        viewer,
        Box::new(ProgressBarLogger::new()),
        ExtractOptions {
            skip_processed: cli.skip_processed,
            with_original_img: cli.with_original_img,
        },
    );
    let report = use_case.execute(&cli.base_folder, &cli.output_folder)?;
    log::info!(
        "Pose extraction finished: {} processed, {} skipped, output in {}",
        report.processed,
        report.skipped,
        cli.output_folder.display()
    );
    Ok(())
}

fn run_sort(folder: &Path, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mover: Box<dyn FileMover> = if dry_run {
        Box::new(DryRunFileMover::new())
    } else {
        Box::new(FsFileMover)
    };
    let logger: Box<dyn PipelineLogger> = Box::new(ProgressBarLogger::new());

    let report = SortSwingPhasesUseCase::new(mover, logger).execute(folder, folder)?;
    log::info!(
        "Sorted {} frames; {} left in place, {} incomplete groups, {} rejected groups",
        report.moved.len(),
        report.left_in_place.len(),
        report.incomplete_groups.len(),
        report.rejected_groups.len()
    );
    Ok(())
}

fn build_estimator(cli: &Cli) -> Result<Box<dyn PoseEstimator>, Box<dyn std::error::Error>> {
    let config = ModelConfig::load(&cli.config)?;
    let device: Device = cli.device.parse()?;
    log::info!("Loading pose model: {}", cli.checkpoint.display());
    Ok(Box::new(OnnxTopdownEstimator::new(
        &cli.checkpoint,
        config,
        device,
        cli.draw_heatmap,
    )?))
}

fn visualizer_settings(cli: &Cli) -> VisualizerSettings {
    VisualizerSettings {
        radius: cli.radius,
        line_width: cli.thickness,
        alpha: cli.alpha,
        kpt_thr: cli.kpt_thr,
        skeleton_style: cli.skeleton_style,
        draw_bbox: true,
        draw_heatmap: cli.draw_heatmap,
        show_kpt_idx: cli.show_kpt_idx,
    }
}

fn resolve_font(explicit: Option<&Path>) -> Result<FontVec, Box<dyn std::error::Error>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            log::info!("Resolving label font: {LABEL_FONT_NAME}");
            let path = asset_resolver::resolve(
                LABEL_FONT_NAME,
                LABEL_FONT_URL,
                None,
                Some(Box::new(download_progress)),
            )?;
            eprintln!();
            path
        }
    };
    load_font(&path)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.sort_only {
        return Ok(());
    }
    if !cli.base_folder.is_dir() {
        return Err(format!("Base folder not found: {}", cli.base_folder.display()).into());
    }
    if !cli.config.is_file() {
        return Err(format!("Model config not found: {}", cli.config.display()).into());
    }
    if !cli.checkpoint.is_file() {
        return Err(format!("Checkpoint not found: {}", cli.checkpoint.display()).into());
    }
    if let Some(font) = &cli.font {
        if !font.is_file() {
            return Err(format!("Font not found: {}", font.display()).into());
        }
    }
    cli.device.parse::<Device>()?;
    visualizer_settings(cli).validate()?;
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading label font... {pct}%");
    } else {
        eprint!("\rDownloading label font... {downloaded} bytes");
    }
}
