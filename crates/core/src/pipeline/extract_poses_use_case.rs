use std::path::Path;
use std::time::Instant;

use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_viewer::ImageViewer;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pose::domain::pose_estimator::PoseEstimator;
use crate::shared::constants::{output_file_name, INPUT_IMAGE_EXTENSION};
use crate::shared::listing::{list_files_with_suffix, list_subdirectories};
use crate::visualization::domain::pose_visualizer::PoseVisualizer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Leave images whose output already exists untouched.
    pub skip_processed: bool,
    /// Draw on the input image; otherwise on a white canvas of the same size.
    pub with_original_img: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            skip_processed: false,
            with_original_img: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
}

/// Batch pose extraction: for every `.jpg` in every subfolder of the base
/// folder, read → estimate → draw → write `<name>_vis_results.jpg`.
pub struct ExtractPosesUseCase {
    reader: Box<dyn ImageReader>,
    estimator: Box<dyn PoseEstimator>,
    visualizer: Box<dyn PoseVisualizer>,
    writer: Box<dyn ImageWriter>,
    viewer: Option<Box<dyn ImageViewer>>,
    logger: Box<dyn PipelineLogger>,
    options: ExtractOptions,
}

impl ExtractPosesUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        estimator: Box<dyn PoseEstimator>,
        visualizer: Box<dyn PoseVisualizer>,
        writer: Box<dyn ImageWriter>,
        viewer: Option<Box<dyn ImageViewer>>,
        logger: Box<dyn PipelineLogger>,
        options: ExtractOptions,
    ) -> Self {
        Self {
            reader,
            estimator,
            visualizer,
            writer,
            viewer,
            logger,
            options,
        }
    }

    pub fn execute(
        &mut self,
        base_folder: &Path,
        output_folder: &Path,
    ) -> Result<ExtractReport, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(output_folder)
            .map_err(|e| format!("failed to create {}: {e}", output_folder.display()))?;

        let folders = list_subdirectories(base_folder)
            .map_err(|e| format!("failed to list {}: {e}", base_folder.display()))?;

        let mut batches = Vec::with_capacity(folders.len());
        for folder in folders {
            let dir = base_folder.join(&folder);
            let files = list_files_with_suffix(&dir, INPUT_IMAGE_EXTENSION)
                .map_err(|e| format!("failed to list {}: {e}", dir.display()))?;
            batches.push((folder, files));
        }

        let mut report = ExtractReport {
            total: batches.iter().map(|(_, files)| files.len()).sum(),
            ..ExtractReport::default()
        };
        self.logger.info(&format!("{} files found", report.total));
        self.logger.begin(report.total);

        for (folder, files) in &batches {
            self.logger.begin_folder(folder, files.len());
            let dir = base_folder.join(folder);

            for file in files {
                let output_path = output_folder.join(output_file_name(file));
                if self.options.skip_processed && output_path.exists() {
                    self.logger
                        .info(&format!("Image {file} already processed. Skipping..."));
                    report.skipped += 1;
                    self.logger.advance(file);
                    continue;
                }

                self.process(&dir.join(file), &output_path)?;
                report.processed += 1;
                self.logger.advance(file);
            }

            self.logger.end_folder();
        }

        self.logger.summary();
        Ok(report)
    }

    fn process(
        &mut self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let t0 = Instant::now();
        let image = self.reader.read(input_path)?;
        let t1 = Instant::now();
        let result = self.estimator.estimate(&image)?;
        let t2 = Instant::now();

        let drawn = if self.options.with_original_img {
            self.visualizer.draw(&image, &result)?
        } else {
            self.visualizer.draw(&image.blank_like(), &result)?
        };
        let t3 = Instant::now();
        self.writer.write(output_path, &drawn)?;
        let t4 = Instant::now();

        self.logger.timing("read", ms(t1 - t0));
        self.logger.timing("inference", ms(t2 - t1));
        self.logger.timing("draw", ms(t3 - t2));
        self.logger.timing("write", ms(t4 - t3));

        if let Some(viewer) = &self.viewer {
            viewer.show(output_path)?;
        }
        Ok(())
    }
}

fn ms(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
