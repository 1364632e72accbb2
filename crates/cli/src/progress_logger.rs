use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use swingpose_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};

const TOTAL_TEMPLATE: &str =
    "{spinner:.green} [{elapsed}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec} {eta})";
const FOLDER_TEMPLATE: &str = "  {msg:24} [{bar:40.green/white}] {pos}/{len}";

/// Terminal progress: one bar for the whole run and one for the folder (or
/// frame group) in progress. Stage timings and the summary come from the
/// wrapped [`StdoutPipelineLogger`].
pub struct ProgressBarLogger {
    multi: MultiProgress,
    total: Option<ProgressBar>,
    folder: Option<ProgressBar>,
    stats: StdoutPipelineLogger,
}

impl ProgressBarLogger {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            total: None,
            folder: None,
            stats: StdoutPipelineLogger::default(),
        }
    }

    /// A logger whose bars are never drawn; messages still reach `log`.
    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            ..Self::new()
        }
    }

    fn style(template: &str) -> ProgressStyle {
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }
}

impl Default for ProgressBarLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for ProgressBarLogger {
    fn begin(&mut self, total_files: usize) {
        let bar = self.multi.add(ProgressBar::new(total_files as u64));
        bar.set_style(Self::style(TOTAL_TEMPLATE));
        self.total = Some(bar);
        self.stats.begin(total_files);
    }

    fn begin_folder(&mut self, name: &str, file_count: usize) {
        let bar = self.multi.add(ProgressBar::new(file_count as u64));
        bar.set_style(Self::style(FOLDER_TEMPLATE));
        bar.set_message(name.to_string());
        self.folder = Some(bar);
    }

    fn advance(&mut self, file_name: &str) {
        if let Some(bar) = &self.folder {
            bar.inc(1);
        }
        if let Some(bar) = &self.total {
            bar.inc(1);
        }
        self.stats.advance(file_name);
    }

    fn end_folder(&mut self) {
        if let Some(bar) = self.folder.take() {
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.stats.timing(stage, duration_ms);
    }

    fn info(&mut self, message: &str) {
        self.multi.suspend(|| log::info!("{message}"));
    }

    fn warn(&mut self, message: &str) {
        let stats = &mut self.stats;
        self.multi.suspend(|| stats.warn(message));
    }

    fn summary(&self) {
        if let Some(bar) = &self.total {
            bar.finish();
        }
        self.multi.suspend(|| self.stats.summary());
    }
}
