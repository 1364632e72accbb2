use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for batch events.
///
/// Decouples the use cases from the output mechanism (log crate, progress
/// bars) so each front end can observe a run without changing the
/// orchestration code.
pub trait PipelineLogger: Send {
    /// A run over `total_files` files is starting.
    fn begin(&mut self, total_files: usize);

    /// Processing of one subfolder holding `file_count` files is starting.
    fn begin_folder(&mut self, name: &str, file_count: usize);

    /// One file of the current folder is done (processed or skipped).
    fn advance(&mut self, file_name: &str);

    /// The current folder is done. Default: no-op.
    fn end_folder(&mut self) {}

    /// Record how long a named stage took for one file.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Log a recoverable problem.
    fn warn(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn begin(&mut self, _total_files: usize) {}
    fn begin_folder(&mut self, _name: &str, _file_count: usize) {}
    fn advance(&mut self, _file_name: &str) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
    fn warn(&mut self, _message: &str) {}
}

/// `log`-backed logger that tracks per-stage timing and prints a summary
/// when the run completes.
///
/// Folder progress is throttled to every `throttle_files` files.
pub struct StdoutPipelineLogger {
    throttle_files: usize,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    total_files: usize,
    done_files: usize,
    folder: Option<(String, usize, usize)>,
    warnings: Vec<String>,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_files: usize) -> Self {
        Self {
            throttle_files: throttle_files.max(1),
            timings: HashMap::new(),
            start_time: Instant::now(),
            total_files: 0,
            done_files: 0,
            folder: None,
            warnings: Vec::new(),
        }
    }

    /// Returns the formatted summary string, or `None` if no stage was timed.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Run summary ({}/{} files, {:.1}s total):",
            self.done_files,
            self.total_files,
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len() as f64;
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        if self.done_files > 0 && elapsed_ms > 0.0 {
            let rate = self.done_files as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {rate:.1} images/s"));
        }
        if !self.warnings.is_empty() {
            lines.push(format!("  Warnings: {}", self.warnings.len()));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn done_files(&self) -> usize {
        self.done_files
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn begin(&mut self, total_files: usize) {
        self.total_files = total_files;
        self.done_files = 0;
        self.start_time = Instant::now();
    }

    fn begin_folder(&mut self, name: &str, file_count: usize) {
        log::info!("Folder {name}: {file_count} images");
        self.folder = Some((name.to_string(), 0, file_count));
    }

    fn advance(&mut self, file_name: &str) {
        self.done_files += 1;
        log::debug!("Finished {file_name}");
        if let Some((name, done, count)) = self.folder.as_mut() {
            *done += 1;
            if *done % self.throttle_files == 0 || *done == *count {
                log::info!(
                    "{name}: {done}/{count} ({}/{} overall)",
                    self.done_files,
                    self.total_files
                );
            }
        }
    }

    fn end_folder(&mut self) {
        self.folder = None;
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
        log::warn!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
