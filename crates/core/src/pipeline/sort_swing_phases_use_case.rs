use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::INPUT_IMAGE_EXTENSION;
use crate::shared::listing::list_files_with_suffix;
use crate::sorting::domain::file_mover::FileMover;
use crate::sorting::domain::frame_grouper::group_frames;
use crate::sorting::domain::phase_planner::plan_phases;
use crate::sorting::domain::swing_phase::SwingPhase;

#[derive(Error, Debug)]
pub enum SortError {
    #[error("failed to list {path}: {source}")]
    ListDir { path: PathBuf, source: io::Error },

    #[error("failed to create {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Outcome of one sorting run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortReport {
    /// Files moved (or planned, in a dry run) with their phase.
    pub moved: Vec<(String, SwingPhase)>,
    /// Matching files beyond the eighth frame of their group.
    pub left_in_place: Vec<String>,
    /// Groups whose size is not exactly one per phase, with their size.
    pub incomplete_groups: Vec<(String, usize)>,
    /// Groups left untouched because two files share a frame number.
    pub rejected_groups: Vec<String>,
}

/// Moves per-frame outputs of a flat directory into one folder per swing
/// phase: group by prefix → order by frame number → assign phases → move.
pub struct SortSwingPhasesUseCase {
    mover: Box<dyn FileMover>,
    logger: Box<dyn PipelineLogger>,
}

impl SortSwingPhasesUseCase {
    /// The phase folders are only created when `mover` really moves files.
    pub fn new(mover: Box<dyn FileMover>, logger: Box<dyn PipelineLogger>) -> Self {
        Self { mover, logger }
    }

    pub fn execute(&mut self, source: &Path, target: &Path) -> Result<SortReport, SortError> {
        let names = list_files_with_suffix(source, INPUT_IMAGE_EXTENSION).map_err(|source_err| {
            SortError::ListDir {
                path: source.to_path_buf(),
                source: source_err,
            }
        })?;
        let groups = group_frames(&names);

        if !self.mover.is_dry_run() {
            for phase in SwingPhase::ALL {
                let dir = target.join(phase.dir_name());
                fs::create_dir_all(&dir).map_err(|e| SortError::CreateDir {
                    path: dir.clone(),
                    source: e,
                })?;
            }
        }

        let total: usize = groups.iter().map(|g| g.len()).sum();
        self.logger.begin(total);

        let mut report = SortReport::default();
        for group in &groups {
            self.logger.begin_folder(&group.prefix, group.len());

            if group.len() != SwingPhase::COUNT {
                self.logger.info(&format!(
                    "Note: Group {} has {} frames",
                    group.prefix,
                    group.len()
                ));
            }

            let plan = match plan_phases(group) {
                Ok(plan) => plan,
                Err(e) => {
                    self.logger.warn(&format!("Skipping group: {e}"));
                    report.rejected_groups.push(group.prefix.clone());
                    self.logger.end_folder();
                    continue;
                }
            };

            if !plan.is_complete() {
                report
                    .incomplete_groups
                    .push((plan.prefix.clone(), plan.frame_count));
            }
            if !plan.left_in_place.is_empty() {
                self.logger.warn(&format!(
                    "Group {} has {} frames beyond {}; leaving them in place",
                    plan.prefix,
                    plan.left_in_place.len(),
                    SwingPhase::COUNT
                ));
            }

            for mv in plan.moves {
                let from = source.join(&mv.file_name);
                let to = target.join(mv.phase.dir_name()).join(&mv.file_name);
                self.mover
                    .move_file(&from, &to)
                    .map_err(|e| SortError::Move {
                        from: from.clone(),
                        to: to.clone(),
                        source: e,
                    })?;
                self.logger
                    .info(&format!("Moved {} to {}", mv.file_name, mv.phase.dir_name()));
                self.logger.advance(&mv.file_name);
                report.moved.push((mv.file_name, mv.phase));
            }
            for name in &plan.left_in_place {
                self.logger.advance(name);
            }
            report.left_in_place.extend(plan.left_in_place);
            self.logger.end_folder();
        }

        self.logger.summary();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::sorting::infrastructure::dry_run_file_mover::DryRunFileMover;
    use crate::sorting::infrastructure::fs_file_mover::FsFileMover;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    // --- Stubs ---

    #[derive(Clone, Default)]
    struct RecordingLogger {
        infos: Arc<Mutex<Vec<String>>>,
        warnings: Arc<Mutex<Vec<String>>>,
    }

    impl PipelineLogger for RecordingLogger {
        fn begin(&mut self, _total_files: usize) {}
        fn begin_folder(&mut self, _name: &str, _file_count: usize) {}
        fn advance(&mut self, _file_name: &str) {}
        fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
        fn info(&mut self, message: &str) {
            self.infos.lock().unwrap().push(message.to_string());
        }
        fn warn(&mut self, message: &str) {
            self.warnings.lock().unwrap().push(message.to_string());
        }
    }

    // --- Helpers ---

    fn frame_name(prefix: &str, number: u32) -> String {
        format!("{prefix}_{number:04}.jpg_vis_results.jpg")
    }

    fn write_frames(dir: &Path, prefix: &str, numbers: &[u32]) {
        for n in numbers {
            fs::write(dir.join(frame_name(prefix, *n)), n.to_string()).unwrap();
        }
    }

    fn sort(dir: &Path) -> SortReport {
        SortSwingPhasesUseCase::new(Box::new(FsFileMover), Box::new(NullPipelineLogger))
            .execute(dir, dir)
            .unwrap()
    }

    fn phase_contents(dir: &Path, phase: SwingPhase) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir.join(phase.dir_name()))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    // --- Tests ---

    #[test]
    fn test_full_group_lands_one_file_per_phase() {
        let dir = TempDir::new().unwrap();
        write_frames(dir.path(), "swing", &[6, 1, 3, 0, 7, 2, 5, 4]);

        let report = sort(dir.path());

        assert_eq!(report.moved.len(), 8);
        assert!(report.incomplete_groups.is_empty());
        for (i, phase) in SwingPhase::ALL.iter().enumerate() {
            assert_eq!(
                phase_contents(dir.path(), *phase),
                vec![frame_name("swing", i as u32)]
            );
        }
        assert!(!dir.path().join(frame_name("swing", 0)).exists());
    }

    #[test]
    fn test_non_matching_files_are_never_moved() {
        let dir = TempDir::new().unwrap();
        write_frames(dir.path(), "swing", &[0, 1, 2, 3, 4, 5, 6, 7]);
        for name in ["notes.jpg", "swing_12.jpg_vis_results.jpg", "swing_0001.jpg"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        sort(dir.path());

        for name in ["notes.jpg", "swing_12.jpg_vis_results.jpg", "swing_0001.jpg"] {
            assert!(dir.path().join(name).exists(), "{name} was moved");
        }
    }

    #[test]
    fn test_short_group_fills_leading_phases_and_notes_size() {
        let dir = TempDir::new().unwrap();
        write_frames(dir.path(), "short", &[10, 20, 30, 40, 50]);
        let logger = RecordingLogger::default();
        let infos = Arc::clone(&logger.infos);

        let report = SortSwingPhasesUseCase::new(Box::new(FsFileMover), Box::new(logger))
            .execute(dir.path(), dir.path())
            .unwrap();

        assert_eq!(report.incomplete_groups, vec![("short".to_string(), 5)]);
        for phase in &SwingPhase::ALL[..5] {
            assert_eq!(phase_contents(dir.path(), *phase).len(), 1);
        }
        for phase in &SwingPhase::ALL[5..] {
            assert!(dir.path().join(phase.dir_name()).is_dir());
            assert!(phase_contents(dir.path(), *phase).is_empty());
        }
        assert!(infos
            .lock()
            .unwrap()
            .contains(&"Note: Group short has 5 frames".to_string()));
    }

    #[test]
    fn test_long_group_leaves_highest_frames_with_warning() {
        let dir = TempDir::new().unwrap();
        write_frames(dir.path(), "long", &[9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        let logger = RecordingLogger::default();
        let warnings = Arc::clone(&logger.warnings);

        let report = SortSwingPhasesUseCase::new(Box::new(FsFileMover), Box::new(logger))
            .execute(dir.path(), dir.path())
            .unwrap();

        assert_eq!(report.moved.len(), 8);
        assert_eq!(
            report.left_in_place,
            vec![frame_name("long", 8), frame_name("long", 9)]
        );
        assert!(dir.path().join(frame_name("long", 8)).exists());
        assert!(dir.path().join(frame_name("long", 9)).exists());
        assert_eq!(
            phase_contents(dir.path(), SwingPhase::Finish),
            vec![frame_name("long", 7)]
        );
        assert_eq!(warnings.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_second_run_is_noop() {
        let dir = TempDir::new().unwrap();
        write_frames(dir.path(), "swing", &[0, 1, 2, 3, 4, 5, 6, 7]);

        sort(dir.path());
        let second = sort(dir.path());

        assert_eq!(second, SortReport::default());
        for phase in SwingPhase::ALL {
            assert_eq!(phase_contents(dir.path(), phase).len(), 1);
        }
    }

    #[test]
    fn test_two_prefixes_sort_independently() {
        let dir = TempDir::new().unwrap();
        write_frames(dir.path(), "alice", &[100, 101, 102, 103, 104, 105, 106, 107]);
        write_frames(dir.path(), "bob", &[7, 6, 5, 4, 3, 2, 1, 0]);

        let report = sort(dir.path());

        assert_eq!(report.moved.len(), 16);
        for (i, phase) in SwingPhase::ALL.iter().enumerate() {
            assert_eq!(
                phase_contents(dir.path(), *phase),
                vec![frame_name("alice", 100 + i as u32), frame_name("bob", i as u32)]
            );
        }
    }

    #[test]
    fn test_duplicate_frame_numbers_reject_group() {
        let dir = TempDir::new().unwrap();
        write_frames(dir.path(), "dup", &[0, 1, 2]);
        let duplicate = "dup_0001.jpg_vis_results.jpg.copy.jpg";
        fs::write(dir.path().join(duplicate), b"x").unwrap();
        write_frames(dir.path(), "ok", &[0, 1, 2, 3, 4, 5, 6, 7]);

        let report = sort(dir.path());

        assert_eq!(report.rejected_groups, vec!["dup".to_string()]);
        assert!(dir.path().join(frame_name("dup", 0)).exists());
        assert!(dir.path().join(duplicate).exists());
        assert_eq!(report.moved.len(), 8);
        assert!(report.moved.iter().all(|(name, _)| name.starts_with("ok_")));
    }

    #[test]
    fn test_dry_run_leaves_filesystem_untouched() {
        let dir = TempDir::new().unwrap();
        write_frames(dir.path(), "swing", &[3, 2, 1, 0]);
        let mover = DryRunFileMover::new();
        let planned = mover.planned();

        let report = SortSwingPhasesUseCase::new(Box::new(mover), Box::new(NullPipelineLogger))
            .execute(dir.path(), dir.path())
            .unwrap();

        assert_eq!(report.moved.len(), 4);
        assert_eq!(planned.lock().unwrap().len(), 4);
        assert_eq!(
            planned.lock().unwrap()[0],
            (
                dir.path().join(frame_name("swing", 0)),
                dir.path().join("0.Address").join(frame_name("swing", 0))
            )
        );
        for phase in SwingPhase::ALL {
            assert!(!dir.path().join(phase.dir_name()).exists());
        }
        assert!(dir.path().join(frame_name("swing", 3)).exists());
    }

    #[test]
    fn test_real_mover_creates_phase_folders_even_without_frames() {
        let dir = TempDir::new().unwrap();

        let report = sort(dir.path());

        assert_eq!(report, SortReport::default());
        for phase in SwingPhase::ALL {
            assert!(dir.path().join(phase.dir_name()).is_dir());
        }
    }

    #[test]
    fn test_separate_target_directory() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_frames(source.path(), "swing", &[0, 1]);

        SortSwingPhasesUseCase::new(Box::new(FsFileMover), Box::new(NullPipelineLogger))
            .execute(source.path(), target.path())
            .unwrap();

        assert_eq!(
            phase_contents(target.path(), SwingPhase::ToeUp),
            vec![frame_name("swing", 1)]
        );
    }

    #[test]
    fn test_missing_source_is_list_error() {
        let dir = TempDir::new().unwrap();
        let mut use_case =
            SortSwingPhasesUseCase::new(Box::new(FsFileMover), Box::new(NullPipelineLogger));
        let result = use_case.execute(&dir.path().join("missing"), dir.path());
        assert!(matches!(result, Err(SortError::ListDir { .. })));
    }
}
