pub mod dry_run_file_mover;
pub mod fs_file_mover;
