pub mod image_file_reader;
pub mod image_file_writer;
pub mod system_image_viewer;
