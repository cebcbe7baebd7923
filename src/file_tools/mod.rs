mod file_matcher;
pub use file_matcher::*;

mod source_files;
pub use source_files::*;
