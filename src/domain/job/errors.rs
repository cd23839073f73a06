//! Job Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Subtitle file is empty.")]
    EmptyFile,

    #[error("Only .{0} files are supported.")]
    UnsupportedExtension(String),

    #[error("Subtitle file must be {max} bytes or smaller (got {size}).")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Failed to read subtitle file: {0}")]
    Io(String),
}
