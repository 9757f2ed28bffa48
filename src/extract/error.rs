use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::ShapeError;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("File not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Invalid JSON in file: {}", path.display())]
    InputMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected report layout in {}: {source}", path.display())]
    UnexpectedLayout {
        path: PathBuf,
        #[source]
        source: ShapeError,
    },

    #[error("invalid screenshot entry #{index} ({name}): {source}")]
    InvalidEntry {
        index: usize,
        name: String,
        #[source]
        source: ShapeError,
    },

    #[error("failed to read {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create output directory {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {entry} to {}: {source}", path.display())]
    WriteFailed {
        entry: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
