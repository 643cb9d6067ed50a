use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlacementError>;

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid CSV Header: {0}")]
    CsvHeader(String),

    #[error("Invalid CSV row {row}: expected {expected} columns, got {got}")]
    CsvRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Invalid value for '{column}' at row {row}: {value}")]
    ValueParse {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Position {index} out of range ({len} positions loaded)")]
    PositionIndex { index: usize, len: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("Failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create file {path}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open file {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<toml::de::Error> for PlacementError {
    fn from(err: toml::de::Error) -> Self {
        PlacementError::Config(format!("TOML parse error: {}", err))
    }
}
