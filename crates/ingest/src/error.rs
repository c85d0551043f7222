use core_types::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no {column:?} column", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{}, line {line}: invalid {column} value {value:?}", path.display())]
    InvalidField {
        path: PathBuf,
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("{}, line {line}: {source}", path.display())]
    InvalidRecord {
        path: PathBuf,
        line: u64,
        #[source]
        source: CoreError,
    },

    #[error("Failed to (de)serialize {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
