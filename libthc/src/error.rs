use std::{io, path::PathBuf};

use thiserror::Error;

/// Conditions that stop a run from producing any output.
///
/// Per-archive, per-member and per-record problems never show up here; the
/// scanner logs and skips them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No matching archives found in {0}")]
    NoArchives(PathBuf),

    #[error("Cannot derive an output name from {0}")]
    NoBaseName(PathBuf),

    #[error("Failed to create output directory {path}: {source}")]
    CreateOutputDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    WriteOutput { path: PathBuf, source: io::Error },

    #[error("Failed to read config {path}: {source}")]
    ReadConfig { path: PathBuf, source: io::Error },

    #[error("Invalid config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("No daily files with parseable dates found in {0}")]
    NoDailyFiles(PathBuf),

    #[error("Key '{0}' not found in input file")]
    KeyNotFound(String),

    #[error("Failed to read counts from {path}: {source}")]
    ReadCounts {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
