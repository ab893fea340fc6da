use std::path::PathBuf;
use thiserror::Error;

/// Failures that end an invocation with a non-zero exit.
///
/// A JAR without a manifest is not an error; it is reported on the output.
#[derive(Error, Debug)]
pub enum JarVersionError {
    #[error("{0}")]
    Argument(String),

    #[error("failed to open JAR file {}: {cause:#}", .path.display())]
    ArchiveOpen { path: PathBuf, cause: anyhow::Error },

    #[error("failed to read MANIFEST.MF from {}: {cause:#}", .path.display())]
    EntryRead { path: PathBuf, cause: anyhow::Error },

    #[error("failed to compute MD5 hash of {}: {source}", .path.display())]
    HashCompute {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Sink(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JarVersionError>;
