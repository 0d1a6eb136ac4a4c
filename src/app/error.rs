// src/app/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Terminal failure of a thumbnail fetch. The task is skipped, never retried.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("io: {0}")]
    Io(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported image type: {}", .0.display())]
    UnsupportedExtension(PathBuf),
    #[error("path is not valid UTF-8: {}", .0.display())]
    NotUtf8(PathBuf),
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
