use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience type for results returned by the workload driver.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading keys, parsing arguments or reporting. The trees themselves never
/// fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read `{}`: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse keys in `{}`: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("{0}")]
    Usage(String),
}
