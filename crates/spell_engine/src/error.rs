use std::path::PathBuf;
use voxel_engine::{LimitExceeded, QueueError};

/// Why a cast failed. None of these mutate the world or touch undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpellError {
    #[error("No target")]
    NoTarget,

    #[error("Insufficient permission")]
    InsufficientPermission,

    /// The confirmed box is too large; the pending selection is dropped
    #[error(transparent)]
    LimitExceeded(#[from] LimitExceeded),

    #[error("Fill queue unavailable")]
    QueueUnavailable(#[from] QueueError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}
