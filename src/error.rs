use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormSwapError {
    #[error("Lookup failed: no submodule `{segment}` while resolving `{path}`")]
    LookupFailure { path: String, segment: String },

    #[error("Cannot convert {kind}: {reason}")]
    ConversionFailure { kind: String, reason: String },

    #[error("Unsupported spatial rank {0}, expected 1, 2 or 3")]
    UnsupportedRank(usize),

    #[error("Duplicate child name `{0}`")]
    DuplicateChild(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl NormSwapError {
    pub(crate) fn lookup(path: &str, segment: &str) -> Self {
        NormSwapError::LookupFailure {
            path: path.to_string(),
            segment: segment.to_string(),
        }
    }

    pub(crate) fn conversion(kind: impl ToString, reason: impl Into<String>) -> Self {
        NormSwapError::ConversionFailure {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NormSwapError>;
