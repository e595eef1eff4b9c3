use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Model artifact unavailable: {0}")]
    ArtifactUnavailable(String),

    #[error("Predicted class index {index} is outside the label table (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Read error: {0}")]
    Read(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Short machine-readable name, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::ArtifactUnavailable(_) => "artifact_unavailable",
            Error::IndexOutOfRange { .. } => "index_out_of_range",
            Error::Read(_) => "read",
            Error::Inference(_) => "inference",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
            Error::Serialization(_) => "serialization",
            Error::External(_) => "external",
        }
    }

    /// True when the caller sent something wrong, as opposed to the server failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
