use std::fmt;
use async_trait::async_trait;
use crate::{Error, Result};

/// The read-only files the service serves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Model,
    Dataset,
    Notebook,
}

impl Artifact {
    /// Wraps a storage failure in the error kind callers expect for this artifact.
    pub fn error(self, reason: impl fmt::Display) -> Error {
        match self {
            Artifact::Model => Error::ArtifactUnavailable(format!("{}: {}", self, reason)),
            Artifact::Dataset | Artifact::Notebook => {
                Error::Read(format!("{}: {}", self, reason))
            }
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Model => f.write_str("model"),
            Artifact::Dataset => f.write_str("dataset"),
            Artifact::Notebook => f.write_str("notebook"),
        }
    }
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Read the full contents of an artifact
    async fn read(&self, artifact: Artifact) -> Result<Vec<u8>>;

    /// Human readable location of an artifact, for logs
    fn location(&self, artifact: Artifact) -> String;
}
