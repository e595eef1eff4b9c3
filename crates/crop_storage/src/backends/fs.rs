use std::path::Path;
use async_trait::async_trait;
use crop_core::{Artifact, ArtifactStore, Result};
use tracing::debug;
use crate::StoreConfig;

/// Reads every artifact straight from disk on each call.
#[derive(Debug, Clone)]
pub struct FsStore {
    config: StoreConfig,
}

impl FsStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn path(&self, artifact: Artifact) -> &Path {
        match artifact {
            Artifact::Model => &self.config.model_path,
            Artifact::Dataset => &self.config.dataset_path,
            Artifact::Notebook => &self.config.notebook_path,
        }
    }
}

#[async_trait]
impl ArtifactStore for FsStore {
    async fn read(&self, artifact: Artifact) -> Result<Vec<u8>> {
        let path = self.path(artifact);
        debug!(%artifact, path = %path.display(), "reading artifact");
        tokio::fs::read(path)
            .await
            .map_err(|e| artifact.error(format!("{}: {}", path.display(), e)))
    }

    fn location(&self, artifact: Artifact) -> String {
        self.path(artifact).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crop_core::Error;
    use std::io::Write;

    #[tokio::test]
    async fn test_fs_store_reads_configured_paths() {
        let dir = tempfile::tempdir().unwrap();
        let dataset_path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&dataset_path).unwrap();
        file.write_all(b"N,label\n1,rice\n").unwrap();

        let store = FsStore::new(StoreConfig {
            model_path: dir.path().join("missing.json"),
            dataset_path: dataset_path.clone(),
            notebook_path: dir.path().join("missing.ipynb"),
        });

        let bytes = store.read(Artifact::Dataset).await.unwrap();
        assert_eq!(bytes, b"N,label\n1,rice\n");
        assert_eq!(store.location(Artifact::Dataset), dataset_path.display().to_string());
    }

    #[tokio::test]
    async fn test_fs_store_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(StoreConfig {
            model_path: dir.path().join("model.json"),
            dataset_path: dir.path().join("data.csv"),
            notebook_path: dir.path().join("nb.ipynb"),
        });

        assert!(matches!(
            store.read(Artifact::Model).await,
            Err(Error::ArtifactUnavailable(_))
        ));
        assert!(matches!(store.read(Artifact::Dataset).await, Err(Error::Read(_))));
        assert!(matches!(store.read(Artifact::Notebook).await, Err(Error::Read(_))));
    }
}
