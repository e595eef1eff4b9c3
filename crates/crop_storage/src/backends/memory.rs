use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use crop_core::{Artifact, ArtifactStore, Result};
use tokio::sync::RwLock;

/// Artifact store held in memory, used by tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: RwLock<HashMap<Artifact, Vec<u8>>>,
    reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, artifact: Artifact, contents: impl Into<Vec<u8>>) {
        self.artifacts.write().await.insert(artifact, contents.into());
    }

    pub async fn remove(&self, artifact: Artifact) {
        self.artifacts.write().await.remove(&artifact);
    }

    /// Number of `read` calls served so far, successful or not.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn read(&self, artifact: Artifact) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.artifacts
            .read()
            .await
            .get(&artifact)
            .cloned()
            .ok_or_else(|| artifact.error("not found in memory store"))
    }

    fn location(&self, artifact: Artifact) -> String {
        format!("memory://{}", artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crop_core::Error;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        store.insert(Artifact::Notebook, "{}").await;

        assert_eq!(store.read(Artifact::Notebook).await.unwrap(), b"{}");
        assert!(matches!(
            store.read(Artifact::Model).await,
            Err(Error::ArtifactUnavailable(_))
        ));
        assert_eq!(store.reads(), 2);

        store.remove(Artifact::Notebook).await;
        assert!(matches!(store.read(Artifact::Notebook).await, Err(Error::Read(_))));
    }
}
