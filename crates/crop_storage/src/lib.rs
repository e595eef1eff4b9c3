use std::path::PathBuf;
use std::sync::Arc;
use crop_core::ArtifactStore;

pub mod backends;
pub mod dataset;
pub mod notebook;

pub use backends::*;
pub use dataset::{Dataset, Record};
pub use notebook::Notebook;

pub const DEFAULT_MODEL_PATH: &str = "./model/model.json";
pub const DEFAULT_DATASET_PATH: &str = "./dataset/Crop_recommendation.csv";
pub const DEFAULT_NOTEBOOK_PATH: &str = "./notebook/crop-recommendation-system.ipynb";

/// Locations of the artifacts on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
    pub notebook_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            notebook_path: PathBuf::from(DEFAULT_NOTEBOOK_PATH),
        }
    }
}

pub fn create_store(config: StoreConfig) -> Arc<dyn ArtifactStore> {
    Arc::new(FsStore::new(config))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_store, StoreConfig};
}
