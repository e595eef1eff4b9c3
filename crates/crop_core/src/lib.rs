pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::Classifier;
pub use storage::{Artifact, ArtifactStore};
pub use types::{
    Crop, FeatureVector, Page, PageRequest, Prediction, PredictionInput, FEATURE_COUNT,
    FEATURE_NAMES, MAX_PAGE_SIZE,
};

pub mod prelude {
    pub use crate::{Artifact, ArtifactStore, Classifier, Crop, Error, PredictionInput, Result};
}
