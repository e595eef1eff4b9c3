pub mod models;
pub mod service;

pub use models::{load_model, ModelArtifact};
pub use service::PredictionService;

/// When the model artifact is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelLoading {
    /// Read and deserialize the artifact on every prediction.
    #[default]
    PerRequest,
    /// Load once at startup and share the instance read-only.
    Preload,
}

pub mod prelude {
    pub use super::models::{ConstantModel, Estimator, ModelArtifact};
    pub use super::{ModelLoading, PredictionService};
    pub use crop_core::{Crop, Error, PredictionInput, Result};
}
