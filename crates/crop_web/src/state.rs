use std::sync::Arc;
use crop_core::ArtifactStore;
use crop_inference::PredictionService;

pub struct AppState {
    pub store: Arc<dyn ArtifactStore>,
    pub prediction: PredictionService,
}

impl AppState {
    pub fn new(store: Arc<dyn ArtifactStore>, prediction: PredictionService) -> Self {
        Self { store, prediction }
    }
}
