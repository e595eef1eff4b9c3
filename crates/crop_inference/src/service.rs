use std::fmt;
use std::sync::Arc;
use crop_core::{Artifact, ArtifactStore, Classifier, Crop, Error, PredictionInput, Result};
use tracing::{debug, info, warn};
use crate::models::{load_from_store, load_model};
use crate::ModelLoading;

/// Turns soil and climate measurements into a crop label.
pub struct PredictionService {
    store: Arc<dyn ArtifactStore>,
    preloaded: Option<Arc<dyn Classifier>>,
}

impl fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionService")
            .field("model", &self.store.location(Artifact::Model))
            .field("loading", &self.loading())
            .finish()
    }
}

impl PredictionService {
    /// Reads the model from `store` on every prediction.
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store, preloaded: None }
    }

    /// Serves every prediction from an already loaded model, which must cover
    /// exactly the crop label table.
    pub fn with_model(store: Arc<dyn ArtifactStore>, model: Arc<dyn Classifier>) -> Result<Self> {
        if model.n_classes() != Crop::COUNT {
            return Err(Artifact::Model.error(format!(
                "{} has {} classes but the label table has {}",
                model.name(),
                model.n_classes(),
                Crop::COUNT
            )));
        }
        Ok(Self {
            store,
            preloaded: Some(model),
        })
    }

    /// Builds the service for startup, checking the artifact against the label table.
    ///
    /// A missing artifact is only fatal when preloading. An artifact that exists
    /// but does not load is always fatal.
    pub async fn start(store: Arc<dyn ArtifactStore>, loading: ModelLoading) -> Result<Self> {
        let location = store.location(Artifact::Model);
        match loading {
            ModelLoading::Preload => {
                let model = load_from_store(store.as_ref()).await?;
                info!("🧠 Model preloaded from {} (using {})", location, model.name());
                Self::with_model(store, model)
            }
            ModelLoading::PerRequest => {
                let bytes = match store.read(Artifact::Model).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("⚠️ {}; predictions will fail until it is available", e);
                        return Ok(Self::new(store));
                    }
                };
                let model = load_model(&bytes)?;
                info!("🧠 Model at {} verified (using {}), loading per request", location, model.name());
                Ok(Self::new(store))
            }
        }
    }

    pub fn loading(&self) -> ModelLoading {
        if self.preloaded.is_some() {
            ModelLoading::Preload
        } else {
            ModelLoading::PerRequest
        }
    }

    pub async fn model(&self) -> Result<Arc<dyn Classifier>> {
        match &self.preloaded {
            Some(model) => Ok(model.clone()),
            None => load_from_store(self.store.as_ref()).await,
        }
    }

    pub async fn predict(&self, input: &PredictionInput) -> Result<Crop> {
        input.validate()?;
        let model = self.model().await?;

        let batch = [input.to_features()];
        let classes = model.predict(&batch)?;
        let index = classes.first().copied().ok_or_else(|| {
            Error::Inference(format!("{} returned no prediction", model.name()))
        })?;
        let crop = Crop::for_class(index)?;

        debug!(model = model.name(), index, %crop, "prediction");
        Ok(crop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConstantModel, DecisionTree, Estimator, ModelArtifact, Node};
    use crop_storage::MemoryStore;

    fn rice_input() -> PredictionInput {
        PredictionInput {
            n: 90.0,
            p: 42.0,
            k: 43.0,
            temperature: 20.8,
            humidity: 82.0,
            ph: 6.5,
            rainfall: 202.9,
        }
    }

    fn one_hot(crop: Crop) -> Vec<f64> {
        let mut v = vec![0.0; Crop::COUNT];
        v[crop.index()] = 1.0;
        v
    }

    fn rainfall_tree() -> Vec<u8> {
        ModelArtifact::new(Estimator::DecisionTree(DecisionTree {
            nodes: vec![
                Node::Split { feature: 6, threshold: 150.0, left: 1, right: 2 },
                Node::Leaf { distribution: one_hot(Crop::Mothbeans) },
                Node::Leaf { distribution: one_hot(Crop::Rice) },
            ],
        }))
        .to_vec()
        .unwrap()
    }

    async fn store_with_model() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.insert(Artifact::Model, rainfall_tree()).await;
        store
    }

    #[tokio::test]
    async fn test_predict_reads_model_each_time() {
        let store = store_with_model().await;
        let service = PredictionService::new(store.clone());

        assert_eq!(service.predict(&rice_input()).await.unwrap(), Crop::Rice);
        let mut dry = rice_input();
        dry.rainfall = 40.0;
        assert_eq!(service.predict(&dry).await.unwrap(), Crop::Mothbeans);
        assert_eq!(store.reads(), 2);
    }

    #[tokio::test]
    async fn test_validation_happens_before_loading() {
        let store = store_with_model().await;
        let service = PredictionService::new(store.clone());
        let mut input = rice_input();
        input.ph = f64::NAN;

        let err = service.predict(&input).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.reads(), 0);
    }

    #[tokio::test]
    async fn test_missing_artifact() {
        let service = PredictionService::new(Arc::new(MemoryStore::new()));
        let err = service.predict(&rice_input()).await.unwrap_err();
        assert!(matches!(err, Error::ArtifactUnavailable(_)));
    }

    #[tokio::test]
    async fn test_index_out_of_range() {
        let store = Arc::new(MemoryStore::new());
        let service = PredictionService::with_model(
            store,
            Arc::new(ConstantModel::new(Crop::COUNT, Crop::COUNT)),
        )
        .unwrap();
        let err = service.predict(&rice_input()).await.unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 22, len: 22 }));
    }

    #[test]
    fn test_with_model_checks_label_table() {
        let store = Arc::new(MemoryStore::new());
        let err = PredictionService::with_model(store.clone(), Arc::new(ConstantModel::new(0, 30)))
            .unwrap_err();
        assert!(matches!(err, Error::ArtifactUnavailable(_)));
        assert!(err.to_string().contains("30 classes"));

        let service =
            PredictionService::with_model(store, Arc::new(ConstantModel::new(0, Crop::COUNT)))
                .unwrap();
        assert_eq!(service.loading(), ModelLoading::Preload);
    }

    #[tokio::test]
    async fn test_preload_reads_once() {
        let store = store_with_model().await;
        let service = PredictionService::start(store.clone(), ModelLoading::Preload)
            .await
            .unwrap();
        assert_eq!(service.loading(), ModelLoading::Preload);
        for _ in 0..3 {
            assert_eq!(service.predict(&rice_input()).await.unwrap(), Crop::Rice);
        }
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_start_per_request() {
        let missing = PredictionService::start(Arc::new(MemoryStore::new()), ModelLoading::PerRequest)
            .await
            .unwrap();
        assert_eq!(missing.loading(), ModelLoading::PerRequest);

        assert!(PredictionService::start(Arc::new(MemoryStore::new()), ModelLoading::Preload)
            .await
            .is_err());

        let corrupt = Arc::new(MemoryStore::new());
        corrupt.insert(Artifact::Model, "{}").await;
        let err = PredictionService::start(corrupt, ModelLoading::PerRequest)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ArtifactUnavailable(_)));
    }
}
