use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crop_core::{Artifact, ArtifactStore, Classifier, Crop, Result, FEATURE_COUNT};
use tracing::debug;

pub mod dummy;
pub mod forest;
pub mod naive_bayes;
pub mod tree;

pub use dummy::ConstantModel;
pub use forest::RandomForest;
pub use naive_bayes::GaussianNb;
pub use tree::{DecisionTree, Node};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
    GaussianNb(GaussianNb),
}

/// JSON model file: a small header plus one estimator, e.g.
/// `{"format_version": 1, "n_features": 7, "n_classes": 22, "estimator": {"kind": "random_forest", "trees": [...]}}`.
///
/// The header must match the feature layout and the crop label table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub n_features: usize,
    pub n_classes: usize,
    pub estimator: Estimator,
}

impl ModelArtifact {
    pub fn new(estimator: Estimator) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            n_features: FEATURE_COUNT,
            n_classes: Crop::COUNT,
            estimator,
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Artifact::Model.error(e))
    }

    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.format_version != FORMAT_VERSION {
            return Err(Artifact::Model.error(format!(
                "unsupported format_version {}, expected {}",
                self.format_version, FORMAT_VERSION
            )));
        }
        if self.n_features != FEATURE_COUNT {
            return Err(Artifact::Model.error(format!(
                "model expects {} features, inputs have {}",
                self.n_features, FEATURE_COUNT
            )));
        }
        if self.n_classes != Crop::COUNT {
            return Err(Artifact::Model.error(format!(
                "model has {} classes but the label table has {}",
                self.n_classes,
                Crop::COUNT
            )));
        }
        let shape = match &self.estimator {
            Estimator::DecisionTree(m) => m.validate(self.n_features, self.n_classes),
            Estimator::RandomForest(m) => m.validate(self.n_features, self.n_classes),
            Estimator::GaussianNb(m) => m.validate(self.n_features, self.n_classes),
        };
        shape.map_err(|e| Artifact::Model.error(e))
    }

    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>> {
        self.validate()?;
        let model: Arc<dyn Classifier> = match self.estimator {
            Estimator::DecisionTree(m) => Arc::new(m),
            Estimator::RandomForest(m) => Arc::new(m),
            Estimator::GaussianNb(m) => Arc::new(m),
        };
        Ok(model)
    }
}

pub fn load_model(bytes: &[u8]) -> Result<Arc<dyn Classifier>> {
    let model = ModelArtifact::from_slice(bytes)?.into_classifier()?;
    debug!(model = model.name(), classes = model.n_classes(), "model deserialized");
    Ok(model)
}

pub async fn load_from_store(store: &dyn ArtifactStore) -> Result<Arc<dyn Classifier>> {
    let bytes = store.read(Artifact::Model).await?;
    load_model(&bytes)
}

/// Index of the largest value; ties resolve to the lowest index.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
