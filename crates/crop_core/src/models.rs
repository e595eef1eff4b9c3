use std::fmt;
use crate::types::FeatureVector;
use crate::Result;

pub trait Classifier: Send + Sync + fmt::Debug {
    /// Short name of the estimator family, for logs
    fn name(&self) -> &str;

    /// Number of classes the model was trained on
    fn n_classes(&self) -> usize;

    /// Predict one class index per row of `batch`
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<usize>>;
}
