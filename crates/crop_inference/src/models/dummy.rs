use crop_core::{Classifier, FeatureVector, Result};

/// Always predicts the same class index. Handy for exercising the serving
/// path without a trained artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantModel {
    pub class_index: usize,
    pub n_classes: usize,
}

impl ConstantModel {
    pub fn new(class_index: usize, n_classes: usize) -> Self {
        Self { class_index, n_classes }
    }
}

impl Classifier for ConstantModel {
    fn name(&self) -> &str {
        "constant"
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<usize>> {
        Ok(vec![self.class_index; batch.len()])
    }
}
