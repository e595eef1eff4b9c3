use serde::{Deserialize, Serialize};
use crop_core::{Classifier, Error, FeatureVector, Result};
use super::argmax;
use super::tree::DecisionTree;

/// Bagged trees voting by averaged class probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn validate(&self, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features, n_classes)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    pub fn predict_proba(&self, x: &FeatureVector) -> Result<Vec<f64>> {
        let mut votes = vec![0.0; self.n_classes()];
        for tree in &self.trees {
            let proba = tree.predict_proba(x)?;
            if proba.len() != votes.len() {
                return Err(Error::Inference("trees disagree on class count".to_string()));
            }
            votes.iter_mut().zip(proba).for_each(|(v, p)| *v += p);
        }
        let n_trees = self.trees.len() as f64;
        Ok(votes.into_iter().map(|v| v / n_trees).collect())
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn n_classes(&self) -> usize {
        self.trees.first().map(|t| t.n_classes()).unwrap_or(0)
    }

    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<usize>> {
        batch
            .iter()
            .map(|x| {
                let proba = self.predict_proba(x)?;
                argmax(&proba).ok_or_else(|| Error::Inference("forest has no classes".to_string()))
            })
            .collect()
    }
}
