use serde::{Deserialize, Serialize};
use crop_core::{Classifier, Error, FeatureVector, Result};
use super::argmax;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Rows with `x[feature] <= threshold` go to `left`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class counts or probabilities reaching this leaf.
    Leaf { distribution: Vec<f64> },
}

/// A binary decision tree stored as a flat node array rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    pub fn validate(&self, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(format!("node {} splits on feature {} of {}", i, feature, n_features));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", i));
                    }
                    // children always come after their parent, so every walk terminates
                    for child in [*left, *right] {
                        if child <= i || child >= len {
                            return Err(format!("node {} has invalid child {}", i, child));
                        }
                    }
                }
                Node::Leaf { distribution } => {
                    if distribution.len() != n_classes {
                        return Err(format!(
                            "leaf {} has {} classes, expected {}",
                            i,
                            distribution.len(),
                            n_classes
                        ));
                    }
                    if distribution.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(format!("leaf {} has a negative or non-finite weight", i));
                    }
                    if distribution.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("leaf {} is empty", i));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walks from the root to the leaf `x` falls into.
    pub fn leaf(&self, x: &FeatureVector) -> Result<&[f64]> {
        let mut index = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(Node::Split { feature, threshold, left, right }) => {
                    let value = x.get(*feature).ok_or_else(|| {
                        Error::Inference(format!("feature {} out of range", feature))
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                Some(Node::Leaf { distribution }) => return Ok(distribution.as_slice()),
                None => return Err(Error::Inference(format!("tree node {} missing", index))),
            }
        }
        Err(Error::Inference("tree walk did not reach a leaf".to_string()))
    }

    /// Leaf distribution scaled to sum to one.
    pub fn predict_proba(&self, x: &FeatureVector) -> Result<Vec<f64>> {
        let leaf = self.leaf(x)?;
        let total: f64 = leaf.iter().sum();
        Ok(leaf.iter().map(|v| v / total).collect())
    }
}

impl Classifier for DecisionTree {
    fn name(&self) -> &str {
        "decision_tree"
    }

    fn n_classes(&self) -> usize {
        self.nodes
            .iter()
            .find_map(|node| match node {
                Node::Leaf { distribution } => Some(distribution.len()),
                Node::Split { .. } => None,
            })
            .unwrap_or(0)
    }

    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<usize>> {
        batch
            .iter()
            .map(|x| {
                let leaf = self.leaf(x)?;
                argmax(leaf).ok_or_else(|| Error::Inference("empty leaf".to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(n_classes: usize, class: usize) -> Node {
        let mut distribution = vec![0.0; n_classes];
        distribution[class] = 5.0;
        Node::Leaf { distribution }
    }

    fn stump() -> DecisionTree {
        DecisionTree {
            nodes: vec![
                Node::Split { feature: 6, threshold: 150.0, left: 1, right: 2 },
                leaf(3, 1),
                leaf(3, 0),
            ],
        }
    }

    #[test]
    fn test_tree_prediction() {
        let tree = stump();
        assert!(tree.validate(7, 3).is_ok());
        let wet = [90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9];
        let dry = [90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 150.0];
        assert_eq!(tree.predict(&[wet, dry]).unwrap(), vec![0, 1]);
        assert_eq!(tree.n_classes(), 3);
        assert_eq!(tree.predict_proba(&wet).unwrap(), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_tree_validation() {
        let mut tree = stump();
        assert!(tree.validate(7, 4).unwrap_err().contains("expected 4"));
        assert!(tree.validate(6, 3).unwrap_err().contains("feature 6"));

        tree.nodes[0] = Node::Split { feature: 0, threshold: 1.0, left: 0, right: 2 };
        assert!(tree.validate(7, 3).unwrap_err().contains("invalid child 0"));

        let empty = DecisionTree { nodes: vec![] };
        assert!(empty.validate(7, 3).is_err());
    }

    #[test]
    fn test_cyclic_tree_does_not_hang() {
        let tree = DecisionTree {
            nodes: vec![Node::Split { feature: 0, threshold: 1.0, left: 0, right: 0 }],
        };
        assert!(tree.predict(&[[0.0; 7]]).is_err());
    }
}
