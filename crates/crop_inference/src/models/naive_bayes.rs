use std::f64::consts::PI;
use serde::{Deserialize, Serialize};
use crop_core::{Classifier, Error, FeatureVector, Result};
use super::argmax;

/// Gaussian naive Bayes with per-class feature means and variances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNb {
    pub class_prior: Vec<f64>,
    pub theta: Vec<Vec<f64>>,
    pub var: Vec<Vec<f64>>,
}

impl GaussianNb {
    pub fn validate(&self, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
        if self.class_prior.len() != n_classes {
            return Err(format!(
                "class_prior has {} classes, expected {}",
                self.class_prior.len(),
                n_classes
            ));
        }
        if self.class_prior.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err("class priors must be positive".to_string());
        }
        for (name, rows) in [("theta", &self.theta), ("var", &self.var)] {
            if rows.len() != n_classes || rows.iter().any(|row| row.len() != n_features) {
                return Err(format!("{} must be {} x {}", name, n_classes, n_features));
            }
            if rows.iter().flatten().any(|v| !v.is_finite()) {
                return Err(format!("{} has non-finite values", name));
            }
        }
        if self.var.iter().flatten().any(|v| *v <= 0.0) {
            return Err("variances must be positive".to_string());
        }
        Ok(())
    }

    pub fn joint_log_likelihood(&self, x: &FeatureVector) -> Vec<f64> {
        self.class_prior
            .iter()
            .zip(self.theta.iter().zip(&self.var))
            .map(|(prior, (theta, var))| {
                let log_likelihood: f64 = x
                    .iter()
                    .zip(theta.iter().zip(var))
                    .map(|(xi, (mean, variance))| {
                        -0.5 * (2.0 * PI * variance).ln() - 0.5 * (xi - mean).powi(2) / variance
                    })
                    .sum();
                prior.ln() + log_likelihood
            })
            .collect()
    }
}

impl Classifier for GaussianNb {
    fn name(&self) -> &str {
        "gaussian_nb"
    }

    fn n_classes(&self) -> usize {
        self.class_prior.len()
    }

    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<usize>> {
        batch
            .iter()
            .map(|x| {
                argmax(&self.joint_log_likelihood(x))
                    .ok_or_else(|| Error::Inference("model has no classes".to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_class() -> GaussianNb {
        GaussianNb {
            class_prior: vec![0.5, 0.5],
            theta: vec![vec![0.0; 7], vec![100.0; 7]],
            var: vec![vec![1.0; 7], vec![1.0; 7]],
        }
    }

    #[test]
    fn test_nearest_mean_wins() {
        let model = two_class();
        assert!(model.validate(7, 2).is_ok());
        assert_eq!(model.predict(&[[1.0; 7], [95.0; 7]]).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_prior_breaks_tie() {
        let mut model = two_class();
        model.class_prior = vec![0.2, 0.8];
        assert_eq!(model.predict(&[[50.0; 7]]).unwrap(), vec![1]);
    }

    #[test]
    fn test_validation() {
        let mut model = two_class();
        model.var[1][3] = 0.0;
        assert!(model.validate(7, 2).unwrap_err().contains("variances"));

        let model = two_class();
        assert!(model.validate(6, 2).unwrap_err().contains("theta"));
        assert!(model.validate(7, 3).unwrap_err().contains("class_prior"));
    }
}
