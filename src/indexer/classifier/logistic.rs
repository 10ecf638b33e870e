use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ClassifierError;
use crate::indexer::classifier::{check_finite, Classifier, ProbabilityModel, TrainingSet};
use crate::indexer::feature::{Feature, FeatureToggles, FeatureVector};

/// Logistic regression trained by batch gradient descent with L2
/// regularization on standardized features. Deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticRegression {
    pub learning_rate: f64,
    pub iterations: usize,
    pub l2: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            iterations: 400,
            l2: 1e-3,
        }
    }
}

/// Trained weights, one per enabled feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    toggles: FeatureToggles,
    features: Vec<Feature>,
    means: Vec<f64>,
    scales: Vec<f64>,
    weights: Vec<f64>,
    bias: f64,
}

#[inline]
fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl LogisticModel {
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn standardized(&self, vector: &FeatureVector) -> Vec<f64> {
        self.features
            .iter()
            .enumerate()
            .map(|(j, &f)| (vector.get(f) - self.means[j]) / self.scales[j])
            .collect()
    }

    fn score(&self, x: &[f64]) -> f64 {
        self.bias + x.iter().zip(&self.weights).map(|(a, w)| a * w).sum::<f64>()
    }
}

impl ProbabilityModel for LogisticModel {
    fn predict(&self, vector: &FeatureVector) -> Result<f64, ClassifierError> {
        check_finite(&self.toggles, vector)?;
        let x = self.standardized(vector);
        Ok(sigmoid(self.score(&x)))
    }
}

impl Classifier for LogisticRegression {
    type Model = LogisticModel;

    fn train(&self, data: &TrainingSet) -> Result<LogisticModel, ClassifierError> {
        if data.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        data.check_finite()?;

        let features: Vec<Feature> = data.toggles.enabled().collect();
        let n = data.len() as f64;
        let dims = features.len();

        let mut means = vec![0.0; dims];
        let mut scales = vec![1.0; dims];
        for (j, &f) in features.iter().enumerate() {
            let mean = data.examples.iter().map(|e| e.get(f)).sum::<f64>() / n;
            let var = data.examples.iter().map(|e| (e.get(f) - mean).powi(2)).sum::<f64>() / n;
            means[j] = mean;
            // constant columns keep scale 1
            if var > f64::EPSILON {
                scales[j] = var.sqrt();
            }
        }

        let mut model = LogisticModel {
            toggles: data.toggles,
            features,
            means,
            scales,
            weights: vec![0.0; dims],
            bias: 0.0,
        };
        let rows: Vec<Vec<f64>> = data.examples.iter().map(|e| model.standardized(e)).collect();
        let targets: Vec<f64> = data.examples.iter().map(|e| e.class_value.clamp(0.0, 1.0)).collect();

        for _ in 0..self.iterations {
            let mut grad = vec![0.0; dims];
            let mut grad_bias = 0.0;
            for (x, &y) in rows.iter().zip(&targets) {
                let err = sigmoid(model.score(x)) - y;
                for (g, a) in grad.iter_mut().zip(x) {
                    *g += err * a;
                }
                grad_bias += err;
            }
            for (w, g) in model.weights.iter_mut().zip(&grad) {
                *w -= self.learning_rate * (g / n + self.l2 * *w);
            }
            model.bias -= self.learning_rate * grad_bias / n;
        }

        if !model.bias.is_finite() || model.weights.iter().any(|w| !w.is_finite()) {
            return Err(ClassifierError::TrainingFailed {
                reason: "weights diverged".to_string(),
            });
        }
        debug!(weights = ?model.weights, bias = model.bias, "logistic weights");
        info!(
            examples = data.len(),
            positive = data.num_positive(),
            features = dims,
            "classifier trained"
        );
        Ok(model)
    }
}
