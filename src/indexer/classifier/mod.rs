//! Binary classification over candidate feature vectors.
//!
//! Any learner works as long as it is trained from a [`TrainingSet`] and
//! the resulting model returns the probability of the "is a topic" class.

pub mod logistic;

use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;
use crate::indexer::feature::{FeatureToggles, FeatureVector};

pub use logistic::{LogisticModel, LogisticRegression};

/// Feature vectors of every training candidate plus the toggles that
/// say which slots carry data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSet {
    pub toggles: FeatureToggles,
    pub examples: Vec<FeatureVector>,
}

impl TrainingSet {
    pub fn new(toggles: FeatureToggles) -> Self {
        Self {
            toggles,
            examples: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn num_positive(&self) -> usize {
        self.examples.iter().filter(|e| e.is_positive()).count()
    }

    /// Rejects NaN and infinite values in enabled slots
    pub fn check_finite(&self) -> Result<(), ClassifierError> {
        for example in &self.examples {
            check_finite(&self.toggles, example)?;
        }
        Ok(())
    }
}

pub(crate) fn check_finite(toggles: &FeatureToggles, vector: &FeatureVector) -> Result<(), ClassifierError> {
    for feature in toggles.enabled() {
        let value = vector.get(feature);
        if !value.is_finite() {
            return Err(ClassifierError::NonFiniteFeature {
                feature: feature.name(),
                value,
            });
        }
    }
    Ok(())
}

/// Trains a [`ProbabilityModel`]. A failure aborts the whole batch.
pub trait Classifier {
    type Model: ProbabilityModel;

    fn train(&self, data: &TrainingSet) -> Result<Self::Model, ClassifierError>;
}

/// Trained model, shared read-only between extraction threads
pub trait ProbabilityModel: Send + Sync {
    /// Probability in `[0, 1]` that the candidate is a topic
    fn predict(&self, vector: &FeatureVector) -> Result<f64, ClassifierError>;
}
