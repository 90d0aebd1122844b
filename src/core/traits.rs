//! Core traits for stress-level classification

use crate::core::{ClassId, FeatureVector, Result};

/// A trained classifier mapping feature vectors to class identifiers
///
/// The one-vs-rest SVM, the random forest and the k-nearest-neighbors
/// back-ends all expose this contract, so their answers are interchangeable
/// from the caller's point of view.
pub trait Classifier: Send + Sync {
    /// Predict one class identifier per input vector
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<ClassId>>;

    /// Predict a single vector
    fn predict_one(&self, sample: &FeatureVector) -> Result<ClassId> {
        let labels = self.predict(std::slice::from_ref(sample))?;
        labels.into_iter().next().ok_or_else(|| {
            crate::core::ClassifierError::InvalidModel(
                "classifier returned no prediction".to_string(),
            )
        })
    }

    /// Human readable name of the back-end
    fn name(&self) -> &str {
        "classifier"
    }
}
