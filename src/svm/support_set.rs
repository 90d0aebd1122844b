//! Per-class support vectors and the bias-free decision function

use crate::core::{batch_dim, ClassifierError, FeatureVector, Result};
use crate::kernel::{Kernel, RBFKernel};
use serde::{Deserialize, Serialize};

/// Support vectors retained for one class of a one-vs-rest SVM
///
/// The three sequences are parallel: entry `k` of `dual_coefficients` and
/// `support_vector_labels` belongs to `support_vectors[k]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportVectorSet {
    /// Stored training samples
    pub support_vectors: Vec<FeatureVector>,
    /// Dual coefficient (alpha) per support vector
    pub dual_coefficients: Vec<f64>,
    /// Label per support vector, +1 for this class and -1 for the rest
    pub support_vector_labels: Vec<f64>,
}

impl SupportVectorSet {
    /// Create a support vector set, checking the parallel-length invariant
    pub fn new(
        support_vectors: Vec<FeatureVector>,
        dual_coefficients: Vec<f64>,
        support_vector_labels: Vec<f64>,
    ) -> Result<Self> {
        let set = Self {
            support_vectors,
            dual_coefficients,
            support_vector_labels,
        };
        set.validate()?;
        Ok(set)
    }

    /// Check that the three sequences have equal length and every support
    /// vector has the same dimension
    pub fn validate(&self) -> Result<()> {
        let n = self.support_vectors.len();
        if self.dual_coefficients.len() != n || self.support_vector_labels.len() != n {
            return Err(ClassifierError::InvalidModel(format!(
                "{} support vectors, {} dual coefficients and {} labels",
                n,
                self.dual_coefficients.len(),
                self.support_vector_labels.len()
            )));
        }
        batch_dim(&self.support_vectors).map_err(|e| {
            ClassifierError::InvalidModel(format!("ragged support vectors: {e}"))
        })?;
        Ok(())
    }

    /// Number of support vectors
    pub fn len(&self) -> usize {
        self.support_vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.support_vectors.is_empty()
    }

    /// Feature dimension of the stored vectors, if any
    pub fn dim(&self) -> Option<usize> {
        self.support_vectors.first().map(FeatureVector::dim)
    }

    /// Combined weights `alpha_k * y_k`
    pub fn weights(&self) -> Vec<f64> {
        self.dual_coefficients
            .iter()
            .zip(self.support_vector_labels.iter())
            .map(|(alpha, y)| alpha * y)
            .collect()
    }
}

/// Decision score of every query sample against one class
///
/// `score[i] = Σₖ K(query[i], sv[k]) · alpha_k · y_k`, the SVM decision
/// function with no bias term. An empty support set scores 0 everywhere.
pub fn decision_score(
    query: &[FeatureVector],
    support_set: &SupportVectorSet,
    kernel: &RBFKernel,
) -> Result<Vec<f64>> {
    support_set.validate()?;
    let k = kernel.matrix(query, &support_set.support_vectors)?;
    k.dot(&support_set.weights())
}

/// [`decision_score`] with the RBF kernel built from a raw `gamma`
pub fn decision_score_with_gamma(
    query: &[FeatureVector],
    support_set: &SupportVectorSet,
    gamma: f64,
) -> Result<Vec<f64>> {
    decision_score(query, support_set, &RBFKernel::new(gamma)?)
}
