//! Kernel trait definition

use crate::core::{batch_dim, ClassifierError, FeatureVector, KernelMatrix, Result};

/// Kernel function trait
///
/// A kernel function K(x, y) must satisfy Mercer's condition to be valid for SVM.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y) for two vectors of equal dimension
    fn compute(&self, x: &[f64], y: &[f64]) -> f64;

    /// Compute the pairwise kernel matrix of shape `[x1.len(), x2.len()]`
    ///
    /// Every vector in both sets must share one dimension, otherwise
    /// `ShapeMismatch` is returned and nothing is computed.
    fn matrix(&self, x1: &[FeatureVector], x2: &[FeatureVector]) -> Result<KernelMatrix> {
        let d1 = batch_dim(x1)?;
        let d2 = batch_dim(x2)?;
        if let (Some(expected), Some(actual)) = (d1, d2) {
            if expected != actual {
                return Err(ClassifierError::ShapeMismatch { expected, actual });
            }
        }

        let mut k = KernelMatrix::zeros(x1.len(), x2.len());
        for (i, a) in x1.iter().enumerate() {
            for (j, b) in x2.iter().enumerate() {
                k.set(i, j, self.compute(&a.values, &b.values));
            }
        }
        Ok(k)
    }
}
