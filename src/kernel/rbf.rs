//! RBF (Radial Basis Function) kernel implementation
//!
//! The RBF kernel is defined as: K(x, y) = exp(-γ * ||x - y||²)
//! where γ (gamma) is a hyperparameter that controls the kernel width.

use crate::core::types::squared_euclidean_distance;
use crate::core::{ClassifierError, FeatureVector, KernelMatrix, Result};
use crate::kernel::Kernel;

/// Gamma used by the shipped stress models
pub const DEFAULT_GAMMA: f64 = 0.1;

/// RBF (Radial Basis Function) kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// The gamma parameter controls the "reach" of each support vector:
/// - High gamma: only close points are similar
/// - Low gamma: distant points still contribute
///
/// Gamma is fixed when the model is trained and is never re-estimated
/// at inference time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RBFKernel {
    gamma: f64,
}

impl RBFKernel {
    /// Create a new RBF kernel with specified gamma parameter
    ///
    /// # Errors
    /// Returns `InvalidParameter` if gamma is not a positive finite number
    pub fn new(gamma: f64) -> Result<Self> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(ClassifierError::InvalidParameter(format!(
                "Gamma must be positive, got: {gamma}"
            )));
        }
        Ok(Self { gamma })
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for RBFKernel {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl Kernel for RBFKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        (-self.gamma * squared_euclidean_distance(x, y)).exp()
    }
}

/// Pairwise RBF similarity between two sets of vectors
///
/// Entry `[i, j]` is `exp(-gamma * ||x1[i] - x2[j]||²)`.
pub fn rbf_kernel(x1: &[FeatureVector], x2: &[FeatureVector], gamma: f64) -> Result<KernelMatrix> {
    RBFKernel::new(gamma)?.matrix(x1, x2)
}
