//! Core type definitions for stress-level classification

use crate::core::{ClassifierError, Result};
use serde::{Deserialize, Serialize};

/// Class identifier produced by every classifier (0 = low, 1 = moderate, 2 = high stress)
pub type ClassId = u32;

/// Number of self-reported indicators in a feature vector
pub const N_FEATURES: usize = 5;

/// Indicator names in feature-vector order
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "self_esteem",
    "depression",
    "anxiety_level",
    "sleep_quality",
    "bullying",
];

/// Lower bound of every indicator scale
pub const INDICATOR_MIN: f64 = 0.0;

/// Upper bound of every indicator scale
pub const INDICATOR_MAX: f64 = 10.0;

/// Dense feature vector
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    /// Feature values in indicator order
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Create a new feature vector
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Dimensionality of the vector
    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Squared Euclidean distance to another vector of the same dimension
    ///
    /// ||x - y||² = Σᵢ (xᵢ - yᵢ)²
    pub fn squared_distance(&self, other: &FeatureVector) -> Result<f64> {
        if self.dim() != other.dim() {
            return Err(ClassifierError::ShapeMismatch {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        Ok(squared_euclidean_distance(&self.values, &other.values))
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<[f64; N_FEATURES]> for FeatureVector {
    fn from(values: [f64; N_FEATURES]) -> Self {
        Self::new(values.to_vec())
    }
}

/// Sum of squared per-dimension differences; callers check dimensions first.
pub(crate) fn squared_euclidean_distance(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}

/// Check that every vector in a batch has the same dimension
///
/// Returns the common dimension, or `None` for an empty batch.
pub fn batch_dim(batch: &[FeatureVector]) -> Result<Option<usize>> {
    let Some(first) = batch.first() else {
        return Ok(None);
    };
    let expected = first.dim();
    for vector in &batch[1..] {
        if vector.dim() != expected {
            return Err(ClassifierError::ShapeMismatch {
                expected,
                actual: vector.dim(),
            });
        }
    }
    Ok(Some(expected))
}

/// The five self-reported indicators of a student, each on a 0-10 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressIndicators {
    pub self_esteem: f64,
    pub depression: f64,
    pub anxiety_level: f64,
    pub sleep_quality: f64,
    pub bullying: f64,
}

impl StressIndicators {
    pub fn new(
        self_esteem: f64,
        depression: f64,
        anxiety_level: f64,
        sleep_quality: f64,
        bullying: f64,
    ) -> Self {
        Self {
            self_esteem,
            depression,
            anxiety_level,
            sleep_quality,
            bullying,
        }
    }

    /// Reject indicators outside [0, 10]
    ///
    /// Range checking belongs to whoever collects the input; the classifiers
    /// themselves never call this.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in FEATURE_NAMES.iter().zip(self.to_array()) {
            if !(INDICATOR_MIN..=INDICATOR_MAX).contains(&value) {
                return Err(ClassifierError::InvalidParameter(format!(
                    "{name} must be within [{INDICATOR_MIN}, {INDICATOR_MAX}], got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn to_array(&self) -> [f64; N_FEATURES] {
        [
            self.self_esteem,
            self.depression,
            self.anxiety_level,
            self.sleep_quality,
            self.bullying,
        ]
    }

    pub fn to_feature_vector(&self) -> FeatureVector {
        FeatureVector::from(self.to_array())
    }
}

impl Default for StressIndicators {
    /// Mid-scale answers, the starting position of the input form
    fn default() -> Self {
        Self::new(5.0, 5.0, 5.0, 5.0, 5.0)
    }
}

/// Row-major kernel matrix of shape `[rows, cols]`
#[derive(Debug, Clone, PartialEq)]
pub struct KernelMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl KernelMatrix {
    /// Create a zero-filled matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Get entry `[i, j]`
    ///
    /// # Panics
    /// Panics if the index is out of bounds
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "Kernel matrix index out of bounds");
        self.data[i * self.cols + j]
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.cols + j] = value;
    }

    /// Row `i` as a slice
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Matrix-vector product `K · w`
    pub fn dot(&self, weights: &[f64]) -> Result<Vec<f64>> {
        if weights.len() != self.cols {
            return Err(ClassifierError::ShapeMismatch {
                expected: self.cols,
                actual: weights.len(),
            });
        }
        Ok((0..self.rows)
            .map(|i| {
                self.row(i)
                    .iter()
                    .zip(weights.iter())
                    .map(|(k, w)| k * w)
                    .sum()
            })
            .collect())
    }
}

/// Prediction result containing class and winning decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class identifier
    pub class_id: ClassId,
    /// Decision value of the winning class
    pub decision_value: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(class_id: ClassId, decision_value: f64) -> Self {
        Self {
            class_id,
            decision_value,
        }
    }
}
