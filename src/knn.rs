//! k-nearest-neighbors classifier
//!
//! kNN is a lazy learner: the trained artifact is just the stored samples
//! and their labels. Prediction finds the `k` closest stored samples by
//! Euclidean distance and takes a majority vote.

use crate::core::{batch_dim, ClassId, Classifier, ClassifierError, FeatureVector, Result};
use std::collections::BTreeMap;

/// k-nearest-neighbors over a fixed set of labelled samples
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    samples: Vec<FeatureVector>,
    labels: Vec<ClassId>,
    dim: usize,
}

impl KnnClassifier {
    /// Create a classifier from stored samples
    ///
    /// # Errors
    /// `InvalidModel` when there are no samples, `k` is zero or larger than
    /// the sample count, labels do not match samples, or samples are ragged.
    pub fn new(k: usize, samples: Vec<FeatureVector>, labels: Vec<ClassId>) -> Result<Self> {
        if samples.is_empty() {
            return Err(ClassifierError::InvalidModel(
                "kNN model has no stored samples".to_string(),
            ));
        }
        if k == 0 || k > samples.len() {
            return Err(ClassifierError::InvalidModel(format!(
                "k must be within 1..={}, got {k}",
                samples.len()
            )));
        }
        if labels.len() != samples.len() {
            return Err(ClassifierError::InvalidModel(format!(
                "{} samples but {} labels",
                samples.len(),
                labels.len()
            )));
        }
        let dim = batch_dim(&samples)
            .map_err(|e| ClassifierError::InvalidModel(format!("stored samples: {e}")))?
            .unwrap_or(0);

        Ok(Self {
            k,
            samples,
            labels,
            dim,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of stored samples
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[FeatureVector] {
        &self.samples
    }

    pub fn labels(&self) -> &[ClassId] {
        &self.labels
    }

    fn predict_sample(&self, x: &FeatureVector) -> Result<ClassId> {
        let mut distances = Vec::with_capacity(self.samples.len());
        for (sample, &label) in self.samples.iter().zip(self.labels.iter()) {
            distances.push((x.squared_distance(sample)?, label));
        }
        // Stable sort keeps stored order among equidistant samples
        distances.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut votes: BTreeMap<ClassId, usize> = BTreeMap::new();
        for &(_, label) in &distances[..self.k] {
            *votes.entry(label).or_insert(0) += 1;
        }

        // BTreeMap iterates ascending, so the smallest class wins a tied vote
        let mut winner = (0, 0);
        for (label, count) in votes {
            if count > winner.1 {
                winner = (label, count);
            }
        }
        Ok(winner.0)
    }
}

impl Classifier for KnnClassifier {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<ClassId>> {
        if let Some(actual) = batch_dim(batch)? {
            if actual != self.dim {
                return Err(ClassifierError::ShapeMismatch {
                    expected: self.dim,
                    actual,
                });
            }
        }
        batch.iter().map(|x| self.predict_sample(x)).collect()
    }

    fn name(&self) -> &str {
        "knn"
    }
}
