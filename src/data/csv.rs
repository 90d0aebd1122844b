//! CSV feature batches
//!
//! Each row holds the five indicators in feature order, optionally followed
//! by a class label column. A header row is detected automatically, and
//! blank lines and `#` comments are skipped.

use crate::core::{ClassId, ClassifierError, FeatureVector, Result, N_FEATURES};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Feature vectors read from CSV, with labels when every row carries one
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDataset {
    samples: Vec<FeatureVector>,
    labels: Option<Vec<ClassId>>,
}

impl FeatureDataset {
    /// Load a stress-indicator dataset from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(ClassifierError::IoError)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dataset with the standard five feature columns
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader_with_features(reader, N_FEATURES)
    }

    /// Load a dataset with `n_features` feature columns
    ///
    /// Rows with `n_features + 1` fields carry a label in the last column.
    /// Either every row is labelled or none is.
    pub fn from_reader_with_features<R: BufRead>(reader: R, n_features: usize) -> Result<Self> {
        let mut samples = Vec::new();
        let mut labels = Vec::new();
        let mut labelled: Option<bool> = None;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(ClassifierError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if samples.is_empty() && Self::is_header_line(line) {
                continue;
            }

            let (features, label) = Self::parse_data_line(line, n_features)
                .map_err(|e| ClassifierError::ParseError(format!("line {}: {e}", line_no + 1)))?;

            match (labelled, label) {
                (None, _) => labelled = Some(label.is_some()),
                (Some(true), None) | (Some(false), Some(_)) => {
                    return Err(ClassifierError::ParseError(format!(
                        "line {}: rows mix labelled and unlabelled data",
                        line_no + 1
                    )));
                }
                _ => {}
            }

            samples.push(features);
            if let Some(label) = label {
                labels.push(label);
            }
        }

        if samples.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }

        Ok(Self {
            samples,
            labels: labelled.filter(|&l| l).map(|_| labels),
        })
    }

    /// A header has mostly non-numeric fields
    fn is_header_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();
        let non_numeric = fields
            .iter()
            .filter(|field| field.trim().parse::<f64>().is_err())
            .count();
        non_numeric * 2 > fields.len()
    }

    fn parse_data_line(
        line: &str,
        n_features: usize,
    ) -> std::result::Result<(FeatureVector, Option<ClassId>), String> {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();

        let label = match fields.len() {
            n if n == n_features => None,
            n if n == n_features + 1 => {
                let raw = fields[n_features];
                Some(
                    raw.parse::<ClassId>()
                        .map_err(|_| format!("Invalid label: {raw}"))?,
                )
            }
            n => {
                return Err(format!(
                    "expected {n_features} features (plus optional label), got {n} fields"
                ))
            }
        };

        let values = fields[..n_features]
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                field.parse::<f64>().map_err(|_| {
                    format!("Invalid feature value at column {}: {}", idx + 1, field)
                })
            })
            .collect::<std::result::Result<Vec<f64>, String>>()?;

        Ok((FeatureVector::new(values), label))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[FeatureVector] {
        &self.samples
    }

    /// Labels, if the file carried a label column
    pub fn labels(&self) -> Option<&[ClassId]> {
        self.labels.as_deref()
    }

    /// Fraction of predictions matching the stored labels
    pub fn accuracy(&self, predictions: &[ClassId]) -> Option<f64> {
        let labels = self.labels.as_ref()?;
        if predictions.len() != labels.len() {
            return None;
        }
        let correct = predictions
            .iter()
            .zip(labels.iter())
            .filter(|(pred, actual)| pred == actual)
            .count();
        Some(correct as f64 / labels.len() as f64)
    }
}
