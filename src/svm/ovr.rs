//! One-vs-rest aggregation of per-class SVM decision scores

use crate::core::{ClassId, Classifier, ClassifierError, FeatureVector, Prediction, Result};
use crate::kernel::RBFKernel;
use crate::svm::support_set::{decision_score, SupportVectorSet};
use log::debug;

/// Ordered mapping from class identifier to that class's support vectors
///
/// Iteration follows insertion order. That order is also the tie-break
/// order of [`predict`]: on equal scores the earlier class wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OvrModel {
    classes: Vec<(ClassId, SupportVectorSet)>,
}

impl OvrModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from `(class, support set)` pairs in the given order
    pub fn from_classes<I>(classes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ClassId, SupportVectorSet)>,
    {
        let mut model = Self::new();
        for (class_id, set) in classes {
            model.insert(class_id, set)?;
        }
        Ok(model)
    }

    /// Append a class
    ///
    /// Duplicate class identifiers are rejected, as is a non-empty support
    /// set whose dimension differs from the classes already present.
    pub fn insert(&mut self, class_id: ClassId, set: SupportVectorSet) -> Result<()> {
        if self.get(class_id).is_some() {
            return Err(ClassifierError::InvalidModel(format!(
                "duplicate class identifier {class_id}"
            )));
        }
        set.validate()?;
        if let (Some(expected), Some(actual)) = (self.dim(), set.dim()) {
            if expected != actual {
                return Err(ClassifierError::InvalidModel(format!(
                    "class {class_id} has {actual}-dimensional support vectors, model has {expected}"
                )));
            }
        }
        self.classes.push((class_id, set));
        Ok(())
    }

    /// Feature dimension shared by every non-empty class
    pub fn dim(&self) -> Option<usize> {
        self.classes.iter().find_map(|(_, set)| set.dim())
    }

    pub fn get(&self, class_id: ClassId) -> Option<&SupportVectorSet> {
        self.classes
            .iter()
            .find(|(id, _)| *id == class_id)
            .map(|(_, set)| set)
    }

    /// Iterate classes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &SupportVectorSet)> {
        self.classes.iter().map(|(id, set)| (*id, set))
    }

    pub fn class_ids(&self) -> Vec<ClassId> {
        self.classes.iter().map(|(id, _)| *id).collect()
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Total number of support vectors across all classes
    pub fn n_support_vectors(&self) -> usize {
        self.classes.iter().map(|(_, set)| set.len()).sum()
    }
}

/// Per-class decision scores stacked as `[n_classes][n_samples]`
pub fn decision_matrix(
    query: &[FeatureVector],
    model: &OvrModel,
    kernel: &RBFKernel,
) -> Result<Vec<Vec<f64>>> {
    if model.is_empty() {
        return Err(ClassifierError::InvalidModel(
            "model has no classes to compare".to_string(),
        ));
    }
    model
        .iter()
        .map(|(_, set)| decision_score(query, set, kernel))
        .collect()
}

/// Arg-max over the stacked scores, one prediction per sample
///
/// Only a strictly greater score replaces the current best, so ties go to
/// the class inserted first.
pub fn predict_with_scores(
    query: &[FeatureVector],
    model: &OvrModel,
    kernel: &RBFKernel,
) -> Result<Vec<Prediction>> {
    let scores = decision_matrix(query, model, kernel)?;
    let class_ids = model.class_ids();

    let predictions = (0..query.len())
        .map(|i| {
            let mut best = Prediction::new(class_ids[0], scores[0][i]);
            for (c, class_scores) in scores.iter().enumerate().skip(1) {
                if class_scores[i] > best.decision_value {
                    best = Prediction::new(class_ids[c], class_scores[i]);
                }
            }
            best
        })
        .collect();

    Ok(predictions)
}

/// Predict a class identifier for every query sample
pub fn predict(query: &[FeatureVector], model: &OvrModel, kernel: &RBFKernel) -> Result<Vec<ClassId>> {
    Ok(predict_with_scores(query, model, kernel)?
        .into_iter()
        .map(|p| p.class_id)
        .collect())
}

/// [`predict`] with the RBF kernel built from a raw `gamma`
pub fn predict_with_gamma(
    query: &[FeatureVector],
    model: &OvrModel,
    gamma: f64,
) -> Result<Vec<ClassId>> {
    predict(query, model, &RBFKernel::new(gamma)?)
}

/// One-vs-rest RBF SVM classifier
///
/// Holds the trained model and its gamma read-only; any number of threads
/// may predict through a shared reference.
#[derive(Debug, Clone)]
pub struct OvrSvm {
    model: OvrModel,
    kernel: RBFKernel,
}

impl OvrSvm {
    /// Create a classifier from a trained model and its gamma
    pub fn new(model: OvrModel, gamma: f64) -> Result<Self> {
        if model.is_empty() {
            return Err(ClassifierError::InvalidModel(
                "model has no classes to compare".to_string(),
            ));
        }
        Ok(Self {
            model,
            kernel: RBFKernel::new(gamma)?,
        })
    }

    pub fn model(&self) -> &OvrModel {
        &self.model
    }

    pub fn gamma(&self) -> f64 {
        self.kernel.gamma()
    }

    /// Predictions together with the winning decision value
    pub fn predict_with_scores(&self, batch: &[FeatureVector]) -> Result<Vec<Prediction>> {
        predict_with_scores(batch, &self.model, &self.kernel)
    }

    /// Raw per-class scores, `[n_classes][n_samples]` in class order
    pub fn decision_matrix(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f64>>> {
        decision_matrix(batch, &self.model, &self.kernel)
    }
}

impl Classifier for OvrSvm {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<ClassId>> {
        debug!(
            "Scoring {} samples against {} classes ({} support vectors, gamma={})",
            batch.len(),
            self.model.len(),
            self.model.n_support_vectors(),
            self.kernel.gamma()
        );
        predict(batch, &self.model, &self.kernel)
    }

    fn name(&self) -> &str {
        "svm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(values: &[f64]) -> FeatureVector {
        FeatureVector::new(values.to_vec())
    }

    fn single(sv: &[f64], alpha: f64, label: f64) -> SupportVectorSet {
        SupportVectorSet::new(vec![fv(sv)], vec![alpha], vec![label]).unwrap()
    }

    #[test]
    fn test_nearest_class_wins() {
        let model = OvrModel::from_classes([
            (0, single(&[5.0; 5], 1.0, 1.0)),
            (1, single(&[0.0; 5], 1.0, 1.0)),
        ])
        .unwrap();
        let kernel = RBFKernel::new(0.1).unwrap();

        assert_eq!(predict(&[fv(&[5.0; 5])], &model, &kernel).unwrap(), vec![0]);
        assert_eq!(predict(&[fv(&[0.0; 5])], &model, &kernel).unwrap(), vec![1]);
    }

    #[test]
    fn test_returns_class_identifier_not_position() {
        let model = OvrModel::from_classes([
            (7, single(&[0.0, 0.0], 1.0, 1.0)),
            (3, single(&[4.0, 4.0], 1.0, 1.0)),
        ])
        .unwrap();
        let kernel = RBFKernel::new(0.5).unwrap();

        let labels = predict(&[fv(&[4.0, 3.5]), fv(&[0.1, 0.0])], &model, &kernel).unwrap();
        assert_eq!(labels, vec![3, 7]);
    }

    #[test]
    fn test_tie_goes_to_first_inserted_class() {
        let kernel = RBFKernel::default();
        let query = vec![fv(&[1.0, 2.0, 3.0, 4.0, 5.0])];

        let model = OvrModel::from_classes([
            (2, SupportVectorSet::default()),
            (0, SupportVectorSet::default()),
        ])
        .unwrap();
        for _ in 0..10 {
            assert_eq!(predict(&query, &model, &kernel).unwrap(), vec![2]);
        }

        let reversed = OvrModel::from_classes([
            (0, SupportVectorSet::default()),
            (2, SupportVectorSet::default()),
        ])
        .unwrap();
        assert_eq!(predict(&query, &reversed, &kernel).unwrap(), vec![0]);
    }

    #[test]
    fn test_tie_with_identical_support_sets() {
        let set = single(&[1.0, 1.0], 0.8, 1.0);
        let model = OvrModel::from_classes([(1, set.clone()), (0, set)]).unwrap();
        let kernel = RBFKernel::default();

        assert_eq!(predict(&[fv(&[3.0, 2.0])], &model, &kernel).unwrap(), vec![1]);
    }

    #[test]
    fn test_empty_class_wins_only_over_negative_scores() {
        let kernel = RBFKernel::default();
        let negative = single(&[0.0, 0.0], 1.0, -1.0);
        let positive = single(&[0.0, 0.0], 1.0, 1.0);

        let model = OvrModel::from_classes([
            (0, negative.clone()),
            (1, SupportVectorSet::default()),
        ])
        .unwrap();
        assert_eq!(predict(&[fv(&[0.0, 0.0])], &model, &kernel).unwrap(), vec![1]);

        let model = OvrModel::from_classes([
            (0, positive),
            (1, SupportVectorSet::default()),
        ])
        .unwrap();
        assert_eq!(predict(&[fv(&[0.0, 0.0])], &model, &kernel).unwrap(), vec![0]);
    }

    #[test]
    fn test_empty_model_rejected() {
        let kernel = RBFKernel::default();
        assert!(matches!(
            predict(&[fv(&[1.0; 5])], &OvrModel::new(), &kernel),
            Err(ClassifierError::InvalidModel(_))
        ));
        assert!(matches!(
            OvrSvm::new(OvrModel::new(), 0.1),
            Err(ClassifierError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let mut model = OvrModel::new();
        model.insert(0, SupportVectorSet::default()).unwrap();
        assert!(matches!(
            model.insert(0, SupportVectorSet::default()),
            Err(ClassifierError::InvalidModel(_))
        ));
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_insert_rejects_inconsistent_set() {
        let broken = SupportVectorSet {
            support_vectors: vec![fv(&[1.0])],
            dual_coefficients: vec![],
            support_vector_labels: vec![1.0],
        };
        assert!(matches!(
            OvrModel::new().insert(0, broken),
            Err(ClassifierError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_insert_rejects_mixed_dimensions() {
        let mut model = OvrModel::new();
        model.insert(0, SupportVectorSet::default()).unwrap();
        model.insert(1, single(&[5.0; 5], 1.0, 1.0)).unwrap();
        assert_eq!(model.dim(), Some(5));

        assert!(matches!(
            model.insert(2, single(&[5.0; 4], 1.0, 1.0)),
            Err(ClassifierError::InvalidModel(_))
        ));
        model.insert(2, SupportVectorSet::default()).unwrap();
        assert_eq!(model.class_ids(), vec![0, 1, 2]);
    }

    #[test]
    fn test_from_classes_rejects_ragged_set() {
        let ragged = SupportVectorSet {
            support_vectors: vec![fv(&[1.0; 5]), fv(&[1.0; 4])],
            dual_coefficients: vec![1.0, 1.0],
            support_vector_labels: vec![1.0, 1.0],
        };
        assert!(matches!(
            OvrModel::from_classes([(0, ragged)]),
            Err(ClassifierError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_predict_with_gamma() {
        let model = OvrModel::from_classes([
            (0, single(&[5.0; 5], 1.0, 1.0)),
            (1, single(&[0.0; 5], 1.0, 1.0)),
        ])
        .unwrap();
        assert_eq!(
            predict_with_gamma(&[fv(&[5.0; 5])], &model, 0.1).unwrap(),
            vec![0]
        );
        assert!(matches!(
            predict_with_gamma(&[fv(&[5.0; 5])], &model, f64::NAN),
            Err(ClassifierError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let model = OvrModel::from_classes([
            (2, SupportVectorSet::default()),
            (0, SupportVectorSet::default()),
            (1, SupportVectorSet::default()),
        ])
        .unwrap();
        assert_eq!(model.class_ids(), vec![2, 0, 1]);
    }

    #[test]
    fn test_batch_of_identical_vectors() {
        let model = OvrModel::from_classes([
            (0, single(&[2.0; 5], 1.0, 1.0)),
            (1, single(&[6.0; 5], 1.0, 1.0)),
            (2, single(&[9.0; 5], 1.0, 1.0)),
        ])
        .unwrap();
        let svm = OvrSvm::new(model, 0.1).unwrap();

        let batch = vec![fv(&[5.5; 5]); 3];
        let labels = svm.predict(&batch).unwrap();
        assert_eq!(labels.len(), 3);
        assert!(labels.iter().all(|&l| l == labels[0]));
        assert_eq!(labels[0], 1);
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = OvrModel::from_classes([(0, single(&[5.0; 5], 1.0, 1.0))]).unwrap();
        let svm = OvrSvm::new(model, 0.1).unwrap();

        assert!(matches!(
            svm.predict(&[fv(&[5.0; 4])]),
            Err(ClassifierError::ShapeMismatch {
                expected: 4,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_decision_matrix_shape_and_winning_score() {
        let model = OvrModel::from_classes([
            (0, single(&[0.0, 0.0], 2.0, 1.0)),
            (1, single(&[1.0, 1.0], 1.0, 1.0)),
        ])
        .unwrap();
        let svm = OvrSvm::new(model, 1.0).unwrap();
        let batch = vec![fv(&[0.0, 0.0]), fv(&[1.0, 1.0]), fv(&[5.0, 5.0])];

        let scores = svm.decision_matrix(&batch).unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores.iter().all(|row| row.len() == 3));

        let predictions = svm.predict_with_scores(&batch).unwrap();
        assert_eq!(predictions[0], Prediction::new(0, 2.0));
        assert_eq!(predictions[1], Prediction::new(1, 1.0));
    }

    #[test]
    fn test_empty_batch() {
        let model = OvrModel::from_classes([(0, single(&[0.0], 1.0, 1.0))]).unwrap();
        let svm = OvrSvm::new(model, 0.1).unwrap();
        assert!(svm.predict(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_predict_one() {
        let model = OvrModel::from_classes([
            (0, single(&[0.0], 1.0, 1.0)),
            (1, single(&[10.0], 1.0, 1.0)),
        ])
        .unwrap();
        let svm = OvrSvm::new(model, 0.1).unwrap();
        assert_eq!(svm.predict_one(&fv(&[9.0])).unwrap(), 1);
        assert_eq!(svm.name(), "svm");
    }
}
