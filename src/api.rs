//! High-level API for stress-level classification
//!
//! A [`ClassifierSet`] is built once at startup from the model artifacts and
//! then shared read-only by every request. Callers pick a back-end by
//! [`ClassifierKind`] and receive an [`Assessment`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stress_svm::api::{ClassifierKind, ClassifierSet, ModelPaths};
//! use stress_svm::StressIndicators;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifiers = ClassifierSet::load(&ModelPaths::in_dir("models"), None)?;
//!
//! let indicators = StressIndicators::new(4.0, 7.5, 8.0, 2.0, 6.0);
//! let assessment = classifiers.assess(ClassifierKind::Svm, &indicators)?;
//! println!("{} ({})", assessment.class_id, assessment.description);
//! # Ok(())
//! # }
//! ```

use crate::core::{ClassId, Classifier, ClassifierError, FeatureVector, Result, StressIndicators};
use crate::labels::{resolve_label, StressLevel};
use crate::persistence::ModelArtifact;
use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default artifact file names inside a model directory
pub const SVM_MODEL_FILE: &str = "svm_model.json";
pub const RANDOM_FOREST_MODEL_FILE: &str = "rf_model.json";
pub const KNN_MODEL_FILE: &str = "knn_model.json";

/// Selectable classifier back-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    /// One-vs-rest RBF SVM
    Svm,
    RandomForest,
    /// k-nearest-neighbors
    Knn,
}

impl ClassifierKind {
    pub const ALL: [ClassifierKind; 3] = [
        ClassifierKind::Svm,
        ClassifierKind::RandomForest,
        ClassifierKind::Knn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierKind::Svm => "svm",
            ClassifierKind::RandomForest => "random-forest",
            ClassifierKind::Knn => "knn",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassifierKind {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "svm" => Ok(ClassifierKind::Svm),
            "random-forest" | "random_forest" | "rf" => Ok(ClassifierKind::RandomForest),
            "knn" | "k-nearest-neighbors" => Ok(ClassifierKind::Knn),
            other => Err(ClassifierError::InvalidParameter(format!(
                "Unknown classifier: {other}. Use 'svm', 'random-forest' or 'knn'"
            ))),
        }
    }
}

/// Where each back-end's artifact lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub svm: PathBuf,
    pub random_forest: PathBuf,
    pub knn: PathBuf,
}

impl ModelPaths {
    /// Default file names inside `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            svm: dir.join(SVM_MODEL_FILE),
            random_forest: dir.join(RANDOM_FOREST_MODEL_FILE),
            knn: dir.join(KNN_MODEL_FILE),
        }
    }

    pub fn path_for(&self, kind: ClassifierKind) -> &Path {
        match kind {
            ClassifierKind::Svm => &self.svm,
            ClassifierKind::RandomForest => &self.random_forest,
            ClassifierKind::Knn => &self.knn,
        }
    }
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self::in_dir("models")
    }
}

/// Outcome of classifying one student
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub class_id: ClassId,
    /// Known stress level, `None` if the class has no description
    pub level: Option<StressLevel>,
    pub description: &'static str,
}

impl Assessment {
    pub fn from_class_id(class_id: ClassId) -> Self {
        Self {
            class_id,
            level: StressLevel::from_class_id(class_id),
            description: resolve_label(class_id),
        }
    }
}

/// The loaded back-ends, owned for the serving lifetime
///
/// Each slot is optional: a back-end whose artifact could not be loaded is
/// reported as unavailable only when a caller selects it.
#[derive(Default)]
pub struct ClassifierSet {
    svm: Option<Box<dyn Classifier>>,
    random_forest: Option<Box<dyn Classifier>>,
    knn: Option<Box<dyn Classifier>>,
}

impl ClassifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every artifact that exists
    ///
    /// Missing files are skipped with a warning. A file that exists but
    /// fails to load is an error.
    pub fn load(paths: &ModelPaths, gamma_override: Option<f64>) -> Result<Self> {
        let mut set = Self::new();
        for kind in ClassifierKind::ALL {
            let path = paths.path_for(kind);
            if !path.exists() {
                warn!("No {kind} model at {path:?}; it will be unavailable");
                continue;
            }
            set.load_kind(kind, path, gamma_override)?;
        }
        Ok(set)
    }

    /// Load one back-end from its artifact
    pub fn load_kind<P: AsRef<Path>>(
        &mut self,
        kind: ClassifierKind,
        path: P,
        gamma_override: Option<f64>,
    ) -> Result<()> {
        let artifact = ModelArtifact::load_from_file(path)?;
        let found = artifact.model.kind_name();
        if found != kind.as_str() {
            return Err(ClassifierError::InvalidModel(format!(
                "expected a {kind} artifact, found {found}"
            )));
        }
        let classifier = artifact.to_classifier(gamma_override)?;
        self.insert(kind, classifier);
        Ok(())
    }

    /// Install an already-built classifier
    pub fn insert(&mut self, kind: ClassifierKind, classifier: Box<dyn Classifier>) {
        info!("Registered {kind} classifier");
        *self.slot_mut(kind) = Some(classifier);
    }

    fn slot_mut(&mut self, kind: ClassifierKind) -> &mut Option<Box<dyn Classifier>> {
        match kind {
            ClassifierKind::Svm => &mut self.svm,
            ClassifierKind::RandomForest => &mut self.random_forest,
            ClassifierKind::Knn => &mut self.knn,
        }
    }

    pub fn is_available(&self, kind: ClassifierKind) -> bool {
        self.get(kind).is_ok()
    }

    /// Select a back-end
    pub fn get(&self, kind: ClassifierKind) -> Result<&dyn Classifier> {
        let slot = match kind {
            ClassifierKind::Svm => &self.svm,
            ClassifierKind::RandomForest => &self.random_forest,
            ClassifierKind::Knn => &self.knn,
        };
        slot.as_deref()
            .ok_or_else(|| ClassifierError::InvalidModel(format!("{kind} model unavailable")))
    }

    /// Predict a batch with the selected back-end
    pub fn predict(&self, kind: ClassifierKind, batch: &[FeatureVector]) -> Result<Vec<ClassId>> {
        debug!("Predicting {} samples with {kind}", batch.len());
        self.get(kind)?.predict(batch)
    }

    /// Classify one student's indicators
    pub fn assess(&self, kind: ClassifierKind, indicators: &StressIndicators) -> Result<Assessment> {
        let class_id = self.get(kind)?.predict_one(&indicators.to_feature_vector())?;
        Ok(Assessment::from_class_id(class_id))
    }
}
