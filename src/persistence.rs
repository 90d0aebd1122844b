//! Model artifacts and persistence
//!
//! Trained models are produced offline and handed to this crate as JSON
//! artifacts. Each artifact carries one of the three back-ends plus some
//! metadata, and converts into a ready [`Classifier`].

use crate::core::{ClassId, Classifier, ClassifierError, FeatureVector, Result};
use crate::forest::{DecisionTree, RandomForest};
use crate::kernel::DEFAULT_GAMMA;
use crate::knn::KnnClassifier;
use crate::svm::{OvrModel, OvrSvm, SupportVectorSet};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

/// Serializable trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// The trained back-end
    pub model: ArtifactModel,
    /// Model metadata
    #[serde(default)]
    pub metadata: ModelMetadata,
}

/// Back-end specific payload, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactModel {
    /// One-vs-rest RBF SVM; classes are kept in file order
    OvrSvm {
        #[serde(default = "default_gamma")]
        gamma: f64,
        classes: Vec<SerializableClass>,
    },
    /// Random forest of flattened decision trees
    RandomForest {
        n_features: usize,
        trees: Vec<DecisionTree>,
    },
    /// k-nearest-neighbors over stored samples
    Knn {
        k: usize,
        samples: Vec<FeatureVector>,
        labels: Vec<ClassId>,
    },
}

fn default_gamma() -> f64 {
    DEFAULT_GAMMA
}

/// Serializable per-class support vectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableClass {
    pub class_id: ClassId,
    pub support_vectors: Vec<FeatureVector>,
    /// Dual coefficients (alpha values)
    pub dual_coefficients: Vec<f64>,
    pub support_vector_labels: Vec<f64>,
}

/// Model metadata for tracking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to write the artifact
    #[serde(default)]
    pub library_version: String,
    /// Creation timestamp (RFC 3339)
    #[serde(default)]
    pub created_at: Option<String>,
    /// Free-form note, e.g. the training dataset
    #[serde(default)]
    pub description: Option<String>,
}

impl ModelMetadata {
    /// Metadata stamped with the current library version and time
    pub fn now() -> Self {
        Self {
            library_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            description: None,
        }
    }
}

impl From<(ClassId, &SupportVectorSet)> for SerializableClass {
    fn from((class_id, set): (ClassId, &SupportVectorSet)) -> Self {
        Self {
            class_id,
            support_vectors: set.support_vectors.clone(),
            dual_coefficients: set.dual_coefficients.clone(),
            support_vector_labels: set.support_vector_labels.clone(),
        }
    }
}

impl From<&SerializableClass> for SupportVectorSet {
    fn from(c: &SerializableClass) -> Self {
        SupportVectorSet {
            support_vectors: c.support_vectors.clone(),
            dual_coefficients: c.dual_coefficients.clone(),
            support_vector_labels: c.support_vector_labels.clone(),
        }
    }
}

impl ArtifactModel {
    /// Identifier of the back-end, as used on the command line
    pub fn kind_name(&self) -> &'static str {
        match self {
            ArtifactModel::OvrSvm { .. } => "svm",
            ArtifactModel::RandomForest { .. } => "random-forest",
            ArtifactModel::Knn { .. } => "knn",
        }
    }
}

impl ModelArtifact {
    pub fn new(model: ArtifactModel) -> Self {
        Self {
            model,
            metadata: ModelMetadata::now(),
        }
    }

    /// Create an artifact from a one-vs-rest SVM
    pub fn from_ovr_svm(svm: &OvrSvm) -> Self {
        Self::new(ArtifactModel::OvrSvm {
            gamma: svm.gamma(),
            classes: svm.model().iter().map(SerializableClass::from).collect(),
        })
    }

    pub fn from_random_forest(forest: &RandomForest) -> Self {
        Self::new(ArtifactModel::RandomForest {
            n_features: forest.n_features(),
            trees: forest.trees().to_vec(),
        })
    }

    pub fn from_knn(knn: &KnnClassifier) -> Self {
        Self::new(ArtifactModel::Knn {
            k: knn.k(),
            samples: knn.samples().to_vec(),
            labels: knn.labels().to_vec(),
        })
    }

    /// Save artifact to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(ClassifierError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| ClassifierError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load artifact from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(ClassifierError::IoError)?;
        let artifact = Self::from_reader(BufReader::new(file))?;
        info!(
            "Loaded {} model from {:?}",
            artifact.model.kind_name(),
            path
        );
        Ok(artifact)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| ClassifierError::SerializationError(e.to_string()))
    }

    /// Rebuild the one-vs-rest SVM, optionally overriding the stored gamma
    pub fn to_ovr_svm(&self, gamma_override: Option<f64>) -> Result<OvrSvm> {
        match &self.model {
            ArtifactModel::OvrSvm { gamma, classes } => {
                let model = OvrModel::from_classes(
                    classes
                        .iter()
                        .map(|c| (c.class_id, SupportVectorSet::from(c))),
                )?;
                OvrSvm::new(model, gamma_override.unwrap_or(*gamma))
            }
            other => Err(ClassifierError::InvalidModel(format!(
                "expected an svm artifact, found {}",
                other.kind_name()
            ))),
        }
    }

    /// Rebuild whichever classifier the artifact holds
    ///
    /// `gamma_override` only applies to SVM artifacts.
    pub fn to_classifier(&self, gamma_override: Option<f64>) -> Result<Box<dyn Classifier>> {
        match &self.model {
            ArtifactModel::OvrSvm { .. } => Ok(Box::new(self.to_ovr_svm(gamma_override)?)),
            ArtifactModel::RandomForest { n_features, trees } => {
                Ok(Box::new(RandomForest::new(trees.clone(), *n_features)?))
            }
            ArtifactModel::Knn { k, samples, labels } => Ok(Box::new(KnnClassifier::new(
                *k,
                samples.clone(),
                labels.clone(),
            )?)),
        }
    }

    /// Multi-line summary of the artifact
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Model Summary ===");
        let _ = writeln!(out, "Kind: {}", self.model.kind_name());
        match &self.model {
            ArtifactModel::OvrSvm { gamma, classes } => {
                let _ = writeln!(out, "Gamma: {gamma}");
                let _ = writeln!(out, "Classes: {}", classes.len());
                for c in classes {
                    let _ = writeln!(
                        out,
                        "  Class {}: {} support vectors",
                        c.class_id,
                        c.support_vectors.len()
                    );
                }
            }
            ArtifactModel::RandomForest { n_features, trees } => {
                let _ = writeln!(out, "Trees: {}", trees.len());
                let _ = writeln!(out, "Features: {n_features}");
            }
            ArtifactModel::Knn { k, samples, .. } => {
                let _ = writeln!(out, "k: {k}");
                let _ = writeln!(out, "Stored samples: {}", samples.len());
            }
        }
        if !self.metadata.library_version.is_empty() {
            let _ = writeln!(out, "Library Version: {}", self.metadata.library_version);
        }
        if let Some(created_at) = &self.metadata.created_at {
            let _ = writeln!(out, "Created: {created_at}");
        }
        if let Some(description) = &self.metadata.description {
            let _ = writeln!(out, "Description: {description}");
        }
        out
    }
}
