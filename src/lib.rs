//! Student stress-level classification
//!
//! Five self-reported indicators (self-esteem, depression, anxiety, sleep
//! quality, bullying) are classified into low, moderate or high stress by a
//! manually evaluated one-vs-rest RBF SVM, a random forest or k-nearest
//! neighbors.

pub mod api;
pub mod core;
pub mod data;
pub mod forest;
pub mod kernel;
pub mod knn;
pub mod labels;
pub mod persistence;
pub mod svm;

// Re-export main types for convenience
pub use crate::api::{Assessment, ClassifierKind, ClassifierSet, ModelPaths};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{ClassifierError, Result};
pub use crate::data::FeatureDataset;
pub use crate::forest::{DecisionTree, RandomForest, TreeNode};
pub use crate::kernel::{rbf_kernel, Kernel, RBFKernel};
pub use crate::knn::KnnClassifier;
pub use crate::labels::{resolve_label, StressLevel};
pub use crate::persistence::ModelArtifact;
pub use crate::svm::{
    decision_score, decision_score_with_gamma, OvrModel, OvrSvm, SupportVectorSet,
};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
