//! Manual one-vs-rest SVM inference
//!
//! Each class keeps its own support vectors, dual coefficients and ±1
//! labels. A query is scored against every class with the RBF kernel and
//! the class with the highest score wins.

pub mod ovr;
pub mod support_set;

pub use self::ovr::*;
pub use self::support_set::*;
