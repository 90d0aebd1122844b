//! Data loading for batch prediction

pub mod csv;

pub use self::csv::*;
