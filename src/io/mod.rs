//! Module for reading models and expression data
pub mod expression;
pub mod json;
