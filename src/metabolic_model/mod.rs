//! Module representing the metabolic model whose flux bounds are constrained

pub mod gene;
pub mod model;
pub mod reaction;
