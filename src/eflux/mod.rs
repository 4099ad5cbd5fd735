//! The eFlux method: expression-scaled flux bounds
//!
//! Each reaction's maximum flux magnitude is scaled by an expression value
//! obtained by evaluating its GPR rule against measured gene expression:
//! `and` folds to the minimum of its sides (every gene product is required),
//! `or` folds to their sum (alternative enzymes add capacity). The pipeline
//! per reaction is: raw GPR string -> [`strip_gene_prefix`] (per excluded
//! species) -> [`Lexer`](lexer::Lexer) (resolving gene ids through the
//! [`ExpressionMap`]) -> [`GprEvaluator`](evaluate::GprEvaluator) -> scalar
//! -> [`constrain_reaction`] -> bounds applied by [`apply_eflux`].

pub mod calibrate;
pub mod constrain;
pub mod evaluate;
pub mod expression;
pub mod filter;
pub mod lexer;
pub mod token;

use crate::eflux::evaluate::{GprEvalError, GprEvaluator};
use crate::eflux::lexer::Lexer;

pub use calibrate::{calibrate_boundary_reactions, flux_bound_outliers, CalibrationError};
pub use constrain::{
    apply_eflux, constrain_reaction, ConstraintOutcome, EfluxError, EfluxSettings,
    EfluxSettingsBuilder, NO_DATA,
};
pub use expression::{ExpressionDataError, ExpressionMap, Normalization};
pub use filter::strip_gene_prefix;

/// Evaluate a GPR rule string against expression data
///
/// Convenience wrapper tying the lexer and evaluator together. Gene ids
/// absent from `expression` resolve to `default_value`.
///
/// # Examples
/// ```rust
/// use std::collections::HashSet;
/// use eflux_core::eflux::{evaluate_gpr, ExpressionMap, Normalization};
///
/// let universe: HashSet<String> = ["g1", "g2"].iter().map(|s| s.to_string()).collect();
/// let records = vec![("g1".to_string(), 2.0), ("g2".to_string(), 4.0)];
/// let expression = ExpressionMap::from_records(records, &universe, Normalization::Max).unwrap();
/// let value = evaluate_gpr("g1 and g2", &expression, 0.0).unwrap();
/// assert_eq!(value, 0.5);
/// ```
pub fn evaluate_gpr(
    gpr: &str,
    expression: &ExpressionMap,
    default_value: f64,
) -> Result<f64, GprEvalError> {
    let tokens = Lexer::new(gpr, expression, default_value).scan_tokens();
    GprEvaluator::new(tokens).evaluate()
}
