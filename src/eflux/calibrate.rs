//! Quantile calibration of boundary-reaction bounds and outlier reporting
//!
//! Boundary reactions carry no GPR, so expression data cannot constrain
//! them. Instead their bounds are pegged to a quantile of the internal
//! reactions' upper bounds, keeping exterior mass transfer commensurate with
//! the expression-scaled interior network.

use crate::eflux::expression::{quantile, ExpressionDataError};
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::ReactionKind;

use log::info;
use thiserror::Error;

/// Z-score above which an internal upper bound is reported as an outlier
const OUTLIER_Z_SCORE: f64 = 1.96;

/// Enum representing calibration failures
#[derive(Debug, Error, PartialEq)]
pub enum CalibrationError {
    /// A model of only boundary reactions has no distribution to calibrate from
    #[error("model has no internal reactions to take a quantile over")]
    NoInternalReactions,
    /// The requested quantile was outside [0, 1]
    #[error("invalid calibration quantile: {0}")]
    InvalidQuantile(#[from] ExpressionDataError),
}

fn internal_upper_bounds(model: &Model) -> Vec<f64> {
    model
        .reactions
        .values()
        .filter(|reaction| reaction.kind() == ReactionKind::Internal)
        .map(|reaction| reaction.upper_bound)
        .collect()
}

/// Set boundary-reaction bounds from a quantile of internal upper bounds
///
/// With `c` the `q`-th quantile of all internal reactions' upper bounds:
/// exchanges become reversible over `(-c, c)`, demands irreversible over
/// `(0, c)`, and sinks uptake-only over `(-c, 0)`. Returns `c`.
pub fn calibrate_boundary_reactions(model: &mut Model, q: f64) -> Result<f64, CalibrationError> {
    let upper_bounds = internal_upper_bounds(model);
    if upper_bounds.is_empty() {
        return Err(CalibrationError::NoInternalReactions);
    }
    let constraint = quantile(upper_bounds, q)?;

    for reaction in model.reactions.values_mut() {
        match reaction.kind() {
            ReactionKind::Internal => {}
            ReactionKind::Exchange => reaction.set_bounds(-constraint, constraint),
            ReactionKind::Demand => reaction.set_bounds(0.0, constraint),
            ReactionKind::Sink => reaction.set_bounds(-constraint, 0.0),
        }
    }

    info!("boundary reactions calibrated to +/- {constraint}");
    Ok(constraint)
}

/// Ids of internal reactions whose upper bound is anomalously large
///
/// Flags bounds more than [`OUTLIER_Z_SCORE`] standard deviations above the
/// mean of all internal upper bounds. Useful as a sanity check after an
/// eFlux run: a handful of reactions dominating the flux scale usually means
/// their expression data was mis-normalized.
pub fn flux_bound_outliers(model: &Model) -> Vec<String> {
    let upper_bounds = internal_upper_bounds(model);
    if upper_bounds.is_empty() {
        return Vec::new();
    }
    let mean = upper_bounds.iter().sum::<f64>() / upper_bounds.len() as f64;
    let variance = upper_bounds
        .iter()
        .map(|bound| (bound - mean).powi(2))
        .sum::<f64>()
        / upper_bounds.len() as f64;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return Vec::new();
    }

    model
        .reactions
        .values()
        .filter(|reaction| reaction.kind() == ReactionKind::Internal)
        .filter(|reaction| (reaction.upper_bound - mean) / std_dev > OUTLIER_Z_SCORE)
        .map(|reaction| reaction.id.clone())
        .collect()
}
