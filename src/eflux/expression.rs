//! Scaled gene expression values keyed by gene id
//!
//! Built once per analysis run from tabular records (see
//! [`crate::io::expression`]) and read-only afterwards.

use std::collections::HashSet;

use crate::configuration::CONFIGURATION;

use indexmap::IndexMap;
use thiserror::Error;

/// How collected expression values are scaled into [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Normalization {
    /// Divide by the maximum collected value; the maximum becomes exactly 1.0
    Max,
    /// Divide by the given quantile of all collected values and clamp at 1.0,
    /// so values at or above the quantile saturate
    Quantile(f64),
}

/// Read-only mapping from gene id to a scaled expression value
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpressionMap {
    values: IndexMap<String, f64>,
}

impl ExpressionMap {
    /// Look up a gene's scaled expression, falling back to `default`
    ///
    /// A miss is an expected, handled state: genes in the model but absent
    /// from the measurement are resolved to the caller's default.
    pub fn get_or(&self, gene_id: &str, default: f64) -> f64 {
        self.values.get(gene_id).copied().unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build the map from raw records
    ///
    /// Records whose id is not in `universe` (the model's gene set) are
    /// dropped, bounding memory to genes the model can reference. Later
    /// records overwrite earlier ones for the same id. The retained values
    /// are then normalized per `normalization`.
    ///
    /// # Errors
    /// - [`ExpressionDataError::Empty`] when no record survives the universe
    ///   filter (no maximum or quantile is computable)
    /// - [`ExpressionDataError::InvalidQuantile`] when a quantile outside
    ///   [0, 1] is requested
    /// - [`ExpressionDataError::DegenerateScale`] when the divisor is too
    ///   close to zero to scale by
    pub fn from_records<I>(
        records: I,
        universe: &HashSet<String>,
        normalization: Normalization,
    ) -> Result<Self, ExpressionDataError>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut values: IndexMap<String, f64> = IndexMap::new();
        for (id, value) in records {
            if universe.contains(&id) {
                values.insert(id, value);
            }
        }
        if values.is_empty() {
            return Err(ExpressionDataError::Empty);
        }

        let (divisor, clamp) = match normalization {
            Normalization::Max => {
                let max = values.values().copied().fold(f64::NEG_INFINITY, f64::max);
                (max, false)
            }
            Normalization::Quantile(q) => {
                let collected: Vec<f64> = values.values().copied().collect();
                (quantile(collected, q)?, true)
            }
        };
        if divisor.abs() <= CONFIGURATION.read().unwrap().tolerance {
            return Err(ExpressionDataError::DegenerateScale(divisor));
        }

        for value in values.values_mut() {
            *value /= divisor;
            if clamp && *value > 1.0 {
                *value = 1.0;
            }
        }

        Ok(ExpressionMap { values })
    }
}

/// Linearly interpolated quantile of `values`, numpy style
///
/// `q` runs from 0.0 (minimum) to 1.0 (maximum).
pub(crate) fn quantile(mut values: Vec<f64>, q: f64) -> Result<f64, ExpressionDataError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(ExpressionDataError::InvalidQuantile(q));
    }
    if values.is_empty() {
        return Err(ExpressionDataError::Empty);
    }
    values.sort_by(f64::total_cmp);

    let position = q * (values.len() - 1) as f64;
    let below = position.floor() as usize;
    let above = position.ceil() as usize;
    let fraction = position - below as f64;
    Ok(values[below] + fraction * (values[above] - values[below]))
}

/// Enum representing failures while building expression data
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExpressionDataError {
    /// No values to normalize; the map cannot be built partially and used safely
    #[error("no expression values collected, cannot compute a normalization divisor")]
    Empty,
    /// Quantiles are fractions of the distribution
    #[error("quantile {0} is outside [0, 1]")]
    InvalidQuantile(f64),
    /// Dividing by a near-zero scale would blow every value up
    #[error("normalization divisor {0} is too close to zero")]
    DegenerateScale(f64),
}
