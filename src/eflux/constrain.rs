//! Per-reaction constraint computation and the whole-model driver
//!
//! The engine is a pure function: it derives a new bounds pair from a
//! reaction and the expression data without touching the model. The driver
//! applies the outcome and keeps count of reactions genuinely constrained by
//! data.

use crate::eflux::evaluate::GprEvalError;
use crate::eflux::filter::strip_gene_prefix;
use crate::eflux::{evaluate_gpr, ExpressionMap};
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{Reaction, ReactionKind};

use derive_builder::Builder;
use log::{debug, info};
use thiserror::Error;

/// Sentinel expression value meaning "no constraint data for this reaction"
///
/// Callers that want reactions without any expression data left maximally
/// permissive pass this as [`EfluxSettings::default_expression`]: an empty or
/// fully-missing rule then evaluates to `NO_DATA` (a `min` against it
/// propagates the sentinel through an all-missing `and` rule), and the engine
/// substitutes 1.0 while reporting the reaction as not constrained. The value
/// sits outside the normal [0, 1] evaluated range; callers that never pass it
/// as the default never trigger the sentinel path.
pub const NO_DATA: f64 = -1.0;

/// Parameters of an eFlux run
#[derive(Builder, Clone, Debug)]
pub struct EfluxSettings {
    /// Maximum flux magnitude; evaluated expression values scale it
    pub scaling_constant: f64,
    /// Expression value for empty rules and genes without data
    #[builder(default = "NO_DATA")]
    pub default_expression: f64,
    /// Gene id prefixes excluded from every rule before evaluation, in order
    /// (e.g. `"ENSMUS"` to drop mouse genes from a hybrid model)
    #[builder(default = "Vec::new()")]
    pub exclude_prefixes: Vec<String>,
}

/// New bounds computed for a single reaction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstraintOutcome {
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Whether the bounds actually reflect expression data, as opposed to the
    /// maximally permissive no-data fallback
    pub constrained: bool,
}

/// Enum representing errors during an eFlux run
#[derive(Debug, Error)]
pub enum EfluxError {
    /// A reaction's GPR rule failed to evaluate; carries the offending id
    #[error("invalid GPR for reaction `{reaction}`: {source}")]
    InvalidGpr {
        reaction: String,
        source: GprEvalError,
    },
}

/// Compute new flux bounds for one reaction from expression data
///
/// Steps:
/// 1. reactions in the objective are skipped entirely (`Ok(None)`), their
///    bounds must not be scaled by expression data;
/// 2. the raw rule (empty when the reaction has none) is filtered once per
///    entry of [`EfluxSettings::exclude_prefixes`], in order;
/// 3. an empty or whitespace-only filtered rule evaluates to the default;
/// 4. otherwise the rule is tokenized and evaluated;
/// 5. a result equal to [`NO_DATA`] becomes 1.0 and the outcome is marked
///    unconstrained;
/// 6. the upper bound is `value * scaling_constant`; the lower bound stays 0
///    for irreversible reactions (existing lower bound exactly 0) and is the
///    negated upper bound otherwise.
///
/// Pure: the reaction is not mutated, and identical inputs always produce
/// identical outcomes.
pub fn constrain_reaction(
    reaction: &Reaction,
    in_objective: bool,
    expression: &ExpressionMap,
    settings: &EfluxSettings,
) -> Result<Option<ConstraintOutcome>, EfluxError> {
    if in_objective {
        return Ok(None);
    }

    let mut gpr = reaction.gpr.clone().unwrap_or_default();
    for prefix in &settings.exclude_prefixes {
        gpr = strip_gene_prefix(&gpr, prefix);
    }

    let value = if gpr.trim().is_empty() {
        settings.default_expression
    } else {
        evaluate_gpr(&gpr, expression, settings.default_expression).map_err(|source| {
            EfluxError::InvalidGpr {
                reaction: reaction.id.clone(),
                source,
            }
        })?
    };

    let (value, constrained) = if value == NO_DATA {
        (1.0, false)
    } else {
        (value, true)
    };

    let upper_bound = value * settings.scaling_constant;
    let lower_bound = if reaction.lower_bound == 0.0 {
        0.0
    } else {
        -upper_bound
    };

    Ok(Some(ConstraintOutcome {
        lower_bound,
        upper_bound,
        constrained,
    }))
}

/// Apply the eFlux method to every internal reaction of the model
///
/// Exchange, demand, and sink reactions pass through unmodified; their bounds
/// are set by [`calibrate_boundary_reactions`](super::calibrate::calibrate_boundary_reactions).
/// Returns the number of reactions genuinely constrained by expression data.
///
/// # Errors
/// A rule that fails to evaluate aborts the whole run with the reaction id
/// attached. Bounds already written for earlier reactions stay written; there
/// is no rollback.
pub fn apply_eflux(
    model: &mut Model,
    expression: &ExpressionMap,
    settings: &EfluxSettings,
) -> Result<usize, EfluxError> {
    let mut constrained_count = 0;

    for index in 0..model.reactions.len() {
        let reaction = &model.reactions[index];
        if reaction.kind() != ReactionKind::Internal {
            continue;
        }
        let in_objective = model.in_objective(&reaction.id);

        match constrain_reaction(reaction, in_objective, expression, settings)? {
            None => {
                debug!("reaction {} is in the objective, skipped", reaction.id);
            }
            Some(outcome) => {
                debug!(
                    "reaction {}: bounds ({}, {}), constrained: {}",
                    reaction.id, outcome.lower_bound, outcome.upper_bound, outcome.constrained
                );
                let reaction = &mut model.reactions[index];
                reaction.set_bounds(outcome.lower_bound, outcome.upper_bound);
                if outcome.constrained {
                    constrained_count += 1;
                }
            }
        }
    }

    info!(
        "eflux constrained {} of {} reactions",
        constrained_count,
        model.reactions.len()
    );
    Ok(constrained_count)
}
