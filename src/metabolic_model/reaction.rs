//! This module provides a struct for representing reactions
use crate::configuration::CONFIGURATION;
use derive_builder::Builder;
use indexmap::IndexMap;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Raw Gene Protein Reaction rule string, e.g. `"(g1 and g2) or g3"`
    ///
    /// Kept as written in the model file; it is tokenized fresh against the
    /// current expression data each time the reaction is constrained.
    #[builder(default = "None")]
    pub gpr: Option<String>,
    /// Lower flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().lower_bound")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().upper_bound")]
    pub upper_bound: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Notes about the reaction
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Reaction Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Reaction {
    /// Get the current flux bounds as a (lower, upper) pair
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower_bound, self.upper_bound)
    }

    /// Assign new flux bounds
    pub fn set_bounds(&mut self, lower_bound: f64, upper_bound: f64) {
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
    }

    /// Whether the reaction crosses the model boundary
    ///
    /// Boundary reactions involve exactly one metabolite, representing mass
    /// entering or leaving the system.
    pub fn is_boundary(&self) -> bool {
        self.metabolites.len() == 1
    }

    /// Classify the reaction (see [`ReactionKind`])
    ///
    /// Boundary reactions are split by the conventional id prefixes: `DM_` for
    /// demands and `SK_` for sinks; any other boundary reaction is treated as
    /// an exchange.
    pub fn kind(&self) -> ReactionKind {
        if !self.is_boundary() {
            return ReactionKind::Internal;
        }
        if self.id.starts_with("DM_") {
            ReactionKind::Demand
        } else if self.id.starts_with("SK_") {
            ReactionKind::Sink
        } else {
            ReactionKind::Exchange
        }
    }
}

/// How a reaction participates in the model
///
/// Only internal reactions are constrained by expression data; the boundary
/// kinds are calibrated separately (see [`crate::eflux::calibrate`]).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReactionKind {
    /// An ordinary enzymatic or transport reaction inside the network
    Internal,
    /// Exterior mass transfer in or out of the model
    Exchange,
    /// Irreversible boundary consumption of a metabolite
    Demand,
    /// Boundary source/sink allowing a metabolite to accumulate or deplete
    Sink,
}
