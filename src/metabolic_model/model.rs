//! This module provides the Model struct for representing an entire metabolic model
use std::collections::HashSet;

use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::reaction::Reaction;

use indexmap::IndexMap;

/// Represents a Genome Scale Metabolic Model
#[derive(Clone, Debug)]
pub struct Model {
    /// Map of reaction ids to Reaction Objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of gene ids to Gene Objects
    pub genes: IndexMap<String, Gene>,
    /// Map of reaction ids to objective function coefficients
    pub objective: IndexMap<String, f64>,
    /// Id associated with the Model
    pub id: Option<String>,
    /// Compartments in the model
    ///
    /// An IndexMap<String, String> of {short name: long name}
    pub compartments: Option<IndexMap<String, String>>,
    /// A version identifier for the Model, stored as a string
    pub version: Option<String>,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            genes: IndexMap::new(),
            objective: IndexMap::new(),
            id: None,
            compartments: None,
            version: None,
        }
    }

    /// Add a reaction to the model
    ///
    /// # Parameters
    /// - reaction: Reaction to add
    ///
    /// # Examples
    /// ```rust
    /// use eflux_core::metabolic_model::model::Model;
    /// use eflux_core::metabolic_model::reaction::ReactionBuilder;
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default().id("new_reaction".to_string()).build().unwrap();
    /// model.add_reaction(new_reaction);
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) {
        let id = reaction.id.clone();
        self.reactions.insert(id, reaction);
    }

    /// Add a gene to the model
    ///
    /// # Parameters
    /// - gene: Gene to add
    ///
    /// # Examples
    /// ```rust
    /// use eflux_core::metabolic_model::gene::GeneBuilder;
    /// use eflux_core::metabolic_model::model::Model;
    /// let mut model = Model::new_empty();
    /// let new_gene = GeneBuilder::default().id("new_gene".to_string()).build().unwrap();
    /// model.add_gene(new_gene);
    /// ```
    pub fn add_gene(&mut self, gene: Gene) {
        let id = gene.id.clone();
        self.genes.insert(id, gene);
    }

    /// The set of gene ids known to the model
    ///
    /// Used to restrict expression data to genes the model actually references
    /// (see [`ExpressionMap::from_records`](crate::eflux::ExpressionMap::from_records)).
    pub fn gene_ids(&self) -> HashSet<String> {
        self.genes.keys().cloned().collect()
    }

    /// Whether a reaction carries a nonzero objective coefficient
    pub fn in_objective(&self, reaction_id: &str) -> bool {
        self.objective
            .get(reaction_id)
            .map(|coefficient| *coefficient != 0.0)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::gene::GeneBuilder;
    use crate::metabolic_model::reaction::ReactionBuilder;

    #[test]
    fn gene_ids_collects_all_genes() {
        let mut model = Model::new_empty();
        for id in ["g1", "g2", "g3"] {
            model.add_gene(GeneBuilder::default().id(id.to_string()).build().unwrap());
        }
        let ids = model.gene_ids();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("g2"));
    }

    #[test]
    fn objective_membership() {
        let mut model = Model::new_empty();
        model.add_reaction(
            ReactionBuilder::default()
                .id("BIOMASS".to_string())
                .build()
                .unwrap(),
        );
        model.objective.insert("BIOMASS".to_string(), 1.0);
        model.objective.insert("ZEROED".to_string(), 0.0);
        assert!(model.in_objective("BIOMASS"));
        assert!(!model.in_objective("ZEROED"));
        assert!(!model.in_objective("PFK"));
    }
}
