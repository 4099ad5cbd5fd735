//! Module providing JSON IO for metabolic Models
//!
//! Reads and writes the COBRA community JSON schema. Only the fields the
//! eFlux pipeline consumes are mapped; unknown keys (metabolite chemistry,
//! annotations of kinds we don't track) are ignored on read.
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder, ReactionBuilderError};

// region JSON Model
/// Represents a JSON serialized model, used for reading and writing models in json format
#[derive(Serialize, Deserialize)]
struct JsonModel {
    reactions: Vec<JsonReaction>,
    genes: Vec<JsonGene>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    compartments: Option<IndexMap<String, String>>,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonReaction {
    id: String,
    name: Option<String>,
    #[serde(default)]
    metabolites: IndexMap<String, f64>,
    lower_bound: f64,
    upper_bound: f64,
    gene_reaction_rule: String,
    #[serde(default)]
    objective_coefficient: Option<f64>,
    #[serde(default)]
    subsystem: Option<String>,
    #[serde(default)]
    notes: Option<Value>,
    #[serde(default)]
    annotation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonGene {
    id: String,
    name: Option<String>,
    #[serde(default)]
    notes: Option<Value>,
    #[serde(default)]
    annotation: Option<Value>,
}
// endregion JSON Model

// region Conversions
impl From<JsonGene> for Gene {
    fn from(g: JsonGene) -> Self {
        // Notes and annotations are kept as JSON strings; the data is too
        // loosely structured to unpack further
        Self {
            id: g.id,
            name: g.name,
            notes: g.notes.map(|v| v.to_string()),
            annotation: g.annotation.map(|v| v.to_string()),
        }
    }
}

impl From<Gene> for JsonGene {
    fn from(g: Gene) -> Self {
        Self {
            id: g.id,
            name: g.name,
            notes: g
                .notes
                .map(|n| serde_json::from_str(&n).unwrap_or(Value::String(n))),
            annotation: g
                .annotation
                .map(|a| serde_json::from_str(&a).unwrap_or(Value::String(a))),
        }
    }
}

impl Model {
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Model, JsonError> {
        let model_str = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => return Err(JsonError::UnableToRead(format!("{:?}", err))),
        };
        let json_model = match serde_json::from_str::<JsonModel>(&model_str) {
            Ok(model) => model,
            Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
        };
        Model::from_json(json_model)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let json_model = self.to_json();
        let model_string = serde_json::to_string(&json_model)?;
        fs::write(path, model_string)?;
        Ok(())
    }

    fn from_json(json_model: JsonModel) -> Result<Self, JsonError> {
        let mut reactions: IndexMap<String, Reaction> = IndexMap::new();
        let mut genes: IndexMap<String, Gene> = IndexMap::new();
        let mut objective: IndexMap<String, f64> = IndexMap::new();

        json_model.genes.into_iter().for_each(|g| {
            genes.insert(g.id.clone(), Gene::from(g));
        });
        /* Iterate through the reactions, keeping GPR rules as raw strings and
        collecting nonzero objective coefficients along the way */
        for rxn in json_model.reactions {
            let gpr = if !rxn.gene_reaction_rule.is_empty() {
                Some(rxn.gene_reaction_rule)
            } else {
                None
            };
            let new_reaction = ReactionBuilder::default()
                .id(rxn.id.clone())
                .metabolites(rxn.metabolites)
                .name(rxn.name)
                .gpr(gpr)
                .lower_bound(rxn.lower_bound)
                .upper_bound(rxn.upper_bound)
                .subsystem(rxn.subsystem)
                .notes(rxn.notes.map(|v| v.to_string()))
                .annotation(rxn.annotation.map(|v| v.to_string()))
                .build()?;
            reactions.insert(rxn.id.clone(), new_reaction);
            if let Some(coef) = rxn.objective_coefficient {
                if coef != 0.0 {
                    objective.insert(rxn.id, coef);
                }
            }
        }
        Ok(Model {
            reactions,
            genes,
            objective,
            id: json_model.id,
            compartments: json_model.compartments,
            version: json_model.version,
        })
    }

    fn to_json(&self) -> JsonModel {
        let json_genes: Vec<JsonGene> = self.genes.values().map(|g| g.clone().into()).collect();
        let mut json_reactions: Vec<JsonReaction> = Vec::new();
        for reaction in self.reactions.values() {
            json_reactions.push(JsonReaction {
                id: reaction.id.clone(),
                name: reaction.name.clone(),
                metabolites: reaction.metabolites.clone(),
                lower_bound: reaction.lower_bound,
                upper_bound: reaction.upper_bound,
                gene_reaction_rule: reaction.gpr.clone().unwrap_or_default(),
                objective_coefficient: self.objective.get(&reaction.id).copied(),
                subsystem: reaction.subsystem.clone(),
                notes: reaction
                    .notes
                    .clone()
                    .map(|n| serde_json::from_str(&n).unwrap_or(Value::String(n))),
                annotation: reaction
                    .annotation
                    .clone()
                    .map(|a| serde_json::from_str(&a).unwrap_or(Value::String(a))),
            })
        }

        JsonModel {
            reactions: json_reactions,
            genes: json_genes,
            id: self.id.clone(),
            compartments: self.compartments.clone(),
            version: self.version.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error("Serde json parse error")]
    SerdeJsonParseError(#[from] serde_json::Error),
    #[error("Unable to write to file")]
    UnableToWrite(#[from] std::io::Error),
}

// endregion Conversions

#[cfg(test)]
mod json_tests {
    use super::*;

    const MODEL_JSON: &str = r#"{
"metabolites":[
{"id":"glc__D_e","name":"D-Glucose","compartment":"e","charge":0,"formula":"C6H12O6"},
{"id":"f6p_c","name":"Fructose 6-phosphate","compartment":"c"},
{"id":"fdp_c","name":"Fructose 1,6-bisphosphate","compartment":"c"}
],
"reactions":[
{
"id":"PFK",
"name":"Phosphofructokinase",
"metabolites":{"f6p_c":-1.0,"fdp_c":1.0},
"lower_bound":0.0,
"upper_bound":1000.0,
"gene_reaction_rule":"b3916 or b1723",
"subsystem":"Glycolysis/Gluconeogenesis"
},
{
"id":"EX_glc__D_e",
"name":"D-Glucose exchange",
"metabolites":{"glc__D_e":-1.0},
"lower_bound":-10.0,
"upper_bound":1000.0,
"gene_reaction_rule":""
},
{
"id":"BIOMASS",
"name":"Biomass objective",
"metabolites":{"f6p_c":-1.0,"fdp_c":-1.0},
"lower_bound":0.0,
"upper_bound":1000.0,
"gene_reaction_rule":"",
"objective_coefficient":1.0
}
],
"genes":[
{"id":"b3916","name":"pfkA"},
{"id":"b1723","name":"pfkB"}
],
"id":"mini_core",
"compartments":{"c":"cytosol","e":"extracellular space"},
"version":"1"
}"#;

    #[test]
    fn json_reaction() {
        let data = r#"{
"id":"PFK",
"name":"Phosphofructokinase",
"metabolites":{"f6p_c":-1.0,"fdp_c":1.0},
"lower_bound":0.0,
"upper_bound":1000.0,
"gene_reaction_rule":"b3916 or b1723",
"subsystem":"Glycolysis/Gluconeogenesis",
"notes":{"original_bigg_ids":["PFK"]}
}"#;
        let reaction: JsonReaction = serde_json::from_str(data).unwrap();
        assert_eq!(reaction.id, "PFK");
        assert_eq!(reaction.name.unwrap(), "Phosphofructokinase");
        assert!((reaction.lower_bound - 0.0).abs() < 1e-25);
        assert!((reaction.upper_bound - 1000.0).abs() < 1e-25);
        assert_eq!(reaction.gene_reaction_rule, "b3916 or b1723");
        assert_eq!(reaction.subsystem.unwrap(), "Glycolysis/Gluconeogenesis");
    }

    #[test]
    fn json_gene() {
        let data = r#"{"id":"b1241","name":"adhE","annotation":{"uniprot":["P0A9Q7"]}}"#;
        let gene: JsonGene = serde_json::from_str(data).unwrap();
        assert_eq!(gene.id, "b1241");
        assert_eq!(gene.name.unwrap(), "adhE");
    }

    #[test]
    fn model_conversion() {
        let json_model: JsonModel = serde_json::from_str(MODEL_JSON).unwrap();
        let model = Model::from_json(json_model).unwrap();

        assert_eq!(model.id.clone().unwrap(), "mini_core");
        assert_eq!(model.version.clone().unwrap(), "1");
        assert_eq!(model.reactions.len(), 3);
        assert_eq!(model.genes.len(), 2);

        let pfk = &model.reactions["PFK"];
        assert_eq!(pfk.gpr.clone().unwrap(), "b3916 or b1723");
        assert_eq!(pfk.bounds(), (0.0, 1000.0));

        // Empty rules become None
        assert!(model.reactions["EX_glc__D_e"].gpr.is_none());

        // Objective collected from coefficients
        assert!(model.in_objective("BIOMASS"));
        assert!(!model.in_objective("PFK"));

        // Compartments survive
        let compartments = model.compartments.clone().unwrap();
        assert_eq!(compartments["c"], "cytosol");

        // Gene universe drives expression filtering
        assert!(model.gene_ids().contains("b3916"));
    }

    #[test]
    fn boundary_classification_from_json() {
        use crate::metabolic_model::reaction::ReactionKind;
        let json_model: JsonModel = serde_json::from_str(MODEL_JSON).unwrap();
        let model = Model::from_json(json_model).unwrap();
        assert_eq!(model.reactions["EX_glc__D_e"].kind(), ReactionKind::Exchange);
        assert_eq!(model.reactions["PFK"].kind(), ReactionKind::Internal);
    }

    #[test]
    fn round_trip_keeps_rules_and_bounds() {
        let json_model: JsonModel = serde_json::from_str(MODEL_JSON).unwrap();
        let model = Model::from_json(json_model).unwrap();

        let serialized = serde_json::to_string(&model.to_json()).unwrap();
        let reparsed: JsonModel = serde_json::from_str(&serialized).unwrap();
        let restored = Model::from_json(reparsed).unwrap();

        assert_eq!(
            restored.reactions["PFK"].gpr,
            model.reactions["PFK"].gpr
        );
        assert_eq!(
            restored.reactions["EX_glc__D_e"].bounds(),
            model.reactions["EX_glc__D_e"].bounds()
        );
        assert!(restored.in_objective("BIOMASS"));
    }
}
