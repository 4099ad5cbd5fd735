//! Core rust implementation of the eFlux method: scaling the flux bounds of a
//! genome scale metabolic model by gene expression data.

pub mod eflux;
pub mod io;
pub mod metabolic_model;
mod configuration;
