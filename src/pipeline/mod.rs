//! Module pipeline d'estimation
//!
//! Enchaîne capture synchronisée → normalisation → corrélation →
//! résolution d'angle pour produire une estimation par invocation.

mod estimate;

pub use estimate::{EstimateConfig, EstimateError, EstimateOutcome, Estimator};
