//! Module de traitement du signal
//!
//! Normalisation des tampons et corrélation croisée. Calculs purs,
//! séquentiels, sur entrées immuables.

mod correlation;
mod normalize;

pub use correlation::{cross_correlate, CorrelationMethod, CorrelationResult};
pub use normalize::{normalize, rms};

use thiserror::Error;

/// Erreurs du traitement du signal
#[derive(Error, Debug)]
pub enum DspError {
    #[error("Signal dégénéré: amplitude crête nulle, normalisation impossible")]
    DegenerateSignal,

    #[error("Tampon vide")]
    EmptyBuffer,

    #[error("Longueurs incompatibles pour la corrélation: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}
