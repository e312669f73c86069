//! Estimation de direction d'arrivée, une capture à la fois
//!
//! Chaque estimation est indépendante et sans état: une capture de durée
//! fixe, une corrélation, un angle. Le flux temps réel continu est hors
//! périmètre.

use std::sync::Arc;

use thiserror::Error;

use crate::audio::{capture_pair, CaptureError, ChannelSource};
use crate::doa::{resolve, ArrayGeometry, DoaEstimate};
use crate::dsp::{cross_correlate, normalize, rms, CorrelationMethod, CorrelationResult, DspError};

/// Configuration d'une estimation
#[derive(Debug, Clone)]
pub struct EstimateConfig {
    /// Identifiant du canal gauche ("default" ou nom de périphérique)
    pub left_channel: String,
    /// Identifiant du canal droit
    pub right_channel: String,
    /// Durée de capture (secondes)
    pub duration_secs: f64,
    /// Taux d'échantillonnage (Hz)
    pub sample_rate: u32,
    /// Géométrie du réseau de microphones
    pub geometry: ArrayGeometry,
    /// Méthode de corrélation
    pub method: CorrelationMethod,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            left_channel: "default".to_string(),
            right_channel: "default".to_string(),
            duration_secs: 2.0,
            sample_rate: 44100,
            geometry: ArrayGeometry::default(),
            method: CorrelationMethod::Fft,
        }
    }
}

/// Erreurs du pipeline d'estimation
#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("Erreur de capture: {0}")]
    Capture(#[from] CaptureError),

    #[error("Erreur de traitement: {0}")]
    Dsp(#[from] DspError),
}

/// Résultat complet d'une estimation
#[derive(Debug, Clone, Copy)]
pub struct EstimateOutcome {
    /// Pic de corrélation (décalage en échantillons et valeur)
    pub correlation: CorrelationResult,
    /// Estimation d'angle dérivée du décalage
    pub doa: DoaEstimate,
}

/// Pipeline d'estimation de direction d'arrivée
pub struct Estimator<S: ChannelSource> {
    source: Arc<S>,
    config: EstimateConfig,
}

impl<S: ChannelSource + 'static> Estimator<S> {
    /// Crée un pipeline avec la source de capture spécifiée
    pub fn new(source: S, config: EstimateConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }

    /// Effectue une estimation complète
    ///
    /// Toute condition fatale (capture, longueurs, signal dégénéré)
    /// interrompt l'estimation; aucune relance de capture ici — les
    /// retries appartiennent à l'appelant.
    pub async fn run(&self) -> Result<EstimateOutcome, EstimateError> {
        let (left_raw, right_raw) = capture_pair(
            Arc::clone(&self.source),
            &self.config.left_channel,
            &self.config.right_channel,
            self.config.duration_secs,
            self.config.sample_rate,
        )
        .await?;

        tracing::debug!(
            "Niveaux captés: RMS gauche {:.4}, RMS droit {:.4}",
            rms(left_raw.samples()),
            rms(right_raw.samples())
        );

        let left = normalize(&left_raw)?;
        let right = normalize(&right_raw)?;

        let correlation = cross_correlate(&left, &right, self.config.method)?;
        tracing::info!(
            "Pic de corrélation: lag {} échantillons (valeur {:.4})",
            correlation.lag,
            correlation.peak
        );

        let doa = resolve(correlation.lag, self.config.sample_rate, &self.config.geometry);
        tracing::info!(
            "Δt = {:.6} s, angle estimé {:.2}° (borné: {})",
            doa.delay_secs,
            doa.angle_degrees,
            doa.was_clamped
        );

        Ok(EstimateOutcome { correlation, doa })
    }

    /// Retourne la configuration actuelle
    pub fn config(&self) -> &EstimateConfig {
        &self.config
    }
}
