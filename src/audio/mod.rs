//! Module de capture audio
//!
//! Gère l'accès aux microphones et la capture synchronisée des deux canaux.

mod buffer;
mod microphone;
mod sync;

pub use buffer::AudioBuffer;
pub use microphone::{CaptureError, CpalSource};
pub use sync::capture_pair;

#[cfg(test)]
use mockall::automock;

/// Source d'échantillons pour un canal d'entrée
///
/// Abstrait le périphérique physique: le cœur d'estimation ne voit qu'un
/// appel bloquant `acquire`. L'identifiant de canal est opaque (résolu par
/// l'implémentation, typiquement un nom de périphérique cpal).
#[cfg_attr(test, automock)]
pub trait ChannelSource: Send + Sync {
    /// Capture `floor(duration_secs * sample_rate)` échantillons mono f32
    ///
    /// Appel bloquant; toute défaillance (périphérique absent, lecture
    /// incomplète, absence de réponse) est une erreur de capture.
    fn acquire(
        &self,
        channel: &str,
        duration_secs: f64,
        sample_rate: u32,
    ) -> Result<Vec<f32>, CaptureError>;
}
