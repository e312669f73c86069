//! Normalisation crête des signaux capturés
//!
//! Chaque canal est normalisé indépendamment: on isole ainsi le décalage
//! temporel du rapport d'amplitude entre microphones (au prix de perdre
//! l'information d'amplitude relative).

use super::DspError;
use crate::audio::AudioBuffer;

/// Normalise un tampon à amplitude crête unitaire
///
/// Divise chaque échantillon par le maximum absolu du tampon; le résultat
/// est dans [-1, 1]. Un tampon silencieux (crête nulle) est une erreur
/// `DegenerateSignal`: jamais de NaN/Inf propagés en silence.
pub fn normalize(buffer: &AudioBuffer) -> Result<AudioBuffer, DspError> {
    if buffer.is_empty() {
        return Err(DspError::EmptyBuffer);
    }

    let peak = buffer
        .samples()
        .iter()
        .fold(0.0f32, |acc, &s| acc.max(s.abs()));

    if peak == 0.0 {
        return Err(DspError::DegenerateSignal);
    }

    let samples = buffer.samples().iter().map(|&s| s / peak).collect();
    Ok(AudioBuffer::new(samples, buffer.sample_rate()))
}

/// Énergie RMS d'un tampon (contrôle rapide du niveau capté)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / samples.len() as f64).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crete_unitaire_apres_normalisation() {
        let buf = AudioBuffer::new(vec![0.1, -0.4, 0.25, -0.05], 44100);
        let normalized = normalize(&buf).unwrap();

        let peak = normalized
            .samples()
            .iter()
            .fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-6);
        assert!((normalized.samples()[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn signal_silencieux_refuse() {
        let buf = AudioBuffer::new(vec![0.0; 64], 44100);
        assert!(matches!(normalize(&buf), Err(DspError::DegenerateSignal)));
    }

    #[test]
    fn tampon_vide_refuse() {
        let buf = AudioBuffer::new(vec![], 44100);
        assert!(matches!(normalize(&buf), Err(DspError::EmptyBuffer)));
    }

    #[test]
    fn rms_d_un_signal_constant() {
        assert!((rms(&[0.5; 1000]) - 0.5).abs() < 1e-6);
        assert_eq!(rms(&[]), 0.0);
    }
}
