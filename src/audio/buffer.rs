//! Tampon d'échantillons audio

/// Séquence d'échantillons mono à taux d'échantillonnage fixe
///
/// Immuable après capture: toutes les étapes en aval produisent de
/// nouvelles valeurs dérivées.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Durée du tampon en secondes
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_depuis_taux() {
        let buf = AudioBuffer::new(vec![0.0; 44100], 44100);
        assert_eq!(buf.len(), 44100);
        assert!((buf.duration_secs() - 1.0).abs() < 1e-9);
    }
}
