//! Corrélation croisée complète de deux canaux
//!
//! Deux implémentations: directe O(N²) et par FFT O(N log N) via rustfft,
//! avec zero-padding suffisant pour éviter le repliement circulaire. Les
//! deux localisent le même pic (à un échantillon près).

use num_complex::Complex;
use rustfft::FftPlanner;

use super::DspError;
use crate::audio::AudioBuffer;

/// Méthode de calcul de la corrélation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationMethod {
    /// Somme directe, O(N²)
    Direct,
    /// Convolution en domaine fréquentiel, O(N log N)
    Fft,
}

/// Pic de corrélation entre les deux canaux
///
/// `lag` > 0: le canal droit arrive après le canal gauche (le son atteint
/// le microphone gauche en premier). `lag` < 0: l'inverse.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationResult {
    /// Décalage en échantillons, dans [-(N-1), +(N-1)]
    pub lag: i64,
    /// Valeur de corrélation au pic
    pub peak: f64,
}

/// Corrélation croisée complète (non circulaire) de `right` contre `left`
///
/// La corrélation à l'offset k mesure la similarité entre le canal droit
/// et le canal gauche décalé de k échantillons. Retourne l'offset du
/// maximum; à valeurs égales, le plus petit |k| l'emporte (le délai nul
/// est le cas physique le plus courant et ne biaise pas la direction).
pub fn cross_correlate(
    left: &AudioBuffer,
    right: &AudioBuffer,
    method: CorrelationMethod,
) -> Result<CorrelationResult, DspError> {
    if left.is_empty() || right.is_empty() {
        return Err(DspError::EmptyBuffer);
    }
    if left.len() != right.len() {
        return Err(DspError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let corr = match method {
        CorrelationMethod::Direct => direct_correlation(left.samples(), right.samples()),
        CorrelationMethod::Fft => fft_correlation(left.samples(), right.samples()),
    };

    Ok(find_peak(&corr, left.len()))
}

/// Somme directe sur les 2N-1 offsets
fn direct_correlation(left: &[f32], right: &[f32]) -> Vec<f64> {
    let n = left.len() as i64;
    let mut corr = vec![0.0f64; (2 * n - 1) as usize];

    for (i, slot) in corr.iter_mut().enumerate() {
        let k = i as i64 - (n - 1);
        let mut acc = 0.0f64;
        for idx in 0..n {
            let j = idx - k;
            if j >= 0 && j < n {
                acc += right[idx as usize] as f64 * left[j as usize] as f64;
            }
        }
        *slot = acc;
    }

    corr
}

/// Corrélation par FFT: IFFT(FFT(right) · conj(FFT(left)))
///
/// Taille de transformée ≥ 2N-1 pour que le produit circulaire coïncide
/// avec la corrélation linéaire.
fn fft_correlation(left: &[f32], right: &[f32]) -> Vec<f64> {
    let n = left.len();
    let fft_size = (2 * n - 1).next_power_of_two();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    let ifft = planner.plan_fft_inverse(fft_size);

    let mut left_fft: Vec<Complex<f64>> = left
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .collect();
    left_fft.resize(fft_size, Complex::new(0.0, 0.0));

    let mut right_fft: Vec<Complex<f64>> = right
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .collect();
    right_fft.resize(fft_size, Complex::new(0.0, 0.0));

    fft.process(&mut left_fft);
    fft.process(&mut right_fft);

    let mut cross: Vec<Complex<f64>> = right_fft
        .iter()
        .zip(left_fft.iter())
        .map(|(r, l)| r * l.conj())
        .collect();

    ifft.process(&mut cross);

    // rustfft ne normalise pas l'IFFT
    let scale = 1.0 / fft_size as f64;
    let n = n as i64;

    (0..(2 * n - 1))
        .map(|i| {
            let k = i - (n - 1);
            let idx = if k < 0 { fft_size as i64 + k } else { k } as usize;
            cross[idx].re * scale
        })
        .collect()
}

/// Localise le pic, départage les égalités vers le plus petit |lag|
fn find_peak(corr: &[f64], n: usize) -> CorrelationResult {
    let n = n as i64;
    let mut best_lag = -(n - 1);
    let mut best_val = f64::NEG_INFINITY;

    for (i, &val) in corr.iter().enumerate() {
        let k = i as i64 - (n - 1);
        if val > best_val || (val == best_val && k.abs() < best_lag.abs()) {
            best_val = val;
            best_lag = k;
        }
    }

    CorrelationResult {
        lag: best_lag,
        peak: best_val,
    }
}
