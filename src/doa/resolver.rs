//! Résolution angle d'arrivée depuis le décalage temporel
//!
//! Δt = lag / R, puis x = C·Δt / D et θ = degrés(asin(x)). Le bruit de
//! mesure ou une géométrie mal renseignée peut pousser |x| au-delà de 1
//! (aucun angle valide en champ lointain): on borne alors x à [-1, 1] et
//! on le signale via `was_clamped` plutôt que d'échouer — l'appelant sait
//! que la mesure sort du modèle.

use thiserror::Error;

/// Erreurs de géométrie du réseau
#[derive(Error, Debug)]
pub enum DoaError {
    #[error("Géométrie invalide: distance {spacing_m} m, célérité {speed_of_sound} m/s (les deux doivent être > 0)")]
    InvalidGeometry { spacing_m: f64, speed_of_sound: f64 },
}

/// Géométrie du réseau de deux microphones
///
/// Paire immuable {distance entre microphones, célérité du son}.
#[derive(Debug, Clone, Copy)]
pub struct ArrayGeometry {
    spacing_m: f64,
    speed_of_sound: f64,
}

impl ArrayGeometry {
    /// Crée une géométrie validée (D > 0, C > 0)
    pub fn new(spacing_m: f64, speed_of_sound: f64) -> Result<Self, DoaError> {
        if spacing_m <= 0.0 || speed_of_sound <= 0.0 {
            return Err(DoaError::InvalidGeometry {
                spacing_m,
                speed_of_sound,
            });
        }
        Ok(Self {
            spacing_m,
            speed_of_sound,
        })
    }

    pub fn spacing_m(&self) -> f64 {
        self.spacing_m
    }

    pub fn speed_of_sound(&self) -> f64 {
        self.speed_of_sound
    }
}

impl Default for ArrayGeometry {
    /// 20 cm d'écart, célérité du son dans l'air à ~20 °C
    fn default() -> Self {
        Self {
            spacing_m: 0.2,
            speed_of_sound: 343.0,
        }
    }
}

/// Estimation de direction d'arrivée
///
/// L'angle est relatif à la perpendiculaire de l'axe des microphones et
/// vaut pour les deux hémisphères (ambiguïté avant/arrière, voir le
/// module [`crate::doa`]).
#[derive(Debug, Clone, Copy)]
pub struct DoaEstimate {
    /// Décalage temporel Δt entre les deux canaux (secondes)
    pub delay_secs: f64,
    /// Rapport brut x = C·Δt / D, avant bornage
    pub raw_ratio: f64,
    /// Angle d'arrivée θ en degrés, dans [-90, +90]
    pub angle_degrees: f64,
    /// Vrai si |x| > 1 a dû être ramené à ±1 (mesure hors modèle)
    pub was_clamped: bool,
}

/// Convertit un décalage en échantillons en estimation d'angle
pub fn resolve(lag: i64, sample_rate: u32, geometry: &ArrayGeometry) -> DoaEstimate {
    let delay_secs = lag as f64 / sample_rate as f64;
    let raw_ratio = geometry.speed_of_sound() * delay_secs / geometry.spacing_m();

    let was_clamped = raw_ratio.abs() > 1.0;
    let clamped = raw_ratio.clamp(-1.0, 1.0);
    let angle_degrees = clamped.asin().to_degrees();

    if was_clamped {
        tracing::warn!(
            "Rapport hors modèle: x = {:.4}, borné à {:.1} (géométrie incohérente ou source hors champ lointain)",
            raw_ratio,
            clamped
        );
    }

    DoaEstimate {
        delay_secs,
        raw_ratio,
        angle_degrees,
        was_clamped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometrie_invalide_refusee() {
        assert!(ArrayGeometry::new(0.0, 343.0).is_err());
        assert!(ArrayGeometry::new(0.2, -1.0).is_err());
        assert!(ArrayGeometry::new(0.2, 343.0).is_ok());
    }

    #[test]
    fn lag_nul_donne_angle_nul() {
        let geometry = ArrayGeometry::default();
        let estimate = resolve(0, 44100, &geometry);

        assert_eq!(estimate.delay_secs, 0.0);
        assert_eq!(estimate.angle_degrees, 0.0);
        assert!(!estimate.was_clamped);
    }

    #[test]
    fn lag_hors_modele_borne_a_90_degres() {
        // 26 échantillons à 44100 Hz avec D = 0.2 m: x ≈ 1.01 > 1
        let geometry = ArrayGeometry::default();
        let estimate = resolve(26, 44100, &geometry);

        assert!(estimate.raw_ratio > 1.0);
        assert!(estimate.was_clamped);
        assert!((estimate.angle_degrees - 90.0).abs() < 1e-9);
    }

    #[test]
    fn angle_monotone_en_delta_t() {
        let geometry = ArrayGeometry::default();
        let mut previous = f64::NEG_INFINITY;

        // Toute la plage non bornée pour cette géométrie (|lag| <= 25)
        for lag in -25..=25 {
            let estimate = resolve(lag, 44100, &geometry);
            assert!(!estimate.was_clamped, "lag {} ne devrait pas être borné", lag);
            assert!(estimate.angle_degrees > previous);
            previous = estimate.angle_degrees;
        }
    }

    #[test]
    fn delai_attendu_pour_lag_10() {
        let geometry = ArrayGeometry::default();
        let estimate = resolve(10, 44100, &geometry);

        assert!((estimate.delay_secs - 2.268e-4).abs() < 1e-6);
        assert!((estimate.raw_ratio - 0.389).abs() < 1e-3);
        assert!((estimate.angle_degrees - 22.9).abs() < 0.1);
        assert!(!estimate.was_clamped);
    }
}
