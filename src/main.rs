//! Boussole - Localisation de source sonore par TDoA
//!
//! Capture simultanée de deux microphones, corrélation croisée et
//! estimation de l'angle d'arrivée par rapport à l'axe des capteurs.

mod audio;
mod doa;
mod dsp;
mod pipeline;

use audio::CpalSource;
use pipeline::{EstimateConfig, Estimator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialiser le logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boussole=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Boussole v{}", env!("CARGO_PKG_VERSION"));

    // Lister les périphériques d'entrée disponibles
    let devices = CpalSource::list_devices();
    tracing::info!("Périphériques d'entrée détectés: {:?}", devices);

    println!("🧭 Boussole - Localisation sonore par TDoA");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Périphériques d'entrée:");
    for device in &devices {
        println!("  - {}", device);
    }
    println!();

    // Canaux gauche/droit depuis l'environnement, périphérique par défaut sinon
    let left = std::env::var("BOUSSOLE_LEFT").unwrap_or_else(|_| "default".to_string());
    let right = std::env::var("BOUSSOLE_RIGHT").unwrap_or_else(|_| "default".to_string());

    let config = EstimateConfig {
        left_channel: left,
        right_channel: right,
        ..Default::default()
    };

    println!(
        "🎙️ Capture en parallèle ({} s à {} Hz)...",
        config.duration_secs, config.sample_rate
    );

    let estimator = Estimator::new(CpalSource::new(), config);
    let outcome = estimator.run().await?;

    println!("✅ Capture terminée.");
    println!();
    println!("Δt = {:.6} s (lag {} échantillons)", outcome.doa.delay_secs, outcome.correlation.lag);
    println!("Valeur crue pour asin: {:.4}", outcome.doa.raw_ratio);
    if outcome.doa.was_clamped {
        println!("⚠️ Rapport hors modèle, angle borné à ±90°");
    }
    println!("🧭 Angle estimé: {:.2}°", outcome.doa.angle_degrees);

    Ok(())
}
