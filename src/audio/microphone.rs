//! Capture audio depuis un microphone
//!
//! Utilise cpal pour la capture cross-platform et ringbuf pour le buffering
//! entre le callback temps réel et le collecteur.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use ringbuf::{traits::*, HeapProd, HeapRb};
use std::time::{Duration, Instant};
use thiserror::Error;

use super::ChannelSource;

/// Erreurs liées à la capture microphone
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Périphérique d'entrée introuvable: {0}")]
    NoDevice(String),

    #[error("Erreur de configuration: {0}")]
    ConfigError(String),

    #[error("Erreur de stream: {0}")]
    StreamError(String),

    #[error("Périphérique {channel} ne répond pas ({got} échantillons reçus sur {expected})")]
    Unresponsive {
        channel: String,
        got: usize,
        expected: usize,
    },

    #[error("Longueurs de capture incohérentes: {left} vs {right} échantillons")]
    LengthMismatch { left: usize, right: usize },
}

/// Source de capture basée sur cpal
///
/// Résout un identifiant de canal en périphérique d'entrée ("default" ou
/// une sous-chaîne du nom cpal) et capture en mono f32.
pub struct CpalSource {
    /// Marge de timeout au-delà de la durée demandée
    grace: Duration,
}

impl CpalSource {
    /// Crée une source avec la marge de timeout par défaut (2 s)
    pub fn new() -> Self {
        Self {
            grace: Duration::from_secs(2),
        }
    }

    /// Crée une source avec une marge de timeout personnalisée
    pub fn with_grace(grace: Duration) -> Self {
        Self { grace }
    }

    /// Liste les périphériques d'entrée disponibles
    pub fn list_devices() -> Vec<String> {
        let host = cpal::default_host();
        host.input_devices()
            .map(|devices| devices.filter_map(|d| d.name().ok()).collect())
            .unwrap_or_default()
    }
}

impl Default for CpalSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelSource for CpalSource {
    fn acquire(
        &self,
        channel: &str,
        duration_secs: f64,
        sample_rate: u32,
    ) -> Result<Vec<f32>, CaptureError> {
        let target = (duration_secs * sample_rate as f64).floor() as usize;
        if target == 0 {
            return Err(CaptureError::ConfigError(format!(
                "durée de capture nulle ({duration_secs} s à {sample_rate} Hz)"
            )));
        }

        let device = find_input_device(channel)?;
        let device_name = device.name().unwrap_or_else(|_| channel.to_string());
        tracing::info!(
            "Capture sur '{}': {} échantillons à {} Hz",
            device_name,
            target,
            sample_rate
        );

        let stream_config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let rb = HeapRb::<f32>::new((sample_rate as usize).max(target / 4));
        let (producer, mut consumer) = rb.split();

        let sample_format = device
            .default_input_config()
            .map_err(|e| CaptureError::ConfigError(e.to_string()))?
            .sample_format();

        let stream = build_input_stream(&device, &stream_config, sample_format, producer)?;
        stream
            .play()
            .map_err(|e| CaptureError::StreamError(e.to_string()))?;

        // Collecte bloquante jusqu'au nombre d'échantillons visé, avec
        // deadline = durée demandée + marge ("device unresponsive" sinon)
        let deadline = Instant::now() + Duration::from_secs_f64(duration_secs) + self.grace;
        let mut samples: Vec<f32> = Vec::with_capacity(target);
        let mut chunk = vec![0.0f32; 4096];

        while samples.len() < target {
            let n = consumer.pop_slice(&mut chunk);
            if n > 0 {
                let take = n.min(target - samples.len());
                samples.extend_from_slice(&chunk[..take]);
            } else {
                std::thread::sleep(Duration::from_millis(5));
            }

            if samples.len() < target && Instant::now() > deadline {
                return Err(CaptureError::Unresponsive {
                    channel: channel.to_string(),
                    got: samples.len(),
                    expected: target,
                });
            }
        }

        if let Err(e) = stream.pause() {
            tracing::warn!("Arrêt du stream '{}' en échec: {}", device_name, e);
        }
        drop(stream);

        tracing::debug!("Capture '{}' terminée: {} échantillons", device_name, target);
        Ok(samples)
    }
}

/// Résout un identifiant de canal en périphérique d'entrée cpal
fn find_input_device(name: &str) -> Result<Device, CaptureError> {
    let host = cpal::default_host();

    if name == "default" {
        return host
            .default_input_device()
            .ok_or_else(|| CaptureError::NoDevice("default".to_string()));
    }

    let devices = host
        .input_devices()
        .map_err(|e| CaptureError::ConfigError(e.to_string()))?;

    for device in devices {
        if let Ok(device_name) = device.name() {
            if device_name.contains(name) {
                return Ok(device);
            }
        }
    }

    Err(CaptureError::NoDevice(name.to_string()))
}

/// Construit le stream d'entrée selon le format natif du périphérique
fn build_input_stream(
    device: &Device,
    config: &StreamConfig,
    sample_format: cpal::SampleFormat,
    mut producer: HeapProd<f32>,
) -> Result<Stream, CaptureError> {
    let err_fn = |err| tracing::error!("Erreur stream audio: {}", err);

    let stream = match sample_format {
        cpal::SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                for &sample in data {
                    let _ = producer.try_push(sample);
                }
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                for &sample in data {
                    let _ = producer.try_push(sample as f32 / i16::MAX as f32);
                }
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::U16 => device.build_input_stream(
            config,
            move |data: &[u16], _: &cpal::InputCallbackInfo| {
                for &sample in data {
                    let _ = producer.try_push(sample as f32 / u16::MAX as f32 * 2.0 - 1.0);
                }
            },
            err_fn,
            None,
        ),
        other => {
            return Err(CaptureError::ConfigError(format!(
                "Format d'échantillon non supporté: {:?}",
                other
            )));
        }
    }
    .map_err(|e| CaptureError::StreamError(e.to_string()))?;

    Ok(stream)
}
