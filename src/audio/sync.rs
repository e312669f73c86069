//! Capture synchronisée des deux canaux
//!
//! Les deux acquisitions tournent en parallèle (tâches bloquantes tokio)
//! et sont jointes explicitement: la corrélation n'a de sens que si les
//! deux tampons couvrent le même événement acoustique.

use std::sync::Arc;

use super::{AudioBuffer, CaptureError, ChannelSource};

/// Capture les deux canaux en parallèle et retourne les tampons joints
///
/// Chaque tâche retourne son tampon par valeur; pas d'état mutable partagé,
/// la jointure est le point de synchronisation. Échec de l'un ou l'autre
/// canal = échec de l'estimation entière (un résultat partiel est
/// inutilisable pour la corrélation).
pub async fn capture_pair<S>(
    source: Arc<S>,
    left_channel: &str,
    right_channel: &str,
    duration_secs: f64,
    sample_rate: u32,
) -> Result<(AudioBuffer, AudioBuffer), CaptureError>
where
    S: ChannelSource + 'static,
{
    let left_id = left_channel.to_string();
    let right_id = right_channel.to_string();
    let left_source = Arc::clone(&source);
    let right_source = Arc::clone(&source);

    let left_task = tokio::task::spawn_blocking(move || {
        left_source.acquire(&left_id, duration_secs, sample_rate)
    });
    let right_task = tokio::task::spawn_blocking(move || {
        right_source.acquire(&right_id, duration_secs, sample_rate)
    });

    let (left_join, right_join) = tokio::join!(left_task, right_task);

    let left_samples = left_join
        .map_err(|e| CaptureError::StreamError(format!("tâche de capture interrompue: {e}")))??;
    let right_samples = right_join
        .map_err(|e| CaptureError::StreamError(format!("tâche de capture interrompue: {e}")))??;

    // Jamais de troncature silencieuse: un écart de longueur est une erreur
    if left_samples.len() != right_samples.len() {
        return Err(CaptureError::LengthMismatch {
            left: left_samples.len(),
            right: right_samples.len(),
        });
    }

    tracing::info!(
        "Capture synchronisée terminée: 2 x {} échantillons",
        left_samples.len()
    );

    Ok((
        AudioBuffer::new(left_samples, sample_rate),
        AudioBuffer::new(right_samples, sample_rate),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MockChannelSource;

    #[tokio::test]
    async fn capture_des_deux_canaux() {
        let mut mock = MockChannelSource::new();
        mock.expect_acquire()
            .withf(|channel, _, _| channel == "gauche")
            .returning(|_, _, _| Ok(vec![0.1; 100]));
        mock.expect_acquire()
            .withf(|channel, _, _| channel == "droit")
            .returning(|_, _, _| Ok(vec![0.2; 100]));

        let (left, right) = capture_pair(Arc::new(mock), "gauche", "droit", 1.0, 100)
            .await
            .unwrap();

        assert_eq!(left.len(), 100);
        assert_eq!(right.len(), 100);
        assert_eq!(left.sample_rate(), 100);
    }

    #[tokio::test]
    async fn ecart_de_longueur_refuse() {
        let mut mock = MockChannelSource::new();
        mock.expect_acquire()
            .withf(|channel, _, _| channel == "gauche")
            .returning(|_, _, _| Ok(vec![0.1; 100]));
        mock.expect_acquire()
            .withf(|channel, _, _| channel == "droit")
            .returning(|_, _, _| Ok(vec![0.2; 99]));

        let err = capture_pair(Arc::new(mock), "gauche", "droit", 1.0, 100)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CaptureError::LengthMismatch {
                left: 100,
                right: 99
            }
        ));
    }

    #[tokio::test]
    async fn echec_d_un_canal_fatal() {
        let mut mock = MockChannelSource::new();
        mock.expect_acquire()
            .withf(|channel, _, _| channel == "gauche")
            .returning(|_, _, _| Ok(vec![0.1; 100]));
        mock.expect_acquire()
            .withf(|channel, _, _| channel == "droit")
            .returning(|channel, _, _| {
                Err(CaptureError::NoDevice(channel.to_string()))
            });

        let result = capture_pair(Arc::new(mock), "gauche", "droit", 1.0, 100).await;
        assert!(matches!(result, Err(CaptureError::NoDevice(_))));
    }
}
