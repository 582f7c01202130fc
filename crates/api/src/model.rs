// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Model lifecycle for the server
//!
//! Startup loads the persisted model, retrying transient I/O failures; when
//! no usable artifact exists the built-in corpus is used to train and save a
//! fresh one. Retraining builds a complete replacement on a blocking thread
//! before it is swapped into [`ServerState`].

use std::{path::PathBuf, time::Duration};

use spam_predictor::{
    SpamPredictor, SpamPredictorConfig, SpamPredictorError, SpamPredictorResult,
    TrainingExample, sample_corpus,
};
use tokio_retry::{
    RetryIf,
    strategy::{ExponentialBackoff, jitter},
};
use tracing::{info, instrument, warn};

use crate::{error::ServerResult, metrics, state::ServerState};

const LOAD_ATTEMPTS: usize = 3;

/// Load the model at `path`, or train on the built-in corpus and save it
///
/// # Errors
///
/// Returns an error for invalid engine configuration, persistent load
/// failures other than a missing or unusable artifact, and save failures.
#[instrument(skip(config, path), fields(path = %path.display(), engine = %config.engine))]
pub async fn bootstrap(config: SpamPredictorConfig, path: PathBuf) -> ServerResult<SpamPredictor> {
    match load_with_retry(config.clone(), path.clone()).await {
        Ok(predictor) => {
            info!("Loaded persisted model");
            Ok(predictor)
        }
        Err(err) if err.is_model_missing() => {
            warn!(error = %err, "No usable model found, training on the built-in corpus");
            let predictor = train_and_save(config, sample_corpus(), path).await?;
            Ok(predictor)
        }
        Err(err) => Err(err.into()),
    }
}

/// Retrain with the configuration of the serving predictor and swap it in
///
/// Returns the number of examples trained on. The serving model is left
/// untouched when training or saving fails.
///
/// # Errors
///
/// Returns an error when the corpus is degenerate or the model cannot be saved.
pub async fn retrain(state: &ServerState, corpus: Vec<TrainingExample>) -> ServerResult<usize> {
    let _guard = state.training_guard().await;

    let samples = corpus.len();
    let config = state.predictor().await.config().clone();
    let path = state.config().model.path.clone();

    let outcome = train_and_save(config, corpus, path).await;
    metrics::record_training(outcome.is_ok());

    state.replace_predictor(outcome?).await;
    info!(samples, "Swapped in retrained model");
    Ok(samples)
}

async fn load_with_retry(
    config: SpamPredictorConfig,
    path: PathBuf,
) -> SpamPredictorResult<SpamPredictor> {
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .take(LOAD_ATTEMPTS)
        .map(jitter);

    RetryIf::spawn(
        strategy,
        || {
            let config = config.clone();
            let path = path.clone();
            async move {
                tokio::task::spawn_blocking(move || SpamPredictor::from_path(config, path))
                    .await
                    .map_err(|e| SpamPredictorError::internal(format!("model load task failed: {e}")))?
            }
        },
        |err: &SpamPredictorError| {
            let retry = err.is_retryable();
            if retry {
                warn!(error = %err, "Transient model load failure, retrying");
            }
            retry
        },
    )
    .await
}

async fn train_and_save(
    config: SpamPredictorConfig,
    corpus: Vec<TrainingExample>,
    path: PathBuf,
) -> ServerResult<SpamPredictor> {
    let predictor = tokio::task::spawn_blocking(move || -> SpamPredictorResult<SpamPredictor> {
        let mut predictor = SpamPredictor::new(config)?;
        predictor.train(&corpus)?;
        predictor.save(&path)?;
        Ok(predictor)
    })
    .await??;

    Ok(predictor)
}
