// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Common interface of the scoring engines

use std::fmt;

use shared_types::{SpamLabel, TrainingExample};

use crate::{
    error::{SpamPredictorError, SpamPredictorResult},
    normalizer::{Normalizer, NormalizerConfig},
    store::ModelState,
    types::{EngineKind, PredictionResult},
};

/// A spam scorer that can be trained, queried and persisted
///
/// Implementations are synchronous and CPU-bound. Callers that share an
/// engine across threads serialize `train`/`restore_state` against
/// `predict` themselves.
pub trait ClassificationEngine: Send + Sync + fmt::Debug {
    /// Which strategy this engine implements
    fn kind(&self) -> EngineKind;

    /// Whether `predict` can be called
    fn is_ready(&self) -> bool;

    /// Fit the engine on a labeled corpus, replacing any previous model
    ///
    /// On error the previous model is left untouched.
    fn train(&mut self, corpus: &[TrainingExample]) -> SpamPredictorResult<()>;

    /// Classify one text
    fn predict(&self, text: &str) -> SpamPredictorResult<PredictionResult>;

    /// Snapshot of the learned or configured state
    fn export_state(&self) -> SpamPredictorResult<ModelState>;

    /// Replace the engine state with a persisted one
    fn restore_state(
        &mut self,
        normalizer: NormalizerConfig,
        state: ModelState,
    ) -> SpamPredictorResult<()>;

    /// Normalizer the engine tokenizes with
    fn normalizer(&self) -> &Normalizer;
}

/// Reject corpora the statistical classifier cannot learn from
pub fn validate_corpus(corpus: &[TrainingExample]) -> SpamPredictorResult<()> {
    if corpus.len() < 2 {
        return Err(SpamPredictorError::insufficient_data(format!(
            "at least 2 examples are required, got {}",
            corpus.len()
        )));
    }

    for label in SpamLabel::ALL {
        if !corpus.iter().any(|example| example.label == label) {
            return Err(SpamPredictorError::insufficient_data(format!(
                "corpus has no {label} examples"
            )));
        }
    }

    Ok(())
}
