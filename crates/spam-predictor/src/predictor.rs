// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Main spam prediction orchestrator
//!
//! `SpamPredictor` owns one scoring engine, chosen from the configuration at
//! construction time, and exposes the train / predict / save / load
//! lifecycle on top of it.

use std::{path::Path, sync::Arc, time::Instant};

use shared_types::TrainingExample;
use tracing::{debug, info, instrument};

use crate::{
    config::SpamPredictorConfig,
    engine::ClassificationEngine,
    error::{SpamPredictorError, SpamPredictorResult},
    features::FeatureExtractor,
    keywords::KeywordLists,
    normalizer::Normalizer,
    rules::RuleEngine,
    statistical::StatisticalEngine,
    store::{ModelArtifact, ModelStore},
    types::{EngineKind, EvaluationReport, PredictionResult},
};

/// Main spam prediction orchestrator
///
/// Starts out untrained unless the configured engine needs no corpus. Use
/// [`SpamPredictor::train`] or [`SpamPredictor::load`] to make it ready.
#[derive(Debug)]
pub struct SpamPredictor {
    config: Arc<SpamPredictorConfig>,
    engine: Box<dyn ClassificationEngine>,
}

impl SpamPredictor {
    /// Create a predictor with the given configuration
    #[instrument(skip(config), fields(engine = %config.engine))]
    pub fn new(config: SpamPredictorConfig) -> SpamPredictorResult<Self> {
        config.validate()?;

        let keywords = match &config.keywords_path {
            Some(path) => KeywordLists::from_file(path)?,
            None => KeywordLists::default(),
        };
        let extractor =
            FeatureExtractor::new(Normalizer::new(config.normalizer), Arc::new(keywords));

        let engine: Box<dyn ClassificationEngine> = match config.engine {
            EngineKind::Statistical => Box::new(StatisticalEngine::new(
                extractor,
                config.vectorizer.clone(),
                config.alpha,
            )),
            EngineKind::Rules => Box::new(RuleEngine::new(extractor, config.rule_weights)),
        };

        info!(ready = engine.is_ready(), "Initialized SpamPredictor");

        Ok(Self {
            config: Arc::new(config),
            engine,
        })
    }

    /// Create a predictor and restore it from a saved artifact
    pub fn from_path<P: AsRef<Path>>(
        config: SpamPredictorConfig,
        path: P,
    ) -> SpamPredictorResult<Self> {
        let mut predictor = Self::new(config)?;
        predictor.load(path)?;
        Ok(predictor)
    }

    /// Fit the engine on a labeled corpus
    ///
    /// A degenerate corpus fails with `InsufficientTrainingData` and leaves
    /// the current model in place.
    #[instrument(skip(self, corpus), fields(engine = %self.kind(), examples = corpus.len()))]
    pub fn train(&mut self, corpus: &[TrainingExample]) -> SpamPredictorResult<()> {
        let start_time = Instant::now();
        self.engine.train(corpus)?;
        info!("Training completed in {:?}", start_time.elapsed());
        Ok(())
    }

    /// Classify one text
    ///
    /// Empty text is accepted and yields a well-formed result; rejecting it
    /// is up to the caller.
    pub fn predict(&self, text: &str) -> SpamPredictorResult<PredictionResult> {
        let result = self.engine.predict(text)?;
        debug!(
            prediction = %result.prediction(),
            confidence = result.confidence(),
            "Classified text"
        );
        Ok(result)
    }

    /// Persist the current model
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save<P: AsRef<Path>>(&self, path: P) -> SpamPredictorResult<()> {
        let artifact = ModelArtifact::new(
            *self.engine.normalizer().config(),
            self.engine.export_state()?,
        );
        ModelStore::save(path, &artifact)
    }

    /// Replace the current model with a saved one
    ///
    /// Fails with `ModelUnavailable` when the artifact is missing, corrupt,
    /// of an incompatible version, or belongs to a different engine.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> SpamPredictorResult<()> {
        let artifact = ModelStore::load(path)?;

        if artifact.state.kind() != self.kind() {
            return Err(SpamPredictorError::model_unavailable(format!(
                "artifact holds a {} model but the {} engine is configured",
                artifact.state.kind(),
                self.kind()
            )));
        }

        self.engine.restore_state(artifact.normalizer, artifact.state)
    }

    /// Whether `predict` can be called
    pub fn is_ready(&self) -> bool {
        self.engine.is_ready()
    }

    /// Active engine
    pub fn kind(&self) -> EngineKind {
        self.engine.kind()
    }

    /// Configuration the predictor was built with
    pub fn config(&self) -> &SpamPredictorConfig {
        &self.config
    }

    /// Measure accuracy over a labeled corpus
    #[instrument(skip(self, corpus), fields(examples = corpus.len()))]
    pub fn evaluate(&self, corpus: &[TrainingExample]) -> SpamPredictorResult<EvaluationReport> {
        let mut report = EvaluationReport::default();
        for example in corpus {
            let result = self.predict(&example.text)?;
            report.record(example.label, result.prediction());
        }

        info!(
            correct = report.correct,
            total = report.total,
            accuracy = report.accuracy,
            "Evaluation completed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::sample_corpus;
    use shared_types::SpamLabel;

    #[test]
    fn statistical_predictor_lifecycle() {
        let mut predictor = SpamPredictor::new(SpamPredictorConfig::default()).unwrap();
        assert!(!predictor.is_ready());
        assert!(matches!(
            predictor.predict("hello").unwrap_err(),
            SpamPredictorError::NotTrained { .. }
        ));

        predictor.train(&sample_corpus()).unwrap();
        assert!(predictor.is_ready());

        // Retraining replaces the model in place
        predictor.train(&sample_corpus()).unwrap();
        assert!(predictor.is_ready());
    }

    #[test]
    fn rules_predictor_is_ready_at_construction() {
        let predictor =
            SpamPredictor::new(SpamPredictorConfig::for_engine(EngineKind::Rules)).unwrap();
        assert!(predictor.is_ready());
        assert_eq!(predictor.kind(), EngineKind::Rules);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SpamPredictorConfig {
            alpha: -1.0,
            ..SpamPredictorConfig::default()
        };
        assert!(SpamPredictor::new(config).is_err());
    }

    #[test]
    fn saving_untrained_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = SpamPredictor::new(SpamPredictorConfig::default()).unwrap();
        assert!(predictor.save(dir.path().join("model.json")).is_err());
    }

    #[test]
    fn loading_other_engine_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let rules =
            SpamPredictor::new(SpamPredictorConfig::for_engine(EngineKind::Rules)).unwrap();
        rules.save(&path).unwrap();

        let mut statistical = SpamPredictor::new(SpamPredictorConfig::default()).unwrap();
        let err = statistical.load(&path).unwrap_err();
        assert!(err.is_model_missing());
        assert!(!statistical.is_ready());
    }

    #[test]
    fn evaluate_reports_per_label_accuracy() {
        let mut predictor = SpamPredictor::new(SpamPredictorConfig::default()).unwrap();
        predictor.train(&sample_corpus()).unwrap();

        let report = predictor.evaluate(&sample_corpus()).unwrap();
        assert_eq!(report.total, 20);
        assert_eq!(report.label(SpamLabel::Spam).total, 10);
        assert_eq!(report.label(SpamLabel::Ham).total, 10);
        assert!(report.accuracy >= 0.9);
    }
}
