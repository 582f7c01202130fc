// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Deterministic rule-based scoring
//!
//! A weighted linear combination of keyword hits and surface features,
//! clamped to `[0, 1]` and read as a spam probability. Needs no corpus.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared_types::{SpamLabel, TrainingExample};
use tracing::debug;

use crate::{
    engine::ClassificationEngine,
    error::{SpamPredictorError, SpamPredictorResult},
    features::{FeatureExtractor, FeatureSet},
    keywords::KeywordLists,
    normalizer::{Normalizer, NormalizerConfig},
    store::ModelState,
    types::{EngineKind, PredictionResult},
};

/// Coefficients of the rule scorer
///
/// Penalty weights (`ham_keyword`, `question`) are stored as positive
/// magnitudes and subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleWeights {
    /// Per spam keyword hit
    pub spam_keyword: f64,
    /// Per `!`
    pub exclamation: f64,
    /// Times the share of uppercase characters
    pub capital_ratio: f64,
    /// Per link
    pub url: f64,
    /// Per email address
    pub email: f64,
    /// Subtracted per ham keyword hit
    pub ham_keyword: f64,
    /// Subtracted per `?`
    pub question: f64,
    /// Spam probability above which a text is spam
    pub threshold: f64,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            spam_keyword: 0.30,
            exclamation: 0.10,
            capital_ratio: 0.20,
            url: 0.20,
            email: 0.10,
            ham_keyword: 0.20,
            question: 0.05,
            threshold: 0.5,
        }
    }
}

impl RuleWeights {
    /// Validate that every coefficient is finite and the threshold lies in (0, 1)
    pub fn validate(&self) -> SpamPredictorResult<()> {
        let coefficients = [
            ("spam_keyword", self.spam_keyword),
            ("exclamation", self.exclamation),
            ("capital_ratio", self.capital_ratio),
            ("url", self.url),
            ("email", self.email),
            ("ham_keyword", self.ham_keyword),
            ("question", self.question),
        ];

        for (name, value) in coefficients {
            if !value.is_finite() {
                return Err(SpamPredictorError::config(format!(
                    "Rule weight '{name}' must be finite, got {value}"
                )));
            }
        }

        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(SpamPredictorError::config(format!(
                "Rule threshold must be in (0, 1), got {}",
                self.threshold
            )));
        }

        Ok(())
    }

    /// Spam probability of a feature set, clamped to `[0, 1]`
    #[allow(clippy::cast_precision_loss)]
    pub fn score(&self, features: &FeatureSet) -> f64 {
        let raw = self.spam_keyword * features.spam_keyword_count as f64
            + self.exclamation * features.exclamation_count as f64
            + self.capital_ratio * features.capital_ratio()
            + self.url * features.url_count as f64
            + self.email * features.email_count as f64
            - self.ham_keyword * features.ham_keyword_count as f64
            - self.question * features.question_count as f64;

        raw.clamp(0.0, 1.0)
    }

    /// Label implied by a spam probability
    pub fn decide(&self, spam_probability: f64) -> SpamLabel {
        if spam_probability > self.threshold {
            SpamLabel::Spam
        } else {
            SpamLabel::Ham
        }
    }

    /// Distance from the threshold rescaled to `[0, 1]`
    ///
    /// With the default threshold this is `|p - 0.5| * 2`.
    pub fn confidence(&self, spam_probability: f64) -> f64 {
        let distance = if spam_probability > self.threshold {
            (spam_probability - self.threshold) / (1.0 - self.threshold)
        } else {
            (self.threshold - spam_probability) / self.threshold
        };
        distance.clamp(0.0, 1.0)
    }
}

/// Keyword and surface-feature scoring engine
#[derive(Debug, Clone)]
pub struct RuleEngine {
    extractor: FeatureExtractor,
    weights: RuleWeights,
}

impl RuleEngine {
    /// Create an engine; it is ready immediately
    pub fn new(extractor: FeatureExtractor, weights: RuleWeights) -> Self {
        Self { extractor, weights }
    }

    /// Active coefficients
    pub fn weights(&self) -> &RuleWeights {
        &self.weights
    }

    /// Active keyword lists
    pub fn keywords(&self) -> &Arc<KeywordLists> {
        self.extractor.keywords()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(FeatureExtractor::default(), RuleWeights::default())
    }
}

impl ClassificationEngine for RuleEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Rules
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn train(&mut self, corpus: &[TrainingExample]) -> SpamPredictorResult<()> {
        debug!(
            examples = corpus.len(),
            "Rule engine needs no training, ignoring corpus"
        );
        Ok(())
    }

    fn predict(&self, text: &str) -> SpamPredictorResult<PredictionResult> {
        let features = self.extractor.extract(text);
        let spam_probability = self.weights.score(&features);
        let label = self.weights.decide(spam_probability);

        Ok(PredictionResult::new(
            label,
            spam_probability,
            self.weights.confidence(spam_probability),
            features,
        ))
    }

    fn export_state(&self) -> SpamPredictorResult<ModelState> {
        Ok(ModelState::Rules {
            keywords: self.keywords().as_ref().clone(),
            weights: self.weights,
        })
    }

    fn restore_state(
        &mut self,
        normalizer: NormalizerConfig,
        state: ModelState,
    ) -> SpamPredictorResult<()> {
        match state {
            ModelState::Rules { keywords, weights } => {
                weights.validate().map_err(|e| {
                    SpamPredictorError::model_unavailable(format!("inconsistent rule model: {e}"))
                })?;
                self.extractor.set_normalizer(Normalizer::new(normalizer));
                self.extractor.set_keywords(Arc::new(keywords));
                self.weights = weights;
                Ok(())
            }
            other => Err(SpamPredictorError::model_unavailable(format!(
                "rule engine cannot restore a {} model",
                other.kind()
            ))),
        }
    }

    fn normalizer(&self) -> &Normalizer {
        self.extractor.normalizer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(text: &str) -> FeatureSet {
        FeatureExtractor::default().extract(text)
    }

    #[test]
    fn default_weights_match_documented_constants() {
        let weights = RuleWeights::default();
        let features = FeatureSet {
            spam_keyword_count: 1,
            exclamation_count: 1,
            url_count: 1,
            ..FeatureSet::default()
        };
        // 0.30 + 0.10 + 0.20
        assert!((weights.score(&features) - 0.6).abs() < 1e-12);

        let features = FeatureSet {
            spam_keyword_count: 2,
            ham_keyword_count: 1,
            question_count: 2,
            ..FeatureSet::default()
        };
        // 0.60 - 0.20 - 0.10
        assert!((weights.score(&features) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn score_is_clamped() {
        let weights = RuleWeights::default();
        let spam = features("FREE MONEY! Click here to claim your $1000 prize NOW!");
        let ham = features("Thanks for your help with the project. It looks great!");
        assert!((weights.score(&spam) - 1.0).abs() < f64::EPSILON);
        assert!(weights.score(&ham).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_text_scores_zero() {
        let weights = RuleWeights::default();
        let features = features("");
        assert_eq!(features, FeatureSet::default());
        assert!(weights.score(&features).abs() < f64::EPSILON);
    }

    #[test]
    fn confidence_is_distance_from_boundary() {
        let weights = RuleWeights::default();
        assert!(weights.confidence(0.5).abs() < 1e-12);
        assert!((weights.confidence(1.0) - 1.0).abs() < 1e-12);
        assert!((weights.confidence(0.0) - 1.0).abs() < 1e-12);
        assert!((weights.confidence(0.75) - 0.5).abs() < 1e-12);
        assert!((weights.confidence(0.2) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn boundary_probability_is_ham() {
        let weights = RuleWeights::default();
        assert_eq!(weights.decide(0.5), SpamLabel::Ham);
        assert_eq!(weights.decide(0.500_001), SpamLabel::Spam);
    }

    #[test]
    fn engine_predicts_scenarios() {
        let engine = RuleEngine::default();
        assert!(engine.is_ready());

        let spam = engine
            .predict("FREE MONEY! Click here to claim your $1000 prize NOW!")
            .unwrap();
        assert_eq!(spam.prediction(), SpamLabel::Spam);
        assert!(spam.features().spam_keyword_count >= 1);
        assert_eq!(spam.features().exclamation_count, 2);

        let ham = engine
            .predict("Thanks for your help with the project. It looks great!")
            .unwrap();
        assert_eq!(ham.prediction(), SpamLabel::Ham);
        assert!((ham.confidence() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn training_is_a_no_op() {
        let mut engine = RuleEngine::default();
        let before = engine.predict("win a free prize").unwrap();
        engine.train(&[]).unwrap();
        assert_eq!(engine.predict("win a free prize").unwrap(), before);
    }

    #[test]
    fn weights_validation() {
        assert!(RuleWeights::default().validate().is_ok());
        assert!(
            RuleWeights {
                url: f64::INFINITY,
                ..RuleWeights::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            RuleWeights {
                threshold: 1.0,
                ..RuleWeights::default()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn state_round_trips_through_restore() {
        let keywords = KeywordLists::new(["jackpot"], ["minutes"]).unwrap();
        let weights = RuleWeights {
            spam_keyword: 0.6,
            ..RuleWeights::default()
        };
        let source = RuleEngine::new(
            FeatureExtractor::new(Normalizer::default(), Arc::new(keywords)),
            weights,
        );

        let mut restored = RuleEngine::default();
        restored
            .restore_state(NormalizerConfig::default(), source.export_state().unwrap())
            .unwrap();

        assert_eq!(restored.weights(), source.weights());
        assert_eq!(
            restored.predict("jackpot jackpot").unwrap(),
            source.predict("jackpot jackpot").unwrap()
        );
    }
}
