// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Type-safe domain models for spam prediction
//!
//! Strongly-typed wrappers that keep prediction results internally
//! consistent: probabilities are validated, complementary and tied to the
//! label they imply.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use shared_types::SpamLabel;

use crate::{
    error::{SpamPredictorError, SpamPredictorResult},
    features::FeatureSet,
};

/// Scoring strategy selected at construction time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// TF-IDF weighting with multinomial naive Bayes, trained from a corpus
    #[default]
    Statistical,
    /// Deterministic weighted keyword and surface-feature scoring
    Rules,
}

impl EngineKind {
    /// Lowercase name of the engine
    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Statistical => "statistical",
            EngineKind::Rules => "rules",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = SpamPredictorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "statistical" | "naive_bayes" | "nb" => Ok(EngineKind::Statistical),
            "rules" | "rule" | "rule_based" => Ok(EngineKind::Rules),
            other => Err(SpamPredictorError::config(format!(
                "Unknown engine '{other}' (expected 'statistical' or 'rules')"
            ))),
        }
    }
}

/// Probability or confidence with validation (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    /// Create a new score with validation
    ///
    /// # Errors
    ///
    /// Returns an error if the score is NaN or not between 0.0 and 1.0
    pub fn new(score: f64) -> SpamPredictorResult<Self> {
        if score.is_nan() {
            return Err(SpamPredictorError::validation("Score cannot be NaN"));
        }

        if !(0.0..=1.0).contains(&score) {
            return Err(SpamPredictorError::validation(format!(
                "Score must be between 0.0 and 1.0, got {score}"
            )));
        }

        Ok(Self(score))
    }

    /// Clamp a computed value into range, mapping NaN to 0
    pub fn saturating(score: f64) -> Self {
        if score.is_nan() {
            Self(0.0)
        } else {
            Self(score.clamp(0.0, 1.0))
        }
    }

    /// Get the score as f64
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ConfidenceScore {
    type Error = SpamPredictorError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfidenceScore> for f64 {
    fn from(score: ConfidenceScore) -> Self {
        score.0
    }
}

/// Outcome of classifying one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    prediction: SpamLabel,
    confidence: ConfidenceScore,
    spam_probability: ConfidenceScore,
    ham_probability: ConfidenceScore,
    features: FeatureSet,
}

impl PredictionResult {
    /// Build a result from the chosen label and the spam probability
    ///
    /// The ham probability is derived as the complement.
    pub fn new(
        prediction: SpamLabel,
        spam_probability: f64,
        confidence: f64,
        features: FeatureSet,
    ) -> Self {
        let spam_probability = ConfidenceScore::saturating(spam_probability);
        Self {
            prediction,
            confidence: ConfidenceScore::saturating(confidence),
            ham_probability: ConfidenceScore(1.0 - spam_probability.as_f64()),
            spam_probability,
            features,
        }
    }

    /// Predicted label
    pub fn prediction(&self) -> SpamLabel {
        self.prediction
    }

    /// Check if the text was classified as spam
    pub fn is_spam(&self) -> bool {
        self.prediction.is_spam()
    }

    /// Confidence in the predicted label
    pub fn confidence(&self) -> f64 {
        self.confidence.as_f64()
    }

    /// Probability that the text is spam
    pub fn spam_probability(&self) -> f64 {
        self.spam_probability.as_f64()
    }

    /// Probability that the text is ham
    pub fn ham_probability(&self) -> f64 {
        self.ham_probability.as_f64()
    }

    /// Features computed for the text
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }
}

/// Correct and total predictions for one true label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    /// Examples carrying this label
    pub total: usize,
    /// Examples of this label predicted correctly
    pub correct: usize,
}

/// Accuracy of a model over a labeled corpus
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Examples evaluated
    pub total: usize,
    /// Examples whose prediction matched the label
    pub correct: usize,
    /// `correct / total`, 0 for an empty corpus
    pub accuracy: f64,
    /// Breakdown by true label
    pub per_label: BTreeMap<SpamLabel, LabelCounts>,
}

impl EvaluationReport {
    /// Record one prediction against its true label
    pub fn record(&mut self, expected: SpamLabel, predicted: SpamLabel) {
        let counts = self.per_label.entry(expected).or_default();
        counts.total += 1;
        self.total += 1;
        if expected == predicted {
            counts.correct += 1;
            self.correct += 1;
        }

        #[allow(clippy::cast_precision_loss)]
        {
            self.accuracy = self.correct as f64 / self.total as f64;
        }
    }

    /// Counts for one true label
    pub fn label(&self, label: SpamLabel) -> LabelCounts {
        self.per_label.get(&label).copied().unwrap_or_default()
    }
}
