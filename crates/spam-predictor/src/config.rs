// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Engine configuration
//!
//! Selects the scoring engine and carries the tunable parameters of every
//! stage. Loaded from YAML or JSON files; every field has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    bayes::DEFAULT_ALPHA,
    error::{SpamPredictorError, SpamPredictorResult},
    normalizer::NormalizerConfig,
    rules::RuleWeights,
    types::EngineKind,
    vectorizer::TfidfConfig,
};

/// Complete configuration of a [`crate::SpamPredictor`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpamPredictorConfig {
    /// Scoring engine
    pub engine: EngineKind,
    /// Text normalization switches
    pub normalizer: NormalizerConfig,
    /// TF-IDF vocabulary settings (statistical engine)
    pub vectorizer: TfidfConfig,
    /// Naive Bayes smoothing constant (statistical engine)
    pub alpha: f64,
    /// Scoring coefficients (rule engine)
    pub rule_weights: RuleWeights,
    /// Keyword list file replacing the built-in lists
    pub keywords_path: Option<PathBuf>,
}

impl Default for SpamPredictorConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            normalizer: NormalizerConfig::default(),
            vectorizer: TfidfConfig::default(),
            alpha: DEFAULT_ALPHA,
            rule_weights: RuleWeights::default(),
            keywords_path: None,
        }
    }
}

impl SpamPredictorConfig {
    /// Default configuration for the given engine
    pub fn for_engine(engine: EngineKind) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Load configuration from a YAML or JSON file
    ///
    /// The format is chosen from the file extension (`.json` is JSON,
    /// everything else is parsed as YAML). The result is validated.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SpamPredictorResult<Self> {
        let path = path.as_ref();
        debug!("Loading engine configuration from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            SpamPredictorError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: SpamPredictorConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| {
                SpamPredictorError::json(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                SpamPredictorError::yaml(format!("Failed to parse {}: {}", path.display(), e))
            })?
        };

        config.validate()?;

        info!(
            engine = %config.engine,
            "Loaded engine configuration from {}",
            path.display()
        );

        Ok(config)
    }

    /// Validate every parameter
    pub fn validate(&self) -> SpamPredictorResult<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(SpamPredictorError::config(format!(
                "Invalid alpha: {} (must be > 0)",
                self.alpha
            )));
        }

        self.vectorizer.validate()?;
        self.rule_weights.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::normalizer::PunctuationMode;

    #[test]
    fn default_config_is_valid() {
        let config = SpamPredictorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine, EngineKind::Statistical);
        assert!((config.alpha - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "engine: rules\nnormalizer:\n  punctuation: replace_with_space\nrule_weights:\n  spam_keyword: 0.4"
        )
        .unwrap();

        let config = SpamPredictorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.engine, EngineKind::Rules);
        assert_eq!(
            config.normalizer.punctuation,
            PunctuationMode::ReplaceWithSpace
        );
        assert!(config.normalizer.strip_urls);
        assert!((config.rule_weights.spam_keyword - 0.4).abs() < f64::EPSILON);
        assert!((config.rule_weights.exclamation - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.vectorizer, TfidfConfig::default());
    }

    #[test]
    fn json_config_is_supported() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        write!(
            file,
            r#"{{"alpha": 0.5, "vectorizer": {{"min_df": 1, "ngram_range": [1, 1]}}}}"#
        )
        .unwrap();

        let config = SpamPredictorConfig::from_file(file.path()).unwrap();
        assert!((config.alpha - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.vectorizer.min_df, 1);
        assert_eq!(config.vectorizer.ngram_range, (1, 1));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let config = SpamPredictorConfig {
            alpha: 0.0,
            ..SpamPredictorConfig::default()
        };
        assert!(config.validate().unwrap_err().is_config_error());

        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(file, "vectorizer:\n  max_df: 1.5").unwrap();
        assert!(SpamPredictorConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = SpamPredictorConfig::from_file("/nonexistent/engine.yaml").unwrap_err();
        assert!(err.is_config_error());
    }
}
