// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Feature extraction
//!
//! Surface features (punctuation, capitals, numbers, links, addresses and
//! length) are measured on the original text because normalization destroys
//! them. Word and keyword counts are measured on the normalized token stream.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{keywords::KeywordLists, normalizer::Normalizer};

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://\S+").expect("url regex is valid"));
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+").expect("email regex is valid"));
static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("number regex is valid"));

/// Canonical feature names, in reporting order
pub const FEATURE_NAMES: [&str; 10] = [
    "text_length",
    "word_count",
    "exclamation_count",
    "question_count",
    "capital_count",
    "number_count",
    "url_count",
    "email_count",
    "spam_keyword_count",
    "ham_keyword_count",
];

/// Fixed-shape structural description of a text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Characters in the original text
    pub text_length: u64,
    /// Tokens in the normalized text
    pub word_count: u64,
    /// `!` characters
    pub exclamation_count: u64,
    /// `?` characters
    pub question_count: u64,
    /// Uppercase characters
    pub capital_count: u64,
    /// Runs of digits
    pub number_count: u64,
    /// `http://` and `https://` links
    pub url_count: u64,
    /// `user@host` substrings
    pub email_count: u64,
    /// Tokens (or phrases) found in the spam keyword list
    pub spam_keyword_count: u64,
    /// Tokens (or phrases) found in the ham keyword list
    pub ham_keyword_count: u64,
}

impl FeatureSet {
    /// Look up a feature by its canonical name
    pub fn get(&self, name: &str) -> Option<u64> {
        let value = match name {
            "text_length" => self.text_length,
            "word_count" => self.word_count,
            "exclamation_count" => self.exclamation_count,
            "question_count" => self.question_count,
            "capital_count" => self.capital_count,
            "number_count" => self.number_count,
            "url_count" => self.url_count,
            "email_count" => self.email_count,
            "spam_keyword_count" => self.spam_keyword_count,
            "ham_keyword_count" => self.ham_keyword_count,
            _ => return None,
        };
        Some(value)
    }

    /// Iterate over `(name, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        FEATURE_NAMES
            .iter()
            .filter_map(|name| self.get(name).map(|value| (*name, value)))
    }

    /// Share of uppercase characters, safe for empty text
    #[allow(clippy::cast_precision_loss)]
    pub fn capital_ratio(&self) -> f64 {
        self.capital_count as f64 / self.text_length.max(1) as f64
    }
}

/// Computes [`FeatureSet`]s from raw text
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    normalizer: Normalizer,
    keywords: Arc<KeywordLists>,
}

impl FeatureExtractor {
    /// Create an extractor from a normalizer and shared keyword lists
    pub fn new(normalizer: Normalizer, keywords: Arc<KeywordLists>) -> Self {
        Self {
            normalizer,
            keywords,
        }
    }

    /// Normalizer used for token-level features
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Active keyword lists
    pub fn keywords(&self) -> &Arc<KeywordLists> {
        &self.keywords
    }

    /// Replace the normalizer
    pub fn set_normalizer(&mut self, normalizer: Normalizer) {
        self.normalizer = normalizer;
    }

    /// Replace the keyword lists wholesale
    pub fn set_keywords(&mut self, keywords: Arc<KeywordLists>) {
        self.keywords = keywords;
    }

    /// Compute every canonical feature of a text; never fails
    pub fn extract(&self, text: &str) -> FeatureSet {
        let normalized = self.normalizer.normalize(text);
        self.extract_with_normalized(text, &normalized)
    }

    /// Compute features when the caller already holds the normalized form
    pub(crate) fn extract_with_normalized(&self, text: &str, normalized: &str) -> FeatureSet {
        let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
        let hits = self.keywords.count_hits(&tokens);

        let mut features = FeatureSet {
            word_count: tokens.len() as u64,
            number_count: NUMBER_REGEX.find_iter(text).count() as u64,
            url_count: URL_REGEX.find_iter(text).count() as u64,
            email_count: EMAIL_REGEX.find_iter(text).count() as u64,
            spam_keyword_count: hits.spam,
            ham_keyword_count: hits.ham,
            ..FeatureSet::default()
        };

        for c in text.chars() {
            features.text_length += 1;
            match c {
                '!' => features.exclamation_count += 1,
                '?' => features.question_count += 1,
                c if c.is_uppercase() => features.capital_count += 1,
                _ => {}
            }
        }

        features
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(Normalizer::default(), Arc::new(KeywordLists::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spam_scenario_features() {
        let extractor = FeatureExtractor::default();
        let features = extractor.extract("FREE MONEY! Click here to claim your $1000 prize NOW!");

        assert_eq!(features.exclamation_count, 2);
        assert_eq!(features.question_count, 0);
        assert_eq!(features.number_count, 1);
        assert_eq!(features.capital_count, 13);
        assert_eq!(features.text_length, 53);
        assert_eq!(features.word_count, 9);
        // free, money, click here, claim, prize
        assert_eq!(features.spam_keyword_count, 5);
        assert_eq!(features.ham_keyword_count, 0);
    }

    #[test]
    fn ham_scenario_features() {
        let extractor = FeatureExtractor::default();
        let features = extractor.extract("Thanks for your help with the project. It looks great!");

        assert_eq!(features.spam_keyword_count, 0);
        assert_eq!(features.ham_keyword_count, 3);
        assert_eq!(features.exclamation_count, 1);
        assert_eq!(features.capital_count, 2);
    }

    #[test]
    fn links_and_addresses() {
        let extractor = FeatureExtractor::default();
        let features = extractor
            .extract("See https://a.io and HTTP://b.io, mail me@x.org or you@y.net? 2 links");

        assert_eq!(features.url_count, 2);
        assert_eq!(features.email_count, 2);
        assert_eq!(features.question_count, 1);
        assert_eq!(features.number_count, 1);
    }

    #[test]
    fn empty_and_symbol_only_text() {
        let extractor = FeatureExtractor::default();
        assert_eq!(extractor.extract(""), FeatureSet::default());

        let features = extractor.extract("?!?! 123");
        assert_eq!(features.word_count, 0);
        assert_eq!(features.exclamation_count, 2);
        assert_eq!(features.question_count, 2);
        assert_eq!(features.number_count, 1);
    }

    #[test]
    fn capital_ratio_handles_empty_text() {
        assert!(FeatureSet::default().capital_ratio().abs() < f64::EPSILON);

        let features = FeatureSet {
            text_length: 4,
            capital_count: 2,
            ..FeatureSet::default()
        };
        assert!((features.capital_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn mapping_view_covers_canonical_names() {
        let features = FeatureExtractor::default().extract("Win a PRIZE!");
        let names: Vec<&str> = features.iter().map(|(name, _)| name).collect();
        assert_eq!(names, FEATURE_NAMES);
        assert_eq!(features.get("exclamation_count"), Some(1));
        assert_eq!(features.get("unknown"), None);

        let value = serde_json::to_value(features).unwrap();
        for name in FEATURE_NAMES {
            assert!(value.get(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn keyword_lists_can_be_swapped() {
        let mut extractor = FeatureExtractor::default();
        extractor.set_keywords(Arc::new(KeywordLists::new(["great"], ["thanks"]).unwrap()));
        let features = extractor.extract("Thanks, great work");
        assert_eq!(features.spam_keyword_count, 1);
        assert_eq!(features.ham_keyword_count, 1);
    }
}
