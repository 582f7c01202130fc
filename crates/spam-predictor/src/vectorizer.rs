// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! TF-IDF term weighting
//!
//! Learns a bounded unigram/bigram vocabulary from normalized documents and
//! maps any normalized document to an L2-normalized sparse vector of
//! `count * idf` weights. Terms outside the vocabulary are ignored.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SpamPredictorError, SpamPredictorResult};

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "dont", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "ill", "im", "in", "into", "is", "it",
    "its", "itself", "ive", "just", "me", "more", "most", "my", "myself", "no", "nor", "not",
    "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those", "through",
    "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "would", "you", "youre", "youve",
    "your", "yours", "yourself", "yourselves",
];

/// Sparse vector as `(vocabulary index, weight)` pairs sorted by index
pub type SparseVector = Vec<(usize, f64)>;

/// Vocabulary and weighting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfidfConfig {
    /// Upper bound on vocabulary size, keeping the most frequent terms
    pub max_features: usize,
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
    /// Maximum fraction of documents a term may appear in
    pub max_df: f64,
    /// Inclusive `(min, max)` n-gram lengths
    pub ngram_range: (usize, usize),
    /// Drop English stop words before forming n-grams
    pub stop_words: bool,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            min_df: 2,
            max_df: 0.95,
            ngram_range: (1, 2),
            stop_words: true,
        }
    }
}

impl TfidfConfig {
    /// Validate the settings
    pub fn validate(&self) -> SpamPredictorResult<()> {
        if self.max_features == 0 {
            return Err(SpamPredictorError::config("max_features must be at least 1"));
        }

        if self.min_df == 0 {
            return Err(SpamPredictorError::config("min_df must be at least 1"));
        }

        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(SpamPredictorError::config(format!(
                "Invalid max_df: {} (must be in (0, 1])",
                self.max_df
            )));
        }

        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(SpamPredictorError::config(format!(
                "Invalid ngram_range: ({min_n}, {max_n})"
            )));
        }

        Ok(())
    }
}

/// Fitted TF-IDF vocabulary and inverse document frequencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: TfidfConfig,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and idf weights from normalized documents
    ///
    /// # Errors
    ///
    /// Returns `InsufficientTrainingData` if no term survives document
    /// frequency pruning.
    pub fn fit<S: AsRef<str>>(config: TfidfConfig, documents: &[S]) -> SpamPredictorResult<Self> {
        config.validate()?;

        let n_docs = documents.len();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut term_freq: HashMap<String, usize> = HashMap::new();

        for document in documents {
            let terms = analyze(&config, document.as_ref());
            let mut seen = HashSet::new();
            for term in terms {
                *term_freq.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.clone()) {
                    *doc_freq.entry(term).or_insert(0) += 1;
                }
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let max_doc_count = config.max_df * n_docs as f64;

        #[allow(clippy::cast_precision_loss)]
        let mut kept: Vec<(String, usize)> = doc_freq
            .iter()
            .filter(|(_, df)| **df >= config.min_df && **df as f64 <= max_doc_count)
            .map(|(term, _)| (term.clone(), term_freq.get(term).copied().unwrap_or(0)))
            .collect();

        if kept.is_empty() {
            return Err(SpamPredictorError::insufficient_data(format!(
                "no terms remain after document frequency pruning ({} documents, min_df {}, max_df {})",
                n_docs, config.min_df, config.max_df
            )));
        }

        if kept.len() > config.max_features {
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(config.max_features);
        }

        let mut terms: Vec<String> = kept.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        #[allow(clippy::cast_precision_loss)]
        let idf = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0);
                ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
            })
            .collect();

        let vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term, index))
            .collect::<BTreeMap<_, _>>();

        debug!(
            vocabulary_size = vocabulary.len(),
            documents = n_docs,
            "Fitted TF-IDF vocabulary"
        );

        Ok(Self {
            config,
            vocabulary,
            idf,
        })
    }

    /// Map a normalized document into the fitted weighted-term space
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for term in analyze(&self.config, document) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let mut vector: SparseVector = counts
            .into_iter()
            .filter_map(|(index, count)| {
                self.idf
                    .get(index)
                    .map(|idf| (index, count as f64 * idf))
            })
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut vector {
                *weight /= norm;
            }
        }

        vector
    }

    /// Check that a deserialized vectorizer is internally consistent
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid settings, and a validation
    /// error when vocabulary indices and idf weights disagree.
    pub fn validate(&self) -> SpamPredictorResult<()> {
        self.config.validate()?;

        if self.vocabulary.is_empty() {
            return Err(SpamPredictorError::validation("vocabulary is empty"));
        }

        if self.idf.len() != self.vocabulary.len() {
            return Err(SpamPredictorError::validation(format!(
                "{} idf weights for {} vocabulary terms",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }

        let mut seen = vec![false; self.idf.len()];
        for (term, &index) in &self.vocabulary {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(SpamPredictorError::validation(format!(
                        "vocabulary index {index} of '{term}' is used twice"
                    )));
                }
                None => {
                    return Err(SpamPredictorError::validation(format!(
                        "vocabulary index {index} of '{term}' is out of range"
                    )));
                }
            }
        }

        if let Some(weight) = self.idf.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
            return Err(SpamPredictorError::validation(format!(
                "invalid idf weight {weight}"
            )));
        }

        Ok(())
    }

    /// Number of terms in the vocabulary
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vocabulary index of a term
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Settings the vocabulary was fitted with
    pub fn config(&self) -> &TfidfConfig {
        &self.config
    }
}

/// Split a normalized document into the configured n-gram terms
fn analyze(config: &TfidfConfig, document: &str) -> Vec<String> {
    let tokens: Vec<&str> = document
        .split_whitespace()
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !config.stop_words || !ENGLISH_STOP_WORDS.contains(token))
        .collect();

    let (min_n, max_n) = config.ngram_range;
    let mut terms = Vec::new();
    for n in min_n.max(1)..=max_n.min(tokens.len()) {
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loose_config() -> TfidfConfig {
        TfidfConfig {
            min_df: 1,
            max_df: 1.0,
            ..TfidfConfig::default()
        }
    }

    #[test]
    fn analyzer_builds_unigrams_and_bigrams() {
        let terms = analyze(&TfidfConfig::default(), "click here to claim your free prize a");
        assert_eq!(
            terms,
            vec![
                "click",
                "claim",
                "free",
                "prize",
                "click claim",
                "claim free",
                "free prize"
            ]
        );
    }

    #[test]
    fn vocabulary_is_sorted_and_pruned() {
        let docs = ["free money now", "free prize now", "team lunch", "free lunch"];
        let config = TfidfConfig {
            max_df: 0.7,
            ngram_range: (1, 1),
            ..TfidfConfig::default()
        };
        let vectorizer = TfidfVectorizer::fit(config, &docs).unwrap();

        // "free" appears in 3/4 documents (> 0.7), singletons fall under min_df
        assert_eq!(vectorizer.vocabulary_size(), 2);
        assert_eq!(vectorizer.index_of("lunch"), Some(0));
        assert_eq!(vectorizer.index_of("now"), Some(1));
        assert_eq!(vectorizer.index_of("free"), None);
    }

    #[test]
    fn max_features_keeps_most_frequent_terms() {
        let docs = ["alpha alpha beta", "alpha gamma", "beta gamma delta"];
        let config = TfidfConfig {
            max_features: 2,
            ngram_range: (1, 1),
            ..loose_config()
        };
        let vectorizer = TfidfVectorizer::fit(config, &docs).unwrap();
        assert_eq!(vectorizer.vocabulary_size(), 2);
        assert!(vectorizer.index_of("alpha").is_some());
        // beta and gamma tie on frequency; lexicographic order wins
        assert!(vectorizer.index_of("beta").is_some());
        assert!(vectorizer.index_of("gamma").is_none());
    }

    #[test]
    fn vectors_are_unit_length() {
        let docs = ["free money now", "team lunch tomorrow", "free lunch"];
        let vectorizer = TfidfVectorizer::fit(loose_config(), &docs).unwrap();

        let vector = vectorizer.transform("free free lunch");
        let norm: f64 = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(vector.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn unknown_and_empty_documents_map_to_empty_vectors() {
        let docs = ["free money", "team lunch"];
        let vectorizer = TfidfVectorizer::fit(loose_config(), &docs).unwrap();
        assert!(vectorizer.transform("completely unrelated words").is_empty());
        assert!(vectorizer.transform("").is_empty());
    }

    #[test]
    fn idf_uses_smoothed_formula() {
        let docs = ["rare common", "common"];
        let config = TfidfConfig {
            ngram_range: (1, 1),
            ..loose_config()
        };
        let vectorizer = TfidfVectorizer::fit(config, &docs).unwrap();
        let rare = vectorizer.index_of("rare").unwrap();
        let common = vectorizer.index_of("common").unwrap();
        assert!((vectorizer.idf[rare] - ((3.0_f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert!((vectorizer.idf[common] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_vocabulary_is_insufficient_data() {
        let docs = ["one", "two"];
        let err = TfidfVectorizer::fit(TfidfConfig::default(), &docs).unwrap_err();
        assert!(matches!(
            err,
            SpamPredictorError::InsufficientTrainingData { .. }
        ));
    }

    #[test]
    fn fitted_vectorizer_is_consistent() {
        let docs = ["free money now", "team lunch tomorrow", "free lunch"];
        let vectorizer = TfidfVectorizer::fit(loose_config(), &docs).unwrap();
        assert!(vectorizer.validate().is_ok());
    }

    #[test]
    fn inconsistent_vectorizer_is_rejected() {
        let docs = ["free money now", "team lunch tomorrow", "free lunch"];
        let fitted = TfidfVectorizer::fit(loose_config(), &docs).unwrap();

        let mut out_of_range = fitted.clone();
        out_of_range.vocabulary.insert("free".to_string(), 999);
        assert!(out_of_range.validate().is_err());
        assert!(out_of_range.transform("free free").len() <= 1);

        let mut duplicate = fitted.clone();
        duplicate.vocabulary.insert("free".to_string(), 0);
        duplicate.vocabulary.insert("lunch".to_string(), 0);
        assert!(duplicate.validate().is_err());

        let mut short_idf = fitted.clone();
        short_idf.idf.pop();
        assert!(short_idf.validate().is_err());

        let mut bad_weight = fitted.clone();
        bad_weight.idf[0] = f64::NAN;
        assert!(bad_weight.validate().is_err());

        let mut zero_ngram = fitted;
        zero_ngram.config.ngram_range = (0, 1);
        assert!(zero_ngram.validate().is_err());
        // Still safe to use without validation
        let _ = zero_ngram.transform("free lunch");
    }

    #[test]
    fn oversized_ngram_range_is_bounded_by_tokens() {
        let config = TfidfConfig {
            ngram_range: (1, usize::MAX),
            stop_words: false,
            ..TfidfConfig::default()
        };
        assert_eq!(analyze(&config, "aa bb").len(), 3);
    }

    #[test]
    fn config_validation() {
        assert!(TfidfConfig::default().validate().is_ok());
        assert!(
            TfidfConfig {
                max_df: 0.0,
                ..TfidfConfig::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            TfidfConfig {
                ngram_range: (2, 1),
                ..TfidfConfig::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            TfidfConfig {
                min_df: 0,
                ..TfidfConfig::default()
            }
            .validate()
            .is_err()
        );
    }
}
