// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Multinomial naive Bayes over TF-IDF weighted vectors

use serde::{Deserialize, Serialize};
use shared_types::SpamLabel;

use crate::{
    error::{SpamPredictorError, SpamPredictorResult},
    vectorizer::SparseVector,
};

/// Default additive smoothing constant
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Fitted class priors and per-term class-conditional log probabilities
///
/// Both arrays are indexed by [`SpamLabel::index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    alpha: f64,
    class_log_prior: [f64; 2],
    feature_log_prob: [Vec<f64>; 2],
}

impl MultinomialNb {
    /// Fit the classifier on weighted document vectors
    ///
    /// `vocabulary_size` is the dimension of the vectors. Both labels must be
    /// present in `labels`.
    pub fn fit(
        vectors: &[SparseVector],
        labels: &[SpamLabel],
        vocabulary_size: usize,
        alpha: f64,
    ) -> SpamPredictorResult<Self> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(SpamPredictorError::config(format!(
                "Invalid smoothing alpha: {alpha} (must be > 0)"
            )));
        }

        if vectors.len() != labels.len() {
            return Err(SpamPredictorError::internal(format!(
                "{} vectors but {} labels",
                vectors.len(),
                labels.len()
            )));
        }

        let mut class_docs = [0usize; 2];
        let mut weight_sums = [vec![0.0; vocabulary_size], vec![0.0; vocabulary_size]];

        for (vector, label) in vectors.iter().zip(labels) {
            let class = label.index();
            class_docs[class] += 1;
            for &(term, weight) in vector {
                if term >= vocabulary_size {
                    return Err(SpamPredictorError::internal(format!(
                        "term index {term} outside vocabulary of {vocabulary_size}"
                    )));
                }
                weight_sums[class][term] += weight;
            }
        }

        if class_docs.contains(&0) {
            return Err(SpamPredictorError::insufficient_data(
                "both labels must be present to fit the classifier",
            ));
        }

        #[allow(clippy::cast_precision_loss)]
        let n_docs = vectors.len() as f64;
        #[allow(clippy::cast_precision_loss)]
        let class_log_prior = class_docs.map(|count| (count as f64 / n_docs).ln());

        #[allow(clippy::cast_precision_loss)]
        let smoothed_total = alpha * vocabulary_size as f64;
        let feature_log_prob = weight_sums.map(|sums| {
            let denominator = (sums.iter().sum::<f64>() + smoothed_total).ln();
            sums.iter()
                .map(|weight| (weight + alpha).ln() - denominator)
                .collect::<Vec<_>>()
        });

        Ok(Self {
            alpha,
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Posterior probabilities `[ham, spam]` for a weighted vector
    pub fn predict_proba(&self, vector: &[(usize, f64)]) -> [f64; 2] {
        let joint = self.joint_log_likelihood(vector);
        let max = joint[0].max(joint[1]);
        let log_norm = max + joint.iter().map(|j| (j - max).exp()).sum::<f64>().ln();
        let ham = (joint[0] - log_norm).exp();
        [ham, 1.0 - ham]
    }

    /// Most probable label, ties going to ham
    pub fn predict(&self, vector: &[(usize, f64)]) -> SpamLabel {
        let [ham, spam] = self.joint_log_likelihood(vector);
        if spam > ham {
            SpamLabel::Spam
        } else {
            SpamLabel::Ham
        }
    }

    /// Check that a deserialized classifier matches a vocabulary of `vocabulary_size` terms
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive alpha, non-finite
    /// log probabilities, or per-class tables of the wrong length.
    pub fn validate(&self, vocabulary_size: usize) -> SpamPredictorResult<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(SpamPredictorError::validation(format!(
                "invalid smoothing alpha {}",
                self.alpha
            )));
        }

        if self
            .class_log_prior
            .iter()
            .any(|prior| !(prior.is_finite() && *prior <= 0.0))
        {
            return Err(SpamPredictorError::validation(format!(
                "invalid class log priors {:?}",
                self.class_log_prior
            )));
        }

        for (class, log_probs) in self.feature_log_prob.iter().enumerate() {
            if log_probs.len() != vocabulary_size {
                return Err(SpamPredictorError::validation(format!(
                    "class {class} has {} term probabilities for {vocabulary_size} terms",
                    log_probs.len()
                )));
            }
            if log_probs.iter().any(|lp| !lp.is_finite()) {
                return Err(SpamPredictorError::validation(format!(
                    "class {class} has non-finite term probabilities"
                )));
            }
        }

        Ok(())
    }

    /// Smoothing constant the classifier was fitted with
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    fn joint_log_likelihood(&self, vector: &[(usize, f64)]) -> [f64; 2] {
        let mut joint = self.class_log_prior;
        for (class, log_probs) in self.feature_log_prob.iter().enumerate() {
            joint[class] += vector
                .iter()
                .filter_map(|&(term, weight)| log_probs.get(term).map(|lp| lp * weight))
                .sum::<f64>();
        }
        joint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_checks_shape_and_values() {
        let model = toy_model();
        assert!(model.validate(2).is_ok());
        assert!(model.validate(3).is_err());

        let mut short = model.clone();
        short.feature_log_prob[1].pop();
        assert!(short.validate(2).is_err());

        let mut bad_prior = model.clone();
        bad_prior.class_log_prior[0] = f64::NAN;
        assert!(bad_prior.validate(2).is_err());

        let mut bad_alpha = model;
        bad_alpha.alpha = 0.0;
        assert!(bad_alpha.validate(2).is_err());
    }

    fn toy_model() -> MultinomialNb {
        // term 0 is spammy, term 1 is hammy
        let vectors = vec![vec![(0, 1.0)], vec![(0, 1.0)], vec![(1, 1.0)], vec![(1, 1.0)]];
        let labels = [
            SpamLabel::Spam,
            SpamLabel::Spam,
            SpamLabel::Ham,
            SpamLabel::Ham,
        ];
        MultinomialNb::fit(&vectors, &labels, 2, DEFAULT_ALPHA).unwrap()
    }

    #[test]
    fn learns_class_conditional_terms() {
        let model = toy_model();
        assert_eq!(model.predict(&[(0, 1.0)]), SpamLabel::Spam);
        assert_eq!(model.predict(&[(1, 1.0)]), SpamLabel::Ham);

        // (2 + 1) / (2 + 2) for the matching class, 1 / 4 for the other
        let [ham, spam] = model.predict_proba(&[(0, 1.0)]);
        assert!((spam - 0.75).abs() < 1e-12);
        assert!((ham + spam - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_vector_falls_back_to_priors() {
        let model = toy_model();
        let [ham, spam] = model.predict_proba(&[]);
        assert!((ham - 0.5).abs() < 1e-12);
        assert!((spam - 0.5).abs() < 1e-12);
        assert_eq!(model.predict(&[]), SpamLabel::Ham);
    }

    #[test]
    fn unequal_priors_shift_empty_prediction() {
        let vectors = vec![vec![(0, 1.0)], vec![(0, 1.0)], vec![(1, 1.0)]];
        let labels = [SpamLabel::Spam, SpamLabel::Spam, SpamLabel::Ham];
        let model = MultinomialNb::fit(&vectors, &labels, 2, DEFAULT_ALPHA).unwrap();
        let [_, spam] = model.predict_proba(&[]);
        assert!((spam - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn single_label_is_rejected() {
        let vectors = vec![vec![(0, 1.0)], vec![(1, 1.0)]];
        let labels = [SpamLabel::Spam, SpamLabel::Spam];
        let err = MultinomialNb::fit(&vectors, &labels, 2, DEFAULT_ALPHA).unwrap_err();
        assert!(matches!(
            err,
            SpamPredictorError::InsufficientTrainingData { .. }
        ));
    }

    #[test]
    fn invalid_alpha_is_rejected() {
        let vectors = vec![vec![(0, 1.0)], vec![(1, 1.0)]];
        let labels = [SpamLabel::Spam, SpamLabel::Ham];
        assert!(MultinomialNb::fit(&vectors, &labels, 2, 0.0).is_err());
        assert!(MultinomialNb::fit(&vectors, &labels, 2, f64::NAN).is_err());
    }
}
