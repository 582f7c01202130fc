// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Statistical engine: TF-IDF weighting feeding multinomial naive Bayes

use std::sync::Arc;

use shared_types::{SpamLabel, TrainingExample};
use tracing::{debug, info};

use crate::{
    bayes::{DEFAULT_ALPHA, MultinomialNb},
    engine::{ClassificationEngine, validate_corpus},
    error::{SpamPredictorError, SpamPredictorResult},
    features::FeatureExtractor,
    normalizer::{Normalizer, NormalizerConfig},
    store::ModelState,
    types::{EngineKind, PredictionResult},
    vectorizer::{TfidfConfig, TfidfVectorizer},
};

/// Fitted vectorizer and classifier, always replaced together
#[derive(Debug, Clone)]
struct FittedModel {
    vectorizer: TfidfVectorizer,
    classifier: MultinomialNb,
}

/// Corpus-trained spam classifier
#[derive(Debug, Clone)]
pub struct StatisticalEngine {
    extractor: FeatureExtractor,
    vectorizer_config: TfidfConfig,
    alpha: f64,
    model: Option<FittedModel>,
}

impl StatisticalEngine {
    /// Create an untrained engine
    pub fn new(extractor: FeatureExtractor, vectorizer_config: TfidfConfig, alpha: f64) -> Self {
        Self {
            extractor,
            vectorizer_config,
            alpha,
            model: None,
        }
    }

    /// Number of terms in the fitted vocabulary, if trained
    pub fn vocabulary_size(&self) -> Option<usize> {
        self.model
            .as_ref()
            .map(|model| model.vectorizer.vocabulary_size())
    }

    fn fit(&self, corpus: &[TrainingExample]) -> SpamPredictorResult<FittedModel> {
        validate_corpus(corpus)?;

        let normalizer = self.extractor.normalizer();
        let documents: Vec<String> = corpus
            .iter()
            .map(|example| normalizer.normalize(&example.text))
            .collect();
        let labels: Vec<SpamLabel> = corpus.iter().map(|example| example.label).collect();

        let vectorizer = TfidfVectorizer::fit(self.vectorizer_config.clone(), &documents)?;
        let vectors: Vec<_> = documents
            .iter()
            .map(|document| vectorizer.transform(document))
            .collect();
        let classifier =
            MultinomialNb::fit(&vectors, &labels, vectorizer.vocabulary_size(), self.alpha)?;

        Ok(FittedModel {
            vectorizer,
            classifier,
        })
    }
}

impl Default for StatisticalEngine {
    fn default() -> Self {
        Self::new(
            FeatureExtractor::default(),
            TfidfConfig::default(),
            DEFAULT_ALPHA,
        )
    }
}

impl ClassificationEngine for StatisticalEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Statistical
    }

    fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    fn train(&mut self, corpus: &[TrainingExample]) -> SpamPredictorResult<()> {
        let model = self.fit(corpus)?;
        info!(
            examples = corpus.len(),
            vocabulary_size = model.vectorizer.vocabulary_size(),
            "Fitted statistical model"
        );
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, text: &str) -> SpamPredictorResult<PredictionResult> {
        let model = self.model.as_ref().ok_or_else(|| {
            SpamPredictorError::not_trained("statistical engine has no fitted model")
        })?;

        let normalized = self.extractor.normalizer().normalize(text);
        let features = self.extractor.extract_with_normalized(text, &normalized);
        let vector = model.vectorizer.transform(&normalized);
        let [ham, spam] = model.classifier.predict_proba(&vector);
        let label = model.classifier.predict(&vector);

        debug!(
            matched_terms = vector.len(),
            spam_probability = spam,
            "Scored text"
        );

        Ok(PredictionResult::new(label, spam, spam.max(ham), features))
    }

    fn export_state(&self) -> SpamPredictorResult<ModelState> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| SpamPredictorError::not_trained("nothing to save before training"))?;

        Ok(ModelState::Statistical {
            vectorizer: model.vectorizer.clone(),
            classifier: model.classifier.clone(),
            keywords: self.extractor.keywords().as_ref().clone(),
        })
    }

    fn restore_state(
        &mut self,
        normalizer: NormalizerConfig,
        state: ModelState,
    ) -> SpamPredictorResult<()> {
        match state {
            ModelState::Statistical {
                vectorizer,
                classifier,
                keywords,
            } => {
                vectorizer
                    .validate()
                    .and_then(|()| classifier.validate(vectorizer.vocabulary_size()))
                    .map_err(|e| {
                        SpamPredictorError::model_unavailable(format!(
                            "inconsistent statistical model: {e}"
                        ))
                    })?;
                self.extractor.set_normalizer(Normalizer::new(normalizer));
                self.extractor.set_keywords(Arc::new(keywords));
                self.vectorizer_config = vectorizer.config().clone();
                self.alpha = classifier.alpha();
                self.model = Some(FittedModel {
                    vectorizer,
                    classifier,
                });
                Ok(())
            }
            other => Err(SpamPredictorError::model_unavailable(format!(
                "statistical engine cannot restore a {} model",
                other.kind()
            ))),
        }
    }

    fn normalizer(&self) -> &Normalizer {
        self.extractor.normalizer()
    }
}
