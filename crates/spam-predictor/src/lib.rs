// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Spam/ham classification of short text messages
//!
//! This crate turns raw text into a label (`spam` or `ham`) with a
//! confidence value. Two interchangeable engines sit behind one façade:
//! a statistical pipeline trained from labeled examples and a deterministic
//! keyword scorer that needs no corpus.
//!
//! # Key Features
//!
//! - **Statistical engine**: TF-IDF weighted unigrams and bigrams feeding a multinomial naive Bayes classifier
//! - **Rule engine**: configurable weighted sum of keyword hits and surface features
//! - **Shared feature set**: ten named structural features reported with every prediction
//! - **Durable models**: versioned JSON artifacts written atomically
//! - **Observability**: structured logging and tracing for training, persistence and prediction
//!
//! # Architecture
//!
//! - [`normalizer`]: canonical lowercase, punctuation-free text
//! - [`keywords`] and [`features`]: keyword lists and feature extraction
//! - [`vectorizer`] and [`bayes`]: the statistical pipeline
//! - [`rules`]: the rule-based scorer
//! - [`engine`]: the common engine interface
//! - [`store`]: model artifacts on disk
//! - [`predictor`]: the façade tying it together
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use spam_predictor::{SpamPredictor, SpamPredictorConfig, sample_corpus};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut predictor = SpamPredictor::new(SpamPredictorConfig::default())?;
//!
//! if predictor.load("models/spam_classifier.json").is_err() {
//!     predictor.train(&sample_corpus())?;
//!     predictor.save("models/spam_classifier.json")?;
//! }
//!
//! let result = predictor.predict("FREE MONEY! Click here to claim your prize!")?;
//! println!("{} ({:.2})", result.prediction(), result.confidence());
//! # Ok(())
//! # }
//! ```

pub mod bayes;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod features;
pub mod keywords;
pub mod normalizer;
pub mod predictor;
pub mod rules;
pub mod statistical;
pub mod store;
pub mod types;
pub mod vectorizer;

// Re-export main types for convenience
pub use config::SpamPredictorConfig;
pub use corpus::{DemoExamples, demo_examples, sample_corpus};
pub use engine::ClassificationEngine;
pub use error::{SpamPredictorError, SpamPredictorResult};
pub use features::{FeatureExtractor, FeatureSet};
pub use keywords::KeywordLists;
pub use normalizer::{Normalizer, NormalizerConfig, PunctuationMode};
pub use predictor::SpamPredictor;
pub use rules::{RuleEngine, RuleWeights};
pub use shared_types::{SpamLabel, TrainingExample};
pub use statistical::StatisticalEngine;
pub use store::{ModelArtifact, ModelState, ModelStore};
pub use types::{ConfidenceScore, EngineKind, EvaluationReport, LabelCounts, PredictionResult};
pub use vectorizer::{TfidfConfig, TfidfVectorizer};
