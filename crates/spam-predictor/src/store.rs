// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Durable model artifacts
//!
//! A model is persisted as one JSON document holding the engine state and
//! the normalizer configuration it was fitted with. Writes go through a
//! sibling temporary file and an atomic rename so readers never observe a
//! partially written artifact.

use std::{
    fs,
    io::{self, ErrorKind, Write},
    path::Path,
};

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    bayes::MultinomialNb,
    error::{SpamPredictorError, SpamPredictorResult},
    keywords::KeywordLists,
    normalizer::NormalizerConfig,
    rules::RuleWeights,
    types::EngineKind,
    vectorizer::TfidfVectorizer,
};

/// Version written into new artifacts; loads require the same major version
pub const FORMAT_VERSION: Version = Version::new(1, 0, 0);

/// Learned or configured state of one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum ModelState {
    /// Fitted vocabulary, idf weights and classifier parameters
    Statistical {
        /// Fitted TF-IDF vocabulary
        vectorizer: TfidfVectorizer,
        /// Fitted naive Bayes parameters
        classifier: MultinomialNb,
        /// Keyword lists behind the informational feature counts
        keywords: KeywordLists,
    },
    /// Keyword lists and scoring coefficients
    Rules {
        /// Spam and ham keyword lists
        keywords: KeywordLists,
        /// Scoring coefficients
        weights: RuleWeights,
    },
}

impl ModelState {
    /// Engine this state belongs to
    pub fn kind(&self) -> EngineKind {
        match self {
            ModelState::Statistical { .. } => EngineKind::Statistical,
            ModelState::Rules { .. } => EngineKind::Rules,
        }
    }

    /// Check internal consistency of a state read from storage
    ///
    /// Any inconsistency is reported as `ModelUnavailable`, so callers treat
    /// a damaged artifact like a missing one.
    pub fn validate(&self) -> SpamPredictorResult<()> {
        let result = match self {
            ModelState::Statistical {
                vectorizer,
                classifier,
                ..
            } => vectorizer
                .validate()
                .and_then(|()| classifier.validate(vectorizer.vocabulary_size())),
            ModelState::Rules { weights, .. } => weights.validate(),
        };

        result.map_err(|e| {
            SpamPredictorError::model_unavailable(format!(
                "Inconsistent {} model state: {e}",
                self.kind()
            ))
        })
    }
}

/// Self-describing persisted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Artifact layout version
    pub format_version: Version,
    /// When the artifact was written
    pub saved_at: DateTime<Utc>,
    /// Normalizer the state was fitted with
    pub normalizer: NormalizerConfig,
    /// Engine state
    pub state: ModelState,
}

impl ModelArtifact {
    /// Wrap a state for saving now
    pub fn new(normalizer: NormalizerConfig, state: ModelState) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            saved_at: Utc::now(),
            normalizer,
            state,
        }
    }
}

/// Reads and writes model artifacts on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelStore;

impl ModelStore {
    /// Write an artifact, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(path: P, artifact: &ModelArtifact) -> SpamPredictorResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_vec_pretty(artifact)?;

        let parent = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| {
            SpamPredictorError::io(format!("Failed to create {}: {}", parent.display(), e))
        })?;

        let mut tmp_name = path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .ok_or_else(|| {
                SpamPredictorError::io(format!("Model path {} has no file name", path.display()))
            })?;
        tmp_name.push(".tmp");
        let tmp_path = parent.join(tmp_name);

        write_synced(&tmp_path, &json)
            .and_then(|()| fs::rename(&tmp_path, path))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp_path);
                SpamPredictorError::io(format!("Failed to write {}: {}", path.display(), e))
            })?;

        info!(
            path = %path.display(),
            engine = %artifact.state.kind(),
            bytes = json.len(),
            "Saved model artifact"
        );
        Ok(())
    }

    /// Read an artifact
    ///
    /// Every failure maps to `ModelUnavailable`, including a well-formed
    /// file whose state is internally inconsistent. Storage errors other than
    /// a missing or malformed file are marked transient.
    pub fn load<P: AsRef<Path>>(path: P) -> SpamPredictorResult<ModelArtifact> {
        let path = path.as_ref();
        debug!("Loading model artifact from: {}", path.display());

        let bytes = fs::read(path).map_err(|e| {
            let message = format!("Failed to read {}: {}", path.display(), e);
            match e.kind() {
                ErrorKind::NotFound | ErrorKind::InvalidData => {
                    SpamPredictorError::model_unavailable(message)
                }
                _ => SpamPredictorError::model_unavailable_transient(message),
            }
        })?;

        let artifact: ModelArtifact = serde_json::from_slice(&bytes).map_err(|e| {
            SpamPredictorError::model_unavailable(format!(
                "Corrupt model artifact {}: {}",
                path.display(),
                e
            ))
        })?;

        if artifact.format_version.major != FORMAT_VERSION.major {
            return Err(SpamPredictorError::model_unavailable(format!(
                "Model artifact {} has format version {}, expected {}.x",
                path.display(),
                artifact.format_version,
                FORMAT_VERSION.major
            )));
        }

        artifact.state.validate()?;

        info!(
            path = %path.display(),
            engine = %artifact.state.kind(),
            saved_at = %artifact.saved_at,
            "Loaded model artifact"
        );
        Ok(artifact)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
