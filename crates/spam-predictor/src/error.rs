// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for spam classification operations
//!
//! This module provides error handling for every engine operation: input
//! validation, training, prediction, configuration and model persistence.

use thiserror::Error;

/// Result type alias for spam classification operations
pub type SpamPredictorResult<T> = Result<T, SpamPredictorError>;

/// Error types for spam classification operations
#[derive(Debug, Error)]
pub enum SpamPredictorError {
    /// Empty or otherwise unusable input text
    #[error("Bad input: {message}")]
    BadInput { message: String },

    /// Prediction requested before a model was trained or loaded
    #[error("Model not trained: {message}")]
    NotTrained { message: String },

    /// Corpus too small or too uniform to fit a model
    #[error("Insufficient training data: {message}")]
    InsufficientTrainingData { message: String },

    /// Persisted model missing, unreadable or incompatible
    #[error("Model unavailable: {message}")]
    ModelUnavailable {
        message: String,
        /// Whether the failure came from storage and may succeed on retry
        transient: bool,
    },

    /// Configuration file not found or invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Validation error
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// I/O error (file operations)
    #[error("I/O error: {message}")]
    Io { message: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {message}")]
    Json { message: String },

    /// YAML parsing error
    #[error("YAML error: {message}")]
    Yaml { message: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SpamPredictorError {
    /// Create a bad input error
    pub fn bad_input<T: ToString>(message: T) -> Self {
        Self::BadInput {
            message: message.to_string(),
        }
    }

    /// Create a not trained error
    pub fn not_trained<T: ToString>(message: T) -> Self {
        Self::NotTrained {
            message: message.to_string(),
        }
    }

    /// Create an insufficient training data error
    pub fn insufficient_data<T: ToString>(message: T) -> Self {
        Self::InsufficientTrainingData {
            message: message.to_string(),
        }
    }

    /// Create a permanent model unavailable error
    pub fn model_unavailable<T: ToString>(message: T) -> Self {
        Self::ModelUnavailable {
            message: message.to_string(),
            transient: false,
        }
    }

    /// Create a model unavailable error caused by a storage failure that may clear up
    pub fn model_unavailable_transient<T: ToString>(message: T) -> Self {
        Self::ModelUnavailable {
            message: message.to_string(),
            transient: true,
        }
    }

    /// Create a configuration error
    pub fn config<T: ToString>(message: T) -> Self {
        Self::Configuration {
            message: message.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation<T: ToString>(message: T) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    /// Create an I/O error
    pub fn io<T: ToString>(message: T) -> Self {
        Self::Io {
            message: message.to_string(),
        }
    }

    /// Create a JSON error
    pub fn json<T: ToString>(message: T) -> Self {
        Self::Json {
            message: message.to_string(),
        }
    }

    /// Create a YAML error
    pub fn yaml<T: ToString>(message: T) -> Self {
        Self::Yaml {
            message: message.to_string(),
        }
    }

    /// Create an internal error
    pub fn internal<T: ToString>(message: T) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Check if this error indicates a temporary failure that could be retried
    ///
    /// Every engine computation is a deterministic function of its input, so
    /// only storage failures while loading a model qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SpamPredictorError::ModelUnavailable {
                transient: true,
                ..
            }
        )
    }

    /// Check if this error indicates a permanent failure that should not be retried
    pub fn is_permanent_failure(&self) -> bool {
        !self.is_retryable()
    }

    /// Check if this error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SpamPredictorError::BadInput { .. }
                | SpamPredictorError::InsufficientTrainingData { .. }
                | SpamPredictorError::Validation { .. }
        )
    }

    /// Check if this error means no usable model is in place
    pub fn is_model_missing(&self) -> bool {
        matches!(
            self,
            SpamPredictorError::NotTrained { .. } | SpamPredictorError::ModelUnavailable { .. }
        )
    }

    /// Check if this error indicates a configuration problem
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SpamPredictorError::Configuration { .. }
                | SpamPredictorError::Validation { .. }
                | SpamPredictorError::Yaml { .. }
        )
    }
}

/// Convert from JSON errors
impl From<serde_json::Error> for SpamPredictorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}

/// Convert from YAML errors
impl From<serde_yaml::Error> for SpamPredictorError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml {
            message: err.to_string(),
        }
    }
}

/// Convert from I/O errors
impl From<std::io::Error> for SpamPredictorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}
