// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! This module provides shared application state for the spam classifier
//! server: configuration, the active predictor and coordinated cancellation.
//!
//! The predictor is held as an immutable snapshot behind a read/write lock.
//! Requests clone the current snapshot under the read lock; retraining
//! builds a complete replacement and swaps it in under the write lock, so a
//! reader never observes a partially replaced model.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use spam_predictor::{EngineKind, SpamPredictor};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::{
    config::{Environment, ServerConfig},
    metrics,
};

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Current predictor snapshot
    predictor: Arc<RwLock<Arc<SpamPredictor>>>,
    /// Serializes retraining so saves never interleave
    training: Arc<Mutex<()>>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `predictor` - Initial predictor
    /// * `cancellation_token` - Token for coordinated cancellation
    pub fn new(
        config: ServerConfig,
        predictor: SpamPredictor,
        cancellation_token: CancellationToken,
    ) -> Self {
        metrics::set_model_loaded(predictor.is_ready());
        Self {
            config,
            predictor: Arc::new(RwLock::new(Arc::new(predictor))),
            training: Arc::new(Mutex::new(())),
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Snapshot of the active predictor
    pub async fn predictor(&self) -> Arc<SpamPredictor> {
        Arc::clone(&*self.predictor.read().await)
    }

    /// Swap in a new predictor
    pub async fn replace_predictor(&self, predictor: SpamPredictor) {
        metrics::set_model_loaded(predictor.is_ready());
        *self.predictor.write().await = Arc::new(predictor);
    }

    /// Exclusive right to retrain; held for the whole train-save-swap sequence
    pub async fn training_guard(&self) -> MutexGuard<'_, ()> {
        self.training.lock().await
    }

    /// Report service and model status
    pub async fn health_check(&self) -> HealthCheck {
        let predictor = self.predictor().await;
        let model_loaded = predictor.is_ready();

        let status = if model_loaded {
            HealthStatus::Up
        } else {
            HealthStatus::Degraded {
                reason: Box::from("no trained model loaded"),
            }
        };

        HealthCheck {
            status,
            model_loaded,
            engine: predictor.kind(),
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Health status of the service
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum HealthStatus {
    /// Service is fully operational and responding normally
    Up,

    /// Service is running but cannot classify yet
    Degraded {
        /// Human-readable explanation of the degradation condition
        reason: Box<str>,
    },
}

/// Health check status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Whether a trained model is ready to classify
    pub model_loaded: bool,
    /// Active engine
    #[schema(value_type = String, example = "statistical")]
    pub engine: EngineKind,
    /// Service version
    #[schema(value_type = String)]
    pub version: Box<str>,
    /// Environment
    pub environment: Environment,
    /// Timestamp
    pub timestamp: String,
}
