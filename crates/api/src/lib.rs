// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Spam Classifier Server Implementation
//!
//! This crate provides the HTTP server for the spam classifier, built with Axum
//! around the [`spam_predictor`] engine, with hierarchical configuration,
//! middleware, metrics and graceful shutdown.
//!
//! # Module Structure
//!
//! - [`config`]: Server configuration and environment management with hierarchical loading
//! - [`error`]: Error types and HTTP response handling with proper status codes
//! - [`state`]: Shared application state holding the active predictor snapshot
//! - [`model`]: Model bootstrap at startup and retraining
//! - [`server`]: Main server implementation, lifecycle, and coordinated shutdown
//! - [`routes`]: Route configuration and HTTP request handlers
//! - [`extractors`]: JSON extraction with descriptive parse errors
//! - [`middleware`]: Per-client rate limiting
//! - [`metrics`]: Prometheus counters, histograms and gauges
//! - [`docs`]: `OpenAPI` document and Swagger UI page
//!
//! # Key Features
//!
//! - **Self-healing startup**: Loads the persisted model, retrying transient failures, and trains on the built-in corpus when none is usable
//! - **Lock-light serving**: Requests classify against an immutable predictor snapshot while retraining swaps in a replacement
//! - **Graceful Shutdown**: Coordinated termination using `CancellationToken` with timeouts
//! - **Rate Limiting**: IP-based request limiting with configurable requests per minute
//! - **Comprehensive Middleware**: Request ids, tracing, CORS and timeouts

pub mod config;
pub mod docs;
pub mod error;
pub mod extractors;
pub mod metrics;
pub mod middleware;
pub mod model;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{Server, ShutdownConfig};
pub use state::{HealthCheck, HealthStatus, ServerState};
