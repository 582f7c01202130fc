// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration and handlers for the spam
//! classifier server.

pub mod handlers;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use handlers::{classify_handler, examples_handler, health_handler, train_handler};

use crate::{
    docs::{EXPLORER_PATH, OPENAPI_PATH, explorer_page, openapi_json},
    metrics::metrics_handler,
    middleware::{RateLimiter, rate_limiting_middleware},
    state::ServerState,
};

/// Create application routes with conditional rate limiting
pub fn create_routes(rate_limiter: RateLimiter) -> Router<ServerState> {
    // Health and metrics stay reachable for monitoring
    let ops_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler));

    let docs_routes = Router::new()
        .route(OPENAPI_PATH, get(openapi_json))
        .route(EXPLORER_PATH, get(explorer_page));

    let mut api_routes = Router::new()
        .route("/classify", post(classify_handler))
        .route("/train", post(train_handler))
        .route("/examples", get(examples_handler));

    if rate_limiter.is_enabled() {
        api_routes = api_routes.layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limiting_middleware,
        ));
    }

    Router::new()
        .merge(ops_routes)
        .merge(docs_routes)
        .nest("/v1", api_routes)
}
