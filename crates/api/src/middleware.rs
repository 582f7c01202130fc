// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Middleware module for HTTP request processing
//!
//! Per-client rate limiting for the classification endpoints.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::RateLimitingConfig;

const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);
const MAX_RATE_LIMIT_ENTRIES: usize = 10_000;

/// Fixed-window request counter keyed by client address
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitingConfig,
    clients: Arc<DashMap<IpAddr, Window>>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started: Instant,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration
    pub fn new(config: RateLimitingConfig) -> Self {
        Self {
            config,
            clients: Arc::new(DashMap::new()),
        }
    }

    /// Check if rate limiting is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Count a request from `ip`; true when it exceeds the per-minute budget
    pub fn is_rate_limited(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        if !self.config.enabled {
            return false;
        }

        if self.clients.len() > MAX_RATE_LIMIT_ENTRIES {
            self.evict_expired(now);
        }

        let count = self
            .clients
            .entry(ip)
            .and_modify(|window| {
                if now.duration_since(window.started) > RATE_LIMIT_WINDOW {
                    window.count = 1;
                    window.started = now;
                } else {
                    window.count = window.count.saturating_add(1);
                }
            })
            .or_insert(Window {
                count: 1,
                started: now,
            })
            .count;

        if count > self.config.requests_per_minute {
            debug!(%ip, count, "client over rate limit");
            true
        } else {
            false
        }
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    fn evict_expired(&self, now: Instant) {
        let before = self.clients.len();
        self.clients
            .retain(|_, window| now.duration_since(window.started) <= RATE_LIMIT_WINDOW);
        let remaining = self.clients.len();

        debug!(evicted = before.saturating_sub(remaining), "rate limiter cleanup");

        if remaining > MAX_RATE_LIMIT_ENTRIES {
            warn!(remaining, "rate limiter still over capacity, dropping oldest windows");

            let mut oldest: Vec<_> = self
                .clients
                .iter()
                .map(|entry| (*entry.key(), entry.value().started))
                .collect();
            oldest.sort_by_key(|(_, started)| *started);

            for (ip, _) in oldest
                .into_iter()
                .take(remaining - MAX_RATE_LIMIT_ENTRIES / 2)
            {
                self.clients.remove(&ip);
            }
        }
    }
}

/// Reject requests from clients over their budget with 429
pub async fn rate_limiting_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(limiter): State<RateLimiter>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let ip = addr.ip();

    if limiter.is_rate_limited(ip) {
        warn!(%ip, path = %req.uri().path(), "rate limit exceeded");
        let body = Json(json!({
            "error": "Rate limit exceeded",
            "status": StatusCode::TOO_MANY_REQUESTS.as_u16(),
        }));
        let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
        response.headers_mut().insert(
            header::RETRY_AFTER,
            HeaderValue::from(RATE_LIMIT_WINDOW.as_secs()),
        );
        return response;
    }

    next.run(req).await
}
