// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics module
//!
//! Provides global metrics using the default Prometheus registry via macros and
//! an Axum-compatible metrics handler.

use std::sync::LazyLock;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, IntGauge, TextEncoder, register_histogram_vec,
    register_int_counter_vec, register_int_gauge,
};
use spam_predictor::{EngineKind, SpamLabel};
use tracing::error;

/// Classifications served, labeled by predicted label.
pub static CLASSIFICATIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "spam_classifier_classifications_total",
        "Total number of classifications, labeled by prediction",
        &["prediction"]
    )
    .expect("Failed to create spam_classifier_classifications_total counter vec")
});

/// Histogram of prediction durations in seconds.
pub static PREDICTION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "spam_classifier_prediction_duration_seconds",
        "Prediction durations in seconds",
        &["engine"],
        vec![0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0]
    )
    .expect("Failed to create prediction duration histogram")
});

/// Training runs, labeled by outcome.
pub static TRAININGS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "spam_classifier_trainings_total",
        "Total number of training runs, labeled by outcome",
        &["outcome"]
    )
    .expect("Failed to create spam_classifier_trainings_total counter vec")
});

/// 1 while a trained model is serving.
pub static MODEL_LOADED: LazyLock<IntGauge> = LazyLock::new(|| {
    register_int_gauge!(
        "spam_classifier_model_loaded",
        "Whether a trained model is loaded (1) or not (0)"
    )
    .expect("Failed to create model loaded gauge")
});

/// Count a classification and observe how long it took
///
/// # Arguments
/// * `engine` - Engine that produced the prediction
/// * `prediction` - Predicted label
/// * `duration_secs` - Prediction time in seconds
pub fn record_classification(engine: EngineKind, prediction: SpamLabel, duration_secs: f64) {
    CLASSIFICATIONS
        .with_label_values(&[prediction.as_str()])
        .inc();
    PREDICTION_DURATION
        .with_label_values(&[engine.as_str()])
        .observe(duration_secs);
}

/// Count a training run
pub fn record_training(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    TRAININGS.with_label_values(&[outcome]).inc();
}

/// Update the model-loaded gauge
pub fn set_model_loaded(loaded: bool) {
    MODEL_LOADED.set(i64::from(loaded));
}

/// Axum handler that exports metrics in Prometheus text format
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        error!(error = %e, "failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    match String::from_utf8(buffer) {
        Ok(body) => ([(header::CONTENT_TYPE, encoder.format_type())], body).into_response(),
        Err(e) => {
            error!(error = %e, "metrics buffer is not UTF-8");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
