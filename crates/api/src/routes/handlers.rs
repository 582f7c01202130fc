// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! Health, classification, retraining and showcase endpoints.

use std::time::Instant;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use spam_predictor::{FeatureSet, SpamLabel, TrainingExample, demo_examples, sample_corpus};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::{
    error::ServerError,
    extractors::JsonExtractor,
    metrics, model,
    state::{HealthCheck, ServerState},
};

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns service status, whether a trained model is loaded, the active engine, version and environment.",
    responses(
        (status = 200, description = "Service is running", body = HealthCheck)
    )
)]
pub async fn health_handler(State(state): State<ServerState>) -> Json<HealthCheck> {
    Json(state.health_check().await)
}

/// Text classification request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassifyRequest {
    /// Text to classify
    #[schema(example = "FREE MONEY! Click here to claim your prize!")]
    pub text: Option<String>,
}

/// Text classification result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ClassifyResponse {
    /// Always true for a served classification
    pub success: bool,
    /// The classified text, with surrounding whitespace removed
    pub text: String,
    /// Predicted label
    pub prediction: SpamLabel,
    /// Confidence in the prediction, in [0, 1]
    pub confidence: f64,
    /// Probability of spam, in [0, 1]
    pub spam_probability: f64,
    /// Probability of ham, `1 - spam_probability`
    pub ham_probability: f64,
    /// Structural features of the text
    #[schema(value_type = Object)]
    pub features: FeatureSet,
}

/// Classify a text as spam or ham
///
/// # Errors
///
/// Returns `ServerError` when the text is missing or blank, or when no model
/// is ready.
#[utoipa::path(
    post,
    path = "/v1/classify",
    tag = "classification",
    summary = "Classify text",
    description = "Classifies a short text message as spam or ham and reports probabilities and structural features.",
    request_body = ClassifyRequest,
    responses(
        (status = 200, description = "Text classified", body = ClassifyResponse),
        (status = 400, description = "Missing or empty text, or malformed JSON", body = String),
        (status = 503, description = "No trained model available", body = String)
    )
)]
pub async fn classify_handler(
    State(state): State<ServerState>,
    JsonExtractor(request): JsonExtractor<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, ServerError> {
    let text = request
        .text
        .ok_or_else(|| ServerError::ValidationError("No text provided".to_string()))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ServerError::ValidationError(
            "Empty text provided".to_string(),
        ));
    }

    let predictor = state.predictor().await;
    let start = Instant::now();
    let result = predictor.predict(text)?;
    metrics::record_classification(
        predictor.kind(),
        result.prediction(),
        start.elapsed().as_secs_f64(),
    );

    debug!(prediction = %result.prediction(), "Served classification");

    Ok(Json(ClassifyResponse {
        success: true,
        prediction: result.prediction(),
        confidence: result.confidence(),
        spam_probability: result.spam_probability(),
        ham_probability: result.ham_probability(),
        features: *result.features(),
        text: text.to_string(),
    }))
}

/// Retraining request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct TrainRequest {
    /// Labeled examples; the built-in corpus is used when absent
    pub examples: Option<Vec<TrainingExample>>,
}

/// Retraining result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct TrainResponse {
    /// Whether the new model is serving
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Number of examples trained on
    pub samples: usize,
}

/// Retrain the model
///
/// # Errors
///
/// Returns `ServerError` when the corpus is degenerate or the new model
/// cannot be persisted.
#[utoipa::path(
    post,
    path = "/v1/train",
    tag = "classification",
    summary = "Retrain the model",
    description = "Retrains the active engine on the supplied examples, or on the built-in corpus when none are given, persists it and swaps it in.",
    request_body(content = TrainRequest, description = "Optional training examples; an empty body trains on the built-in corpus"),
    responses(
        (status = 200, description = "Model retrained", body = TrainResponse),
        (status = 400, description = "Fewer than two examples or a single label", body = String),
        (status = 500, description = "Model could not be saved", body = String)
    )
)]
pub async fn train_handler(
    State(state): State<ServerState>,
    request: Option<JsonExtractor<TrainRequest>>,
) -> Result<Json<TrainResponse>, ServerError> {
    let corpus = request
        .and_then(|JsonExtractor(request)| request.examples)
        .unwrap_or_else(sample_corpus);

    let samples = model::retrain(&state, corpus).await?;
    info!(samples, "Model retrained via API");

    Ok(Json(TrainResponse {
        success: true,
        message: "Model retrained successfully".to_string(),
        samples,
    }))
}

/// Showcase texts grouped by expected label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ExamplesResponse {
    /// Legitimate messages
    pub ham: Vec<String>,
    /// Spam messages
    pub spam: Vec<String>,
}

/// Example texts for trying out the classifier
#[utoipa::path(
    get,
    path = "/v1/examples",
    tag = "classification",
    summary = "Example texts",
    responses(
        (status = 200, description = "Showcase texts", body = ExamplesResponse)
    )
)]
pub async fn examples_handler() -> Json<ExamplesResponse> {
    let examples = demo_examples();
    Json(ExamplesResponse {
        ham: examples.ham.iter().map(ToString::to_string).collect(),
        spam: examples.spam.iter().map(ToString::to_string).collect(),
    })
}
