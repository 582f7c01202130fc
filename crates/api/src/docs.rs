// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` document for the HTTP surface and the pages that serve it

use std::sync::LazyLock;

use axum::{Json, response::Html};
use utoipa::OpenApi;

use crate::{
    config::Environment,
    routes::handlers::{
        ClassifyRequest, ClassifyResponse, ExamplesResponse, TrainRequest, TrainResponse,
    },
    state::{HealthCheck, HealthStatus},
};

/// Aggregated `OpenAPI` description of every documented route
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Spam Classifier API",
        description = "Classifies short text messages as spam or ham using a trained statistical model or a keyword rule engine."
    ),
    paths(
        crate::routes::handlers::health_handler,
        crate::routes::handlers::classify_handler,
        crate::routes::handlers::train_handler,
        crate::routes::handlers::examples_handler,
    ),
    components(schemas(
        HealthCheck,
        HealthStatus,
        Environment,
        ClassifyRequest,
        ClassifyResponse,
        TrainRequest,
        TrainResponse,
        ExamplesResponse,
        spam_predictor::SpamLabel,
        spam_predictor::TrainingExample,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "classification", description = "Spam classification and model training")
    )
)]
pub struct ApiDoc;

/// Route serving the generated document
pub const OPENAPI_PATH: &str = "/api-doc/openapi.json";

/// Route serving the interactive explorer
pub const EXPLORER_PATH: &str = "/swagger-ui";

const SWAGGER_DIST: &str = "https://unpkg.com/swagger-ui-dist@5.17.14";

static EXPLORER_PAGE: LazyLock<String> = LazyLock::new(|| {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Spam Classifier API</title>
  <link rel="stylesheet" href="{SWAGGER_DIST}/swagger-ui.css">
</head>
<body>
  <div id="explorer"></div>
  <script src="{SWAGGER_DIST}/swagger-ui-bundle.js"></script>
  <script>
    SwaggerUIBundle({{ url: "{OPENAPI_PATH}", dom_id: "#explorer", tryItOutEnabled: true }});
  </script>
</body>
</html>
"##
    )
});

/// Generated `OpenAPI` document as JSON
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Swagger UI page pointed at [`OPENAPI_PATH`]
pub async fn explorer_page() -> Html<&'static str> {
    Html(EXPLORER_PAGE.as_str())
}
