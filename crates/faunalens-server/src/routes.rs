//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use faunalens_core::{ClassificationResult, Error};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::service::{self, AppState};

/// Message returned when the request has no image
pub const MISSING_IMAGE_MESSAGE: &str = "No image provided";

/// Message returned for every downstream failure
pub const CLASSIFY_FAILED_MESSAGE: &str = "Failed to classify the image";

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/classify", post(classify))
        .fallback(fallback)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Successful classification response
#[derive(Debug, Serialize)]
struct ClassifyResponse {
    result: ClassificationResult,
}

/// Main classification handler
async fn classify(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    metrics::counter!("faunalens_requests_total").increment(1);

    let image = extract_image(&body)?;
    info!("Received classification request ({} chars)", image.len());

    let result = service::classify(&state, &image).await?;

    Ok(Json(ClassifyResponse { result }).into_response())
}

/// Pull a non-empty `image` string out of the request body.
///
/// An empty or non-JSON body, a body that is not an object, a missing or null
/// field and an empty string all count as no image. A present value of any
/// other type is an image that cannot be decoded.
fn extract_image(body: &[u8]) -> Result<String, Error> {
    let value: Value = serde_json::from_slice(body).map_err(|_| Error::MissingInput)?;
    match value.get("image") {
        None | Some(Value::Null) => Err(Error::MissingInput),
        Some(Value::String(image)) if image.is_empty() => Err(Error::MissingInput),
        Some(Value::String(image)) => Ok(image.clone()),
        Some(other) => Err(Error::invalid_image(format!(
            "image field is {}, expected a string",
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

async fn fallback() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Error handling
#[derive(Debug)]
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = self.0;
        metrics::counter!("faunalens_errors_total", "kind" => err.kind()).increment(1);

        let (status, message) = if err.is_client_error() {
            warn!("Rejected request: {}", err);
            (StatusCode::BAD_REQUEST, MISSING_IMAGE_MESSAGE)
        } else {
            error!("Classification error [{}]: {}", err.kind(), err);
            (StatusCode::INTERNAL_SERVER_ERROR, CLASSIFY_FAILED_MESSAGE)
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
