use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

const SUPPORTED_IMAGE_FORMATS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "message": "Server is running",
        "service": "image-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn capabilities(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "maxPartNumbers": state.config.upstream.max_part_numbers,
        "supportedImageFormats": SUPPORTED_IMAGE_FORMATS,
        "maxImageSize": "10MB",
        "timeout": format!("{} seconds", state.config.upstream.timeout_secs),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "availableEndpoints": [
                "GET /health - Health check",
                "GET /capabilities - Server capabilities",
                "POST /fetch-images - Fetch images by part numbers"
            ]
        })),
    )
}
