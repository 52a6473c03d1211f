use crate::dtos::{FetchImagesResponse, FetchSummary, PartNumbers};
use crate::startup::AppState;
use axum::{extract::State, Json};
use serde_json::Value;
use service_core::error::AppError;

/// Batch image fetch: validate the batch, fan out one fetch per part number,
/// and answer 200 with per-item results. Fetch failures stay inside the
/// response body; only invalid input turns into an error status.
pub async fn fetch_images(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<FetchImagesResponse>, AppError> {
    let parts = PartNumbers::parse(&body, state.config.upstream.max_part_numbers)?;

    let images = state.fetcher.fetch_batch(&parts).await;

    let successful = images.iter().filter(|r| r.success).count();
    let summary = FetchSummary {
        total: images.len(),
        successful,
        failed: images.len() - successful,
    };

    Ok(Json(FetchImagesResponse {
        success: true,
        images,
        summary,
    }))
}
