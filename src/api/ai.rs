use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use crate::infrastructure::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GenerateRequest {
    pub prompt: String,
}

// Generate ad copy. Provider failures degrade to a deterministic fallback,
// so this never surfaces an upstream error.
#[utoipa::path(
    post,
    path = "/api/ai/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated or cached ad copy"),
        (status = 400, description = "Empty prompt")
    )
)]
pub async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> impl IntoResponse {
    if payload.prompt.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "prompt required"})),
        )
            .into_response();
    }

    let text = state.ad_copy.generate(&payload.prompt).await;
    Json(serde_json::json!({"text": text})).into_response()
}
