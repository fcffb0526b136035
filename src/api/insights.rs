use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::domain::CampaignWithMetrics;
use crate::infrastructure::AppState;

// Campaign counters with derived CTR/ROAS/CPA
#[utoipa::path(
    get,
    path = "/api/insights/campaign",
    responses(
        (status = 200, description = "Campaigns with derived metrics", body = [CampaignWithMetrics])
    )
)]
pub async fn campaign_insights(State(state): State<AppState>) -> impl IntoResponse {
    match state.campaign_repo.find_all().await {
        Ok(campaigns) => {
            let enriched: Vec<CampaignWithMetrics> =
                campaigns.into_iter().map(CampaignWithMetrics::from).collect();
            Json(enriched).into_response()
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"error": format!("Store unavailable: {}", e)})),
        )
            .into_response(),
    }
}
