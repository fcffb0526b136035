pub mod ai;
pub mod crm;
pub mod health;
pub mod insights;

use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // CRM
        .route("/crm/crm-data", get(crm::get_crm_data))
        .route("/crm/leads", post(crm::create_lead))
        .route("/crm/leads/:id", get(crm::get_lead))
        .route("/crm/leads/:id/status", post(crm::update_lead_status))
        .route("/crm/leads/:id/message", post(crm::send_message))
        .route("/crm/events", get(crm::events))
        // Insights
        .route("/insights/campaign", get(insights::campaign_insights))
        // AI
        .route("/ai/generate", post(ai::generate))
        .with_state(state)
}
