use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
};
use futures::Stream;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::domain::{CreateLeadInput, DomainError, LeadStatus};
use crate::infrastructure::AppState;
use crate::services::crm_service;
use crate::services::events::StoreEvent;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StatusUpdateRequest {
    pub status: LeadStatus,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct MessageRequest {
    pub message: String,
}

fn domain_error_response(err: DomainError) -> Response {
    match err {
        DomainError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Lead not found"})),
        )
            .into_response(),
        DomainError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": msg})),
        )
            .into_response(),
        // Retryable: the backing store is unreachable, not the request wrong
        DomainError::Persistence(msg) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"error": format!("Store unavailable: {}", msg)})),
        )
            .into_response(),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": other.to_string()})),
        )
            .into_response(),
    }
}

// Combined CRM snapshot, both collections newest-first
#[utoipa::path(
    get,
    path = "/api/crm/crm-data",
    responses(
        (status = 200, description = "Leads and audit log, newest first")
    )
)]
pub async fn get_crm_data(State(state): State<AppState>) -> impl IntoResponse {
    match crm_service::crm_snapshot(&state).await {
        Ok((leads, audit_logs)) => Json(serde_json::json!({
            "leads": leads,
            "auditLogs": audit_logs
        }))
        .into_response(),
        Err(e) => domain_error_response(e),
    }
}

// Register an inbound lead
#[utoipa::path(
    post,
    path = "/api/crm/leads",
    request_body = CreateLeadInput,
    responses(
        (status = 201, description = "Lead created"),
        (status = 400, description = "Duplicate lead id")
    )
)]
pub async fn create_lead(
    State(state): State<AppState>,
    Json(input): Json<CreateLeadInput>,
) -> impl IntoResponse {
    match crm_service::create_lead(&state, input).await {
        Ok(lead) => (
            StatusCode::CREATED,
            Json(serde_json::json!({"lead": lead})),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

// Get a single lead
#[utoipa::path(
    get,
    path = "/api/crm/leads/{id}",
    responses(
        (status = 200, description = "The lead"),
        (status = 404, description = "Lead not found")
    )
)]
pub async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.lead_repo.find_by_id(&id).await {
        Ok(Some(lead)) => Json(serde_json::json!({"lead": lead})).into_response(),
        Ok(None) => domain_error_response(DomainError::NotFound),
        Err(e) => domain_error_response(e),
    }
}

// Move a lead to a new funnel position
#[utoipa::path(
    post,
    path = "/api/crm/leads/{id}/status",
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Updated lead"),
        (status = 404, description = "Lead not found")
    )
)]
pub async fn update_lead_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> impl IntoResponse {
    match crm_service::change_status(&state, &id, payload.status).await {
        Ok(lead) => Json(serde_json::json!({"success": true, "lead": lead})).into_response(),
        Err(e) => domain_error_response(e),
    }
}

// Send an operator message to a lead
#[utoipa::path(
    post,
    path = "/api/crm/leads/{id}/message",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Updated lead"),
        (status = 404, description = "Lead not found")
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<MessageRequest>,
) -> impl IntoResponse {
    match crm_service::send_message(&state, &id, &payload.message).await {
        Ok(lead) => Json(serde_json::json!({"success": true, "lead": lead})).into_response(),
        Err(e) => domain_error_response(e),
    }
}

// Push path for the notification bus: one SSE event per store mutation,
// carrying the full refreshed collection
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let encoded = match &event {
                        StoreEvent::LeadsUpdate(leads) => {
                            Event::default().event(event.name()).json_data(leads)
                        }
                        StoreEvent::AuditLogsUpdate(entries) => {
                            Event::default().event(event.name()).json_data(entries)
                        }
                    };
                    match encoded {
                        Ok(sse_event) => return Some((Ok::<_, Infallible>(sse_event), rx)),
                        Err(e) => {
                            tracing::warn!("failed to encode store event: {}", e);
                            continue;
                        }
                    }
                }
                // A slow consumer skips missed events; the next one carries
                // full state anyway
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("SSE subscriber lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
