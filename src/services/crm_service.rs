//! CRM Service - Lead lifecycle business logic
//!
//! The sole mutator of the lead and audit stores. Every mutation appends
//! its audit entry and fans the refreshed collections out on the bus.

use crate::domain::{
    AuditLogEntry, CreateLeadInput, DomainError, Lead, LeadStatus, MessageSender,
};
use crate::fulfillment;
use crate::infrastructure::AppState;
use crate::services::events::StoreEvent;

pub const AUTOMATED_REPLY: &str = "Thank you for your message!";

/// Leads and audit entries, both newest-first
pub async fn crm_snapshot(
    state: &AppState,
) -> Result<(Vec<Lead>, Vec<AuditLogEntry>), DomainError> {
    let leads = state.lead_repo.find_all().await?;
    let audit_logs = state.audit_repo.find_all().await?;
    Ok((leads, audit_logs))
}

/// Register an inbound lead and audit its arrival
pub async fn create_lead(state: &AppState, input: CreateLeadInput) -> Result<Lead, DomainError> {
    let lead = state.lead_repo.create(input).await?;

    state
        .audit_repo
        .append(
            "System",
            "New WhatsApp Lead",
            format!("Lead \"{}\" created.", lead.name),
        )
        .await?;

    publish_updates(state).await;
    Ok(lead)
}

/// Move a lead to a new funnel position.
///
/// `Paid` additionally records the fulfillment trigger and fires the
/// webhook in the background; re-entering `Paid` re-fires it.
pub async fn change_status(
    state: &AppState,
    id: &str,
    status: LeadStatus,
) -> Result<Lead, DomainError> {
    let lead = state.lead_repo.update_status(id, status).await?;

    state
        .audit_repo
        .append(
            "User",
            "Lead Status Changed",
            format!("Status of \"{}\" changed to \"{}\"", lead.name, status),
        )
        .await?;

    if status == LeadStatus::Paid {
        // Both audit entries land synchronously, in this order; only the
        // HTTP call itself runs in the background.
        state
            .audit_repo
            .append(
                "System",
                "Fulfillment Triggered",
                format!(
                    "n8n webhook fired for \"{}\" for Shiprocket automation.",
                    lead.name
                ),
            )
            .await?;
        spawn_fulfillment(state.clone(), lead.clone());
    }

    publish_updates(state).await;
    Ok(lead)
}

/// Record an operator message and schedule the automated reply
pub async fn send_message(state: &AppState, id: &str, text: &str) -> Result<Lead, DomainError> {
    let lead = state
        .lead_repo
        .append_message(id, MessageSender::User, text)
        .await?;

    state
        .audit_repo
        .append(
            "User",
            "Message Sent",
            format!("Sent message to \"{}\"", lead.name),
        )
        .await?;

    publish_updates(state).await;
    schedule_automated_reply(state.clone(), lead.id.clone());

    Ok(lead)
}

fn spawn_fulfillment(state: AppState, lead: Lead) {
    tokio::spawn(async move {
        let Some(url) = state.fulfillment_webhook_url.as_deref() else {
            tracing::info!(
                "fulfillment webhook not configured, skipping call for lead {}",
                lead.id
            );
            return;
        };

        match fulfillment::trigger(&state.http, url, &lead).await {
            Ok(()) => tracing::info!("fulfillment webhook fired for lead {}", lead.id),
            // The status change is already committed; this log line is what
            // operators reconcile against.
            Err(e) => tracing::error!(
                "status change for lead {} succeeded but fulfillment webhook failed: {}",
                lead.id,
                e
            ),
        }
    });
}

fn schedule_automated_reply(state: AppState, lead_id: String) {
    tokio::spawn(async move {
        tokio::time::sleep(state.reply_delay).await;

        match state
            .lead_repo
            .append_message(&lead_id, MessageSender::Lead, AUTOMATED_REPLY)
            .await
        {
            Ok(_) => publish_updates(&state).await,
            Err(e) => tracing::warn!("automated reply dropped for lead {}: {}", lead_id, e),
        }
    });
}

/// Fan the full current collections out to subscribers. Best-effort: a
/// snapshot read failing here must not fail the already-committed mutation.
async fn publish_updates(state: &AppState) {
    match state.lead_repo.find_all().await {
        Ok(leads) => state.events.publish(StoreEvent::LeadsUpdate(leads)),
        Err(e) => tracing::warn!("skipping leads-update publish: {}", e),
    }
    match state.audit_repo.find_all().await {
        Ok(entries) => state.events.publish(StoreEvent::AuditLogsUpdate(entries)),
        Err(e) => tracing::warn!("skipping audit-logs-update publish: {}", e),
    }
}
