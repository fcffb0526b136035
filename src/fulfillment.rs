//! Outbound fulfillment trigger
//!
//! Fired when a lead reaches `Paid`: posts the lead summary to the n8n
//! webhook that kicks off Shiprocket order processing. Callers treat this
//! as fire-and-forget; failures are logged upstream, never retried.

use std::time::Duration;

use crate::domain::{DomainError, Lead};

pub async fn trigger(
    client: &reqwest::Client,
    webhook_url: &str,
    lead: &Lead,
) -> Result<(), DomainError> {
    let payload = serde_json::json!({
        "lead_id": lead.id,
        "name": lead.name,
        "phone": lead.phone,
        "status": lead.status,
    });

    let resp = client
        .post(webhook_url)
        .timeout(Duration::from_secs(5))
        .json(&payload)
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(DomainError::Upstream(format!(
            "fulfillment webhook returned status {}",
            resp.status()
        )));
    }

    Ok(())
}
