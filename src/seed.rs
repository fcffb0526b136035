//! Demo data seeding
//!
//! Seeds the fixture campaigns and leads through the repository API, so the
//! same data lands in whichever store backs the process.

use chrono::{Duration, Utc};

use crate::domain::{
    Campaign, ChatMessage, CreateLeadInput, DomainError, LeadStatus, MessageSender,
};
use crate::infrastructure::AppState;

pub async fn seed_demo_data(state: &AppState) -> Result<(), DomainError> {
    // Idempotency guard for durable stores
    if state.lead_repo.find_by_id("L001").await?.is_some() {
        tracing::debug!("demo data already present, skipping seed");
        return Ok(());
    }

    let campaigns = [
        ("C001", "Sari Sensation - Diwali Sale", "Active", 50000.0, 750000, 15000, 250000.0, 100),
        ("C002", "Kurti Karnival - Festive Deals", "Active", 75000.0, 1200000, 18000, 450000.0, 180),
        ("C003", "Jewellery Junction - Wedding Season", "Paused", 25000.0, 300000, 4500, 80000.0, 32),
        ("C004", "Lehenga Love - Clearance", "Active", 30000.0, 500000, 10000, 120000.0, 48),
    ];

    for (id, name, status, spend, impressions, clicks, purchase_value, actions) in campaigns {
        state
            .campaign_repo
            .insert(Campaign {
                id: id.to_string(),
                name: name.to_string(),
                status: status.to_string(),
                spend,
                impressions,
                clicks,
                purchase_value,
                actions,
            })
            .await?;
    }

    let hour_ago = Utc::now() - Duration::hours(1);
    let two_hours_ago = Utc::now() - Duration::hours(2);

    state
        .lead_repo
        .create(CreateLeadInput {
            id: Some("L001".to_string()),
            name: "Priya Sharma".to_string(),
            phone: "98XXXXXX01".to_string(),
            status: Some(LeadStatus::NewLead),
            chat_history: vec![ChatMessage {
                sender: MessageSender::Lead,
                text: "Is this available in red?".to_string(),
                timestamp: hour_ago,
            }],
            timestamp: Some(hour_ago),
            utm_source: "instagram".to_string(),
            adcreative_id: "AD001".to_string(),
        })
        .await?;

    state
        .lead_repo
        .create(CreateLeadInput {
            id: Some("L002".to_string()),
            name: "Anjali Verma".to_string(),
            phone: "98XXXXXX02".to_string(),
            status: Some(LeadStatus::Contacted),
            chat_history: vec![ChatMessage {
                sender: MessageSender::Lead,
                text: "What is the price?".to_string(),
                timestamp: two_hours_ago,
            }],
            timestamp: Some(two_hours_ago),
            utm_source: "facebook".to_string(),
            adcreative_id: "AD002".to_string(),
        })
        .await?;

    state
        .audit_repo
        .append(
            "System",
            "New WhatsApp Lead",
            "Lead \"Priya Sharma\" created.".to_string(),
        )
        .await?;
    state
        .audit_repo
        .append(
            "AI Autopilot",
            "Campaign Paused",
            "Campaign \"Jewellery Junction\" paused due to low ROAS (1.8).".to_string(),
        )
        .await?;

    Ok(())
}
