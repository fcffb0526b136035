use std::time::Duration;

use chrono::Utc;

use kaapav::config::{AiConfig, Config};
use kaapav::domain::{CreateLeadInput, DomainError, LeadStatus, MessageSender};
use kaapav::infrastructure::AppState;
use kaapav::services::crm_service;
use kaapav::services::events::StoreEvent;

fn test_config() -> Config {
    Config {
        database_url: None,
        port: 0,
        cors_allowed_origins: Vec::new(),
        fulfillment_webhook_url: None,
        reply_delay: Duration::from_millis(50),
        ai: AiConfig {
            provider: "noop".to_string(),
            api_key: None,
            base_url: "http://unused.invalid".to_string(),
            model: "gpt-4o-mini".to_string(),
            cache_ttl: Duration::from_secs(60),
        },
    }
}

fn test_state() -> AppState {
    AppState::in_memory(&test_config())
}

fn lead_input(name: &str) -> CreateLeadInput {
    CreateLeadInput {
        name: name.to_string(),
        phone: "98XXXXXX01".to_string(),
        utm_source: "instagram".to_string(),
        adcreative_id: "AD001".to_string(),
        ..Default::default()
    }
}

fn audit_sequence(id: &str) -> u64 {
    id.trim_start_matches('A').parse().expect("A-prefixed sequence id")
}

#[tokio::test]
async fn change_status_sets_status_and_preserves_chat_history() {
    let state = test_state();
    let lead = crm_service::create_lead(&state, lead_input("Priya Sharma"))
        .await
        .unwrap();
    crm_service::send_message(&state, &lead.id, "Hello!")
        .await
        .unwrap();
    let history_before = state
        .lead_repo
        .find_by_id(&lead.id)
        .await
        .unwrap()
        .unwrap()
        .chat_history;

    let updated = crm_service::change_status(&state, &lead.id, LeadStatus::Interested)
        .await
        .unwrap();

    assert_eq!(updated.status, LeadStatus::Interested);
    assert_eq!(updated.chat_history.len(), history_before.len());
}

#[tokio::test]
async fn change_status_on_unknown_lead_fails_without_audit_entry() {
    let state = test_state();
    let audit_before = state.audit_repo.find_all().await.unwrap().len();

    let result = crm_service::change_status(&state, "L999", LeadStatus::Paid).await;

    assert!(matches!(result, Err(DomainError::NotFound)));
    assert_eq!(state.audit_repo.find_all().await.unwrap().len(), audit_before);
}

#[tokio::test]
async fn paid_appends_status_and_fulfillment_entries_in_order() {
    let state = test_state();
    let lead = crm_service::create_lead(&state, lead_input("Anjali Verma"))
        .await
        .unwrap();
    let before = Utc::now();

    crm_service::change_status(&state, &lead.id, LeadStatus::Paid)
        .await
        .unwrap();

    let entries = state.audit_repo.find_all().await.unwrap();
    let status_entry = entries
        .iter()
        .find(|e| e.action == "Lead Status Changed")
        .expect("status-change entry");
    let fulfillment_entry = entries
        .iter()
        .find(|e| e.action == "Fulfillment Triggered")
        .expect("fulfillment entry");

    // Sequence ids capture insertion order: status change first
    assert!(audit_sequence(&status_entry.id) < audit_sequence(&fulfillment_entry.id));
    assert!(status_entry.timestamp >= before);
    assert!(fulfillment_entry.timestamp >= before);
    assert_eq!(status_entry.actor, "User");
    assert_eq!(fulfillment_entry.actor, "System");
    assert!(status_entry.details.contains("Anjali Verma"));
}

#[tokio::test]
async fn re_entering_paid_re_fires_the_trigger() {
    let state = test_state();
    let lead = crm_service::create_lead(&state, lead_input("Priya Sharma"))
        .await
        .unwrap();

    crm_service::change_status(&state, &lead.id, LeadStatus::Paid)
        .await
        .unwrap();
    crm_service::change_status(&state, &lead.id, LeadStatus::Interested)
        .await
        .unwrap();
    crm_service::change_status(&state, &lead.id, LeadStatus::Paid)
        .await
        .unwrap();

    let fulfillments = state
        .audit_repo
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.action == "Fulfillment Triggered")
        .count();
    assert_eq!(fulfillments, 2);
}

#[tokio::test]
async fn send_message_appends_synchronously_then_automated_reply() {
    let state = test_state();
    let lead = crm_service::create_lead(&state, lead_input("Priya Sharma"))
        .await
        .unwrap();

    let updated = crm_service::send_message(&state, &lead.id, "Is the red sari in stock?")
        .await
        .unwrap();

    // Exactly one synchronous append; the reply has not landed yet
    assert_eq!(updated.chat_history.len(), 1);
    assert!(matches!(
        updated.chat_history[0].sender,
        MessageSender::User
    ));

    tokio::time::sleep(Duration::from_millis(200)).await;

    let settled = state
        .lead_repo
        .find_by_id(&lead.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settled.chat_history.len(), 2);
    let reply = &settled.chat_history[1];
    assert!(matches!(reply.sender, MessageSender::Lead));
    assert_eq!(reply.text, crm_service::AUTOMATED_REPLY);
    assert!(settled.timestamp >= reply.timestamp);

    let entries = state.audit_repo.find_all().await.unwrap();
    assert!(entries.iter().any(|e| e.action == "Message Sent"));
}

#[tokio::test]
async fn audit_listing_is_descending_by_timestamp() {
    let state = test_state();

    for action in ["first", "second", "third"] {
        state
            .audit_repo
            .append("System", action, "details".to_string())
            .await
            .unwrap();
        // Spread timestamps so the ordering assertion is strict
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let entries = state.audit_repo.find_all().await.unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    assert_eq!(entries[0].action, "third");
}

#[tokio::test]
async fn create_lead_audits_a_system_entry() {
    let state = test_state();

    crm_service::create_lead(&state, lead_input("Priya Sharma"))
        .await
        .unwrap();

    let entries = state.audit_repo.find_all().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].actor, "System");
    assert_eq!(entries[0].action, "New WhatsApp Lead");
    assert!(entries[0].details.contains("Priya Sharma"));
}

#[tokio::test]
async fn bus_delivers_both_update_events_per_mutation() {
    let state = test_state();
    let lead = crm_service::create_lead(&state, lead_input("Anjali Verma"))
        .await
        .unwrap();

    let mut rx = state.events.subscribe();
    crm_service::change_status(&state, &lead.id, LeadStatus::Contacted)
        .await
        .unwrap();

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();

    match (first, second) {
        (StoreEvent::LeadsUpdate(leads), StoreEvent::AuditLogsUpdate(entries)) => {
            // Full collections, not deltas
            assert_eq!(leads.len(), 1);
            assert_eq!(leads[0].status, LeadStatus::Contacted);
            assert!(!entries.is_empty());
        }
        other => panic!("unexpected event order: {:?}", other),
    }
}

#[tokio::test]
async fn concurrent_status_changes_do_not_cross_write() {
    let state = test_state();
    let mut first = lead_input("Priya Sharma");
    first.id = Some("L001".to_string());
    let mut second = lead_input("Anjali Verma");
    second.id = Some("L002".to_string());
    second.phone = "98XXXXXX02".to_string();
    crm_service::create_lead(&state, first).await.unwrap();
    crm_service::create_lead(&state, second).await.unwrap();

    let state_a = state.clone();
    let state_b = state.clone();
    let (a, b) = tokio::join!(
        tokio::spawn(async move {
            for _ in 0..25 {
                crm_service::change_status(&state_a, "L001", LeadStatus::Interested)
                    .await
                    .unwrap();
            }
            crm_service::change_status(&state_a, "L001", LeadStatus::Paid)
                .await
                .unwrap();
        }),
        tokio::spawn(async move {
            for _ in 0..25 {
                crm_service::change_status(&state_b, "L002", LeadStatus::Contacted)
                    .await
                    .unwrap();
            }
            crm_service::change_status(&state_b, "L002", LeadStatus::Shipped)
                .await
                .unwrap();
        })
    );
    a.unwrap();
    b.unwrap();

    let lead_a = state.lead_repo.find_by_id("L001").await.unwrap().unwrap();
    let lead_b = state.lead_repo.find_by_id("L002").await.unwrap().unwrap();

    assert_eq!(lead_a.name, "Priya Sharma");
    assert_eq!(lead_a.phone, "98XXXXXX01");
    assert_eq!(lead_a.status, LeadStatus::Paid);
    assert_eq!(lead_b.name, "Anjali Verma");
    assert_eq!(lead_b.phone, "98XXXXXX02");
    assert_eq!(lead_b.status, LeadStatus::Shipped);
}
