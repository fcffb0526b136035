//! In-memory store implementations
//!
//! The default backend, mirroring a deployment where CRM state lives in
//! process memory. One mutex per store, never held across an await; audit
//! ids come from an atomic counter so concurrent appends cannot collide.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    AuditLogEntry, AuditLogRepository, Campaign, CampaignRepository, ChatMessage, CreateLeadInput,
    DomainError, Lead, LeadRepository, LeadStatus, MessageSender,
};

fn lock<T>(mutex: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>, DomainError> {
    mutex
        .lock()
        .map_err(|_| DomainError::Internal("store mutex poisoned".to_string()))
}

/// Mutex-guarded lead store
#[derive(Default)]
pub struct MemoryLeadRepository {
    leads: Mutex<Vec<Lead>>,
}

impl MemoryLeadRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadRepository for MemoryLeadRepository {
    async fn find_all(&self) -> Result<Vec<Lead>, DomainError> {
        let mut leads = lock(&self.leads)?.clone();
        leads.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(leads)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Lead>, DomainError> {
        Ok(lock(&self.leads)?.iter().find(|l| l.id == id).cloned())
    }

    async fn create(&self, input: CreateLeadInput) -> Result<Lead, DomainError> {
        let lead = Lead {
            id: input
                .id
                .unwrap_or_else(|| format!("L-{}", Uuid::new_v4().simple())),
            name: input.name,
            phone: input.phone,
            status: input.status.unwrap_or(LeadStatus::NewLead),
            chat_history: input.chat_history,
            timestamp: input.timestamp.unwrap_or_else(Utc::now),
            utm_source: input.utm_source,
            adcreative_id: input.adcreative_id,
        };

        let mut leads = lock(&self.leads)?;
        if leads.iter().any(|l| l.id == lead.id) {
            return Err(DomainError::Validation(format!(
                "lead {} already exists",
                lead.id
            )));
        }
        leads.push(lead.clone());

        Ok(lead)
    }

    async fn update_status(&self, id: &str, status: LeadStatus) -> Result<Lead, DomainError> {
        let mut leads = lock(&self.leads)?;
        let lead = leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(DomainError::NotFound)?;

        lead.status = status;
        lead.timestamp = Utc::now();

        Ok(lead.clone())
    }

    async fn append_message(
        &self,
        id: &str,
        sender: MessageSender,
        text: &str,
    ) -> Result<Lead, DomainError> {
        let mut leads = lock(&self.leads)?;
        let lead = leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(DomainError::NotFound)?;

        let now = Utc::now();
        lead.chat_history.push(ChatMessage {
            sender,
            text: text.to_string(),
            timestamp: now,
        });
        lead.timestamp = now;

        Ok(lead.clone())
    }
}

/// Mutex-guarded append-only audit log
#[derive(Default)]
pub struct MemoryAuditLogRepository {
    entries: Mutex<Vec<AuditLogEntry>>,
    sequence: AtomicU64,
}

impl MemoryAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLogRepository for MemoryAuditLogRepository {
    async fn append(
        &self,
        actor: &str,
        action: &str,
        details: String,
    ) -> Result<AuditLogEntry, DomainError> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let entry = AuditLogEntry {
            id: format!("A{:03}", seq),
            timestamp: Utc::now(),
            actor: actor.to_string(),
            action: action.to_string(),
            details,
        };

        lock(&self.entries)?.push(entry.clone());

        Ok(entry)
    }

    async fn find_all(&self) -> Result<Vec<AuditLogEntry>, DomainError> {
        let mut entries = lock(&self.entries)?.clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }
}

/// Mutex-guarded campaign snapshot store
#[derive(Default)]
pub struct MemoryCampaignRepository {
    campaigns: Mutex<Vec<Campaign>>,
}

impl MemoryCampaignRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CampaignRepository for MemoryCampaignRepository {
    async fn find_all(&self) -> Result<Vec<Campaign>, DomainError> {
        Ok(lock(&self.campaigns)?.clone())
    }

    async fn insert(&self, campaign: Campaign) -> Result<(), DomainError> {
        let mut campaigns = lock(&self.campaigns)?;
        campaigns.retain(|c| c.id != campaign.id);
        campaigns.push(campaign);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_input(name: &str) -> CreateLeadInput {
        CreateLeadInput {
            name: name.to_string(),
            phone: "98XXXXXX01".to_string(),
            utm_source: "instagram".to_string(),
            adcreative_id: "AD001".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_defaults() {
        let repo = MemoryLeadRepository::new();
        let lead = repo.create(lead_input("Priya Sharma")).await.unwrap();

        assert!(lead.id.starts_with("L-"));
        assert_eq!(lead.status, LeadStatus::NewLead);
        assert!(lead.chat_history.is_empty());
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let repo = MemoryLeadRepository::new();
        let mut input = lead_input("Priya Sharma");
        input.id = Some("L001".to_string());
        repo.create(input.clone()).await.unwrap();

        assert!(matches!(
            repo.create(input).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn audit_ids_are_zero_padded_and_monotonic() {
        let repo = MemoryAuditLogRepository::new();
        let first = repo
            .append("System", "New WhatsApp Lead", "created".to_string())
            .await
            .unwrap();
        let second = repo
            .append("User", "Message Sent", "sent".to_string())
            .await
            .unwrap();

        assert_eq!(first.id, "A001");
        assert_eq!(second.id, "A002");
    }

    #[tokio::test]
    async fn messages_preserve_insertion_order() {
        let repo = MemoryLeadRepository::new();
        let lead = repo.create(lead_input("Anjali Verma")).await.unwrap();

        repo.append_message(&lead.id, MessageSender::User, "Hello")
            .await
            .unwrap();
        let lead = repo
            .append_message(&lead.id, MessageSender::Lead, "Hi there")
            .await
            .unwrap();

        assert_eq!(lead.chat_history.len(), 2);
        assert_eq!(lead.chat_history[0].text, "Hello");
        assert_eq!(lead.chat_history[1].text, "Hi there");
        assert!(lead.timestamp >= lead.chat_history[1].timestamp);
    }
}
