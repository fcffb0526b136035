//! Repository trait definitions and domain entities
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Position of a lead in the sales funnel.
///
/// No transition graph is enforced: any status may be set from any other,
/// which allows manual correction. `Paid` fires the fulfillment trigger
/// each time it is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum LeadStatus {
    #[serde(rename = "New Lead")]
    NewLead,
    Contacted,
    Interested,
    Paid,
    Shipped,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::NewLead => "New Lead",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Interested => "Interested",
            LeadStatus::Paid => "Paid",
            LeadStatus::Shipped => "Shipped",
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author of a chat message: the prospect or the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    Lead,
    User,
}

/// One entry in a lead's chat history. Append-only, chronological.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatMessage {
    pub sender: MessageSender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A prospective customer captured from an inbound marketing channel.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub status: LeadStatus,
    #[serde(rename = "chatHistory")]
    pub chat_history: Vec<ChatMessage>,
    /// Last-activity time; refreshed on every status change or message append.
    pub timestamp: DateTime<Utc>,
    pub utm_source: String,
    pub adcreative_id: String,
}

/// Input for creating a lead. The store assigns an id when none is given.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateLeadInput {
    pub id: Option<String>,
    pub name: String,
    pub phone: String,
    pub status: Option<LeadStatus>,
    #[serde(rename = "chatHistory", default)]
    pub chat_history: Vec<ChatMessage>,
    pub timestamp: Option<DateTime<Utc>>,
    pub utm_source: String,
    pub adcreative_id: String,
}

/// Append-only record of a system, user or automation event.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuditLogEntry {
    /// `A`-prefixed zero-padded sequence number, strictly monotonic per store.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Open set; `System`, `User` and `AI Autopilot` occur in practice.
    #[serde(rename = "user")]
    pub actor: String,
    pub action: String,
    pub details: String,
}

/// Raw per-campaign delivery counters as reported by the ads platform.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub status: String,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub purchase_value: f64,
    pub actions: u64,
}

/// Campaign counters enriched with derived metrics.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CampaignWithMetrics {
    #[serde(flatten)]
    pub campaign: Campaign,
    /// Click-through rate, percent. 0 when there are no impressions.
    pub ctr: f64,
    /// Return on ad spend. 0 when there is no spend.
    pub roas: f64,
    /// Cost per action. 0 when there are no actions.
    pub cpa: f64,
}

impl From<Campaign> for CampaignWithMetrics {
    fn from(campaign: Campaign) -> Self {
        let ctr = if campaign.impressions > 0 {
            campaign.clicks as f64 / campaign.impressions as f64 * 100.0
        } else {
            0.0
        };
        let roas = if campaign.spend > 0.0 {
            campaign.purchase_value / campaign.spend
        } else {
            0.0
        };
        let cpa = if campaign.actions > 0 {
            campaign.spend / campaign.actions as f64
        } else {
            0.0
        };

        Self {
            campaign,
            ctr,
            roas,
            cpa,
        }
    }
}

/// Repository trait for Lead records. The lifecycle service is the only
/// production writer.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Find all leads, ordered descending by last-activity timestamp
    async fn find_all(&self) -> Result<Vec<Lead>, DomainError>;

    /// Find a lead by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Lead>, DomainError>;

    /// Create a new lead, assigning an id when the input carries none
    async fn create(&self, input: CreateLeadInput) -> Result<Lead, DomainError>;

    /// Set a lead's status and refresh its timestamp
    async fn update_status(&self, id: &str, status: LeadStatus) -> Result<Lead, DomainError>;

    /// Append a chat message and refresh the lead's timestamp
    async fn append_message(
        &self,
        id: &str,
        sender: MessageSender,
        text: &str,
    ) -> Result<Lead, DomainError>;
}

/// Repository trait for the append-only audit log
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append an entry, generating its id
    async fn append(
        &self,
        actor: &str,
        action: &str,
        details: String,
    ) -> Result<AuditLogEntry, DomainError>;

    /// Find all entries, ordered descending by timestamp
    async fn find_all(&self) -> Result<Vec<AuditLogEntry>, DomainError>;
}

/// Repository trait for read-only campaign counters
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// Find all campaigns
    async fn find_all(&self) -> Result<Vec<Campaign>, DomainError>;

    /// Insert a campaign snapshot (used by seeding)
    async fn insert(&self, campaign: Campaign) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(spend: f64, impressions: u64, clicks: u64, purchase_value: f64, actions: u64) -> Campaign {
        Campaign {
            id: "C001".to_string(),
            name: "Test Campaign".to_string(),
            status: "Active".to_string(),
            spend,
            impressions,
            clicks,
            purchase_value,
            actions,
        }
    }

    #[test]
    fn derives_metrics_from_counters() {
        let m = CampaignWithMetrics::from(campaign(50000.0, 750000, 15000, 250000.0, 100));
        assert_eq!(m.roas, 5.0);
        assert_eq!(m.ctr, 2.0);
        assert_eq!(m.cpa, 500.0);
    }

    #[test]
    fn zero_divisors_yield_zero_not_errors() {
        let m = CampaignWithMetrics::from(campaign(0.0, 0, 0, 80000.0, 0));
        assert_eq!(m.roas, 0.0);
        assert_eq!(m.ctr, 0.0);
        assert_eq!(m.cpa, 0.0);
    }

    #[test]
    fn status_labels_round_trip_through_serde() {
        let s: LeadStatus = serde_json::from_str("\"New Lead\"").expect("known label");
        assert_eq!(s, LeadStatus::NewLead);
        assert_eq!(serde_json::to_string(&LeadStatus::Paid).unwrap(), "\"Paid\"");

        // Free-form strings are rejected at the boundary
        assert!(serde_json::from_str::<LeadStatus>("\"Ghosted\"").is_err());
    }
}
