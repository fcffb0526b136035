//! Application state containing repositories and shared resources

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::domain::{AuditLogRepository, CampaignRepository, LeadRepository};
use crate::infrastructure::repositories::{
    MemoryAuditLogRepository, MemoryCampaignRepository, MemoryLeadRepository,
    SeaOrmAuditLogRepository, SeaOrmCampaignRepository, SeaOrmLeadRepository,
};
use crate::services::ad_copy::AdCopyService;
use crate::services::events::EventBus;

/// Application state shared across all handlers and background tasks
#[derive(Clone)]
pub struct AppState {
    /// Lead store; the lifecycle service is its only production writer
    pub lead_repo: Arc<dyn LeadRepository>,
    /// Append-only audit log store
    pub audit_repo: Arc<dyn AuditLogRepository>,
    /// Read-only campaign counters
    pub campaign_repo: Arc<dyn CampaignRepository>,
    /// Fan-out bus for store mutations
    pub events: EventBus,
    /// Memoizing ad-copy generation gateway
    pub ad_copy: Arc<AdCopyService>,
    /// Shared client for outbound webhook calls
    pub http: reqwest::Client,
    pub fulfillment_webhook_url: Option<String>,
    /// Delay before the automated chat reply lands
    pub reply_delay: Duration,
}

impl AppState {
    /// State backed by the in-memory stores (the default backend)
    pub fn in_memory(config: &Config) -> Self {
        Self::build(
            Arc::new(MemoryLeadRepository::new()),
            Arc::new(MemoryAuditLogRepository::new()),
            Arc::new(MemoryCampaignRepository::new()),
            config,
        )
    }

    /// State backed by the SeaORM stores over the given connection
    pub fn with_database(db: DatabaseConnection, config: &Config) -> Self {
        Self::build(
            Arc::new(SeaOrmLeadRepository::new(db.clone())),
            Arc::new(SeaOrmAuditLogRepository::new(db.clone())),
            Arc::new(SeaOrmCampaignRepository::new(db)),
            config,
        )
    }

    fn build(
        lead_repo: Arc<dyn LeadRepository>,
        audit_repo: Arc<dyn AuditLogRepository>,
        campaign_repo: Arc<dyn CampaignRepository>,
        config: &Config,
    ) -> Self {
        Self {
            lead_repo,
            audit_repo,
            campaign_repo,
            events: EventBus::default(),
            ad_copy: Arc::new(AdCopyService::new(config.ai.clone())),
            http: reqwest::Client::new(),
            fulfillment_webhook_url: config.fulfillment_webhook_url.clone(),
            reply_delay: config.reply_delay,
        }
    }
}
