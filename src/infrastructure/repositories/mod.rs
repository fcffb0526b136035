//! Repository implementations: in-memory (default) and SeaORM-backed

pub mod audit_log_repository;
pub mod campaign_repository;
pub mod lead_repository;
pub mod memory;

pub use audit_log_repository::SeaOrmAuditLogRepository;
pub use campaign_repository::SeaOrmCampaignRepository;
pub use lead_repository::SeaOrmLeadRepository;
pub use memory::{MemoryAuditLogRepository, MemoryCampaignRepository, MemoryLeadRepository};

use chrono::{DateTime, Utc};

use crate::domain::DomainError;

/// Parse an RFC 3339 timestamp persisted as TEXT. Stored values are written
/// by this crate, so a parse failure means a corrupt row.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DomainError::Internal(format!("invalid stored timestamp '{}': {}", raw, e)))
}
