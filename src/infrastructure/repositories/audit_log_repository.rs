//! SeaORM implementation of AuditLogRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use super::parse_timestamp;
use crate::domain::{AuditLogEntry, AuditLogRepository, DomainError};
use crate::models::audit_log::{self, Entity as AuditLogEntity};

/// SeaORM-based implementation of AuditLogRepository. Append-only: no
/// update or delete path exists.
pub struct SeaOrmAuditLogRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuditLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn display_id(sequence: i32) -> String {
    format!("A{:03}", sequence)
}

fn to_domain(model: audit_log::Model) -> Result<AuditLogEntry, DomainError> {
    Ok(AuditLogEntry {
        id: display_id(model.id),
        timestamp: parse_timestamp(&model.timestamp)?,
        actor: model.actor,
        action: model.action,
        details: model.details,
    })
}

#[async_trait]
impl AuditLogRepository for SeaOrmAuditLogRepository {
    async fn append(
        &self,
        actor: &str,
        action: &str,
        details: String,
    ) -> Result<AuditLogEntry, DomainError> {
        let entry = audit_log::ActiveModel {
            actor: Set(actor.to_string()),
            action: Set(action.to_string()),
            details: Set(details),
            timestamp: Set(Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let saved = entry.insert(&self.db).await?;
        to_domain(saved)
    }

    async fn find_all(&self) -> Result<Vec<AuditLogEntry>, DomainError> {
        let models = AuditLogEntity::find().all(&self.db).await?;

        let mut entries = models
            .into_iter()
            .map(to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(entries)
    }
}
