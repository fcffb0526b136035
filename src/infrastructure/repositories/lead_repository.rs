//! SeaORM implementation of LeadRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use super::parse_timestamp;
use crate::domain::{
    ChatMessage, CreateLeadInput, DomainError, Lead, LeadRepository, LeadStatus, MessageSender,
};
use crate::models::lead::{self, Entity as LeadEntity};

/// SeaORM-based implementation of LeadRepository
pub struct SeaOrmLeadRepository {
    db: DatabaseConnection,
}

impl SeaOrmLeadRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn parse_status(raw: &str) -> Result<LeadStatus, DomainError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| DomainError::Internal(format!("invalid stored lead status '{}'", raw)))
}

fn parse_chat_history(raw: &str) -> Result<Vec<ChatMessage>, DomainError> {
    serde_json::from_str(raw)
        .map_err(|e| DomainError::Internal(format!("invalid stored chat history: {}", e)))
}

fn encode_chat_history(history: &[ChatMessage]) -> Result<String, DomainError> {
    serde_json::to_string(history)
        .map_err(|e| DomainError::Internal(format!("failed to encode chat history: {}", e)))
}

fn to_domain(model: lead::Model) -> Result<Lead, DomainError> {
    Ok(Lead {
        status: parse_status(&model.status)?,
        chat_history: parse_chat_history(&model.chat_history)?,
        timestamp: parse_timestamp(&model.timestamp)?,
        id: model.id,
        name: model.name,
        phone: model.phone,
        utm_source: model.utm_source,
        adcreative_id: model.adcreative_id,
    })
}

#[async_trait]
impl LeadRepository for SeaOrmLeadRepository {
    async fn find_all(&self) -> Result<Vec<Lead>, DomainError> {
        let models = LeadEntity::find().all(&self.db).await?;

        let mut leads = models
            .into_iter()
            .map(to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        // Sort on parsed timestamps rather than the TEXT column so that
        // mixed-precision RFC 3339 strings cannot misorder the listing
        leads.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(leads)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Lead>, DomainError> {
        let model = LeadEntity::find_by_id(id).one(&self.db).await?;
        model.map(to_domain).transpose()
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

        let model = lead::ActiveModel {
            id: Set(lead.id.clone()),
            name: Set(lead.name.clone()),
            phone: Set(lead.phone.clone()),
            status: Set(lead.status.as_str().to_string()),
            chat_history: Set(encode_chat_history(&lead.chat_history)?),
            timestamp: Set(lead.timestamp.to_rfc3339()),
            utm_source: Set(lead.utm_source.clone()),
            adcreative_id: Set(lead.adcreative_id.clone()),
        };
        model.insert(&self.db).await?;

        Ok(lead)
    }

    async fn update_status(&self, id: &str, status: LeadStatus) -> Result<Lead, DomainError> {
        let model = LeadEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: lead::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.timestamp = Set(Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;
        to_domain(updated)
    }

    async fn append_message(
        &self,
        id: &str,
        sender: MessageSender,
        text: &str,
    ) -> Result<Lead, DomainError> {
        let model = LeadEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let now = Utc::now();
        let mut history = parse_chat_history(&model.chat_history)?;
        history.push(ChatMessage {
            sender,
            text: text.to_string(),
            timestamp: now,
        });

        let mut active: lead::ActiveModel = model.into();
        active.chat_history = Set(encode_chat_history(&history)?);
        active.timestamp = Set(now.to_rfc3339());

        let updated = active.update(&self.db).await?;
        to_domain(updated)
    }
}
