//! SeaORM implementation of CampaignRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::domain::{Campaign, CampaignRepository, DomainError};
use crate::models::campaign::{self, Entity as CampaignEntity};

/// SeaORM-based implementation of CampaignRepository
pub struct SeaOrmCampaignRepository {
    db: DatabaseConnection,
}

impl SeaOrmCampaignRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CampaignRepository for SeaOrmCampaignRepository {
    async fn find_all(&self) -> Result<Vec<Campaign>, DomainError> {
        let models = CampaignEntity::find().all(&self.db).await?;

        Ok(models
            .into_iter()
            .map(|m| Campaign {
                id: m.id,
                name: m.name,
                status: m.status,
                spend: m.spend,
                impressions: m.impressions.max(0) as u64,
                clicks: m.clicks.max(0) as u64,
                purchase_value: m.purchase_value,
                actions: m.actions.max(0) as u64,
            })
            .collect())
    }

    async fn insert(&self, campaign: Campaign) -> Result<(), DomainError> {
        // Replace any existing snapshot for the same campaign id
        CampaignEntity::delete_by_id(&campaign.id)
            .exec(&self.db)
            .await?;

        let model = campaign::ActiveModel {
            id: Set(campaign.id),
            name: Set(campaign.name),
            status: Set(campaign.status),
            spend: Set(campaign.spend),
            impressions: Set(campaign.impressions as i64),
            clicks: Set(campaign.clicks as i64),
            purchase_value: Set(campaign.purchase_value),
            actions: Set(campaign.actions as i64),
        };
        model.insert(&self.db).await?;

        Ok(())
    }
}
