use utoipa::OpenApi;

use crate::api;
use crate::domain;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::crm::get_crm_data,
        api::crm::create_lead,
        api::crm::get_lead,
        api::crm::update_lead_status,
        api::crm::send_message,
        api::insights::campaign_insights,
        api::ai::generate,
    ),
    components(schemas(
        domain::Lead,
        domain::LeadStatus,
        domain::ChatMessage,
        domain::MessageSender,
        domain::CreateLeadInput,
        domain::AuditLogEntry,
        domain::Campaign,
        domain::CampaignWithMetrics,
        api::crm::StatusUpdateRequest,
        api::crm::MessageRequest,
        api::ai::GenerateRequest,
    )),
    tags(
        (name = "kaapav", description = "Meta Ads campaign monitoring and lead CRM API")
    )
)]
pub struct ApiDoc;
