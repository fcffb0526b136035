pub mod ad_copy;
pub mod crm_service;
pub mod events;
