pub mod audit_log;
pub mod campaign;
pub mod lead;
