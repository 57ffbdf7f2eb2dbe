pub mod ai_dto;
pub mod analytics_dto;
pub mod application_dto;
pub mod auth_dto;
pub mod job_dto;
pub mod saved_job_dto;
