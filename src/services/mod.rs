pub mod ai_service;
pub mod analytics_service;
pub mod application_service;
pub mod authorization;
pub mod job_service;
pub mod saved_job_service;
pub mod user_service;
