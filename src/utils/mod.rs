pub mod crypto;
pub mod job_sections;
pub mod time;
pub mod token;
