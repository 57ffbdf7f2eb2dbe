use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateJobDescriptionPayload {
    #[validate(length(min = 1, max = 200))]
    pub job_title: String,
    pub category: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedJobText {
    pub description: String,
    pub requirements: String,
    pub full_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub model: String,
    pub tokens_used: u64,
    pub job_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateJobDescriptionResponse {
    pub success: bool,
    pub data: GeneratedJobText,
    pub metadata: GenerationMetadata,
}
