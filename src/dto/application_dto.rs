use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::application::{Application, ApplicationWithApplicant};
use crate::models::job::Job;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobBrief {
    pub id: Uuid,
    pub title: String,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
}

impl From<&Job> for JobBrief {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            location: job.location.clone(),
            job_type: job.job_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplicantsResponse {
    pub job: JobBrief,
    pub applications: Vec<ApplicationWithApplicant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    pub message: String,
    pub application: Application,
}
