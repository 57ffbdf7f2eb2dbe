use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::job::JobWithCompany;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedJob {
    pub id: Uuid,
    pub job_id: Uuid,
    pub jobseeker_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedJobWithJob {
    #[serde(flatten)]
    pub saved: SavedJob,
    pub job: Option<JobWithCompany>,
}
