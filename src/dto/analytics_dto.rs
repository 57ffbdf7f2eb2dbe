use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::application::ApplicationStatus;
use crate::models::user::ApplicantSummary;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    pub active_jobs: i64,
    pub applications: i64,
    pub hired: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewCounts {
    pub total_active_jobs: i64,
    pub total_closed_jobs: i64,
    pub total_applications: i64,
    pub total_hired: i64,
    pub trends: Trends,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentJob {
    pub id: Uuid,
    pub title: String,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub is_closed: bool,
    pub application_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: Option<String>,
    pub applicant: Option<ApplicantSummary>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewData {
    pub recent_jobs: Vec<RecentJob>,
    pub recent_applications: Vec<RecentApplication>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    pub counts: OverviewCounts,
    pub data: OverviewData,
}
