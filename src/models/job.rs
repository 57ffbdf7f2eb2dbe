use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::ApplicationStatus;
use crate::models::user::EmployerSummary;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub salary_min: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub salary_max: Decimal,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: Option<String>,
    pub category: Option<String>,
    pub job_type: Option<String>,
    pub salary_min: Decimal,
    pub salary_max: Decimal,
}

/// Filters for the public listing. Closed jobs are always excluded.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub job_type: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if job.is_closed {
            return false;
        }
        if let Some(keyword) = non_blank(&self.keyword) {
            if !contains_ignore_case(&job.title, keyword) {
                return false;
            }
        }
        if let Some(location) = non_blank(&self.location) {
            match &job.location {
                Some(l) if contains_ignore_case(l, location) => {}
                _ => return false,
            }
        }
        if let Some(category) = non_blank(&self.category) {
            if job.category.as_deref() != Some(category) {
                return false;
            }
        }
        if let Some(job_type) = non_blank(&self.job_type) {
            if job.job_type.as_deref() != Some(job_type) {
                return false;
            }
        }
        if let Some(min) = self.min_salary {
            if job.salary_max < min {
                return false;
            }
        }
        if let Some(max) = self.max_salary {
            if job.salary_max > max {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn validate_salary_range(min: Decimal, max: Decimal) -> Result<()> {
    if min < Decimal::ZERO || max < Decimal::ZERO {
        return Err(Error::BadRequest("Salary cannot be negative".to_string()));
    }
    if min >= max {
        return Err(Error::BadRequest(
            "Maximum salary must be greater than minimum salary".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobWithCompany {
    #[serde(flatten)]
    pub job: Job,
    pub company: Option<EmployerSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerJob {
    #[serde(flatten)]
    pub job: Job,
    pub company: Option<EmployerSummary>,
    pub application_count: i64,
}

/// A job as seen by a particular viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub company: Option<EmployerSummary>,
    pub is_saved: bool,
    pub application_status: Option<ApplicationStatus>,
}

/// Job fields shown next to an application.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub company_id: Uuid,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            company_id: job.company_id,
            location: job.location.clone(),
            job_type: job.job_type.clone(),
        }
    }
}
