use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::job::{Job, JobFilter};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub requirements: String,
    pub location: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub salary_min: Decimal,
    pub salary_max: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
}

impl UpdateJobPayload {
    /// Copies every present field onto `job`.
    pub fn merge_into(self, job: &mut Job) {
        if let Some(title) = self.title {
            job.title = title;
        }
        if let Some(description) = self.description {
            job.description = description;
        }
        if let Some(requirements) = self.requirements {
            job.requirements = requirements;
        }
        if self.location.is_some() {
            job.location = self.location;
        }
        if self.category.is_some() {
            job.category = self.category;
        }
        if self.job_type.is_some() {
            job.job_type = self.job_type;
        }
        if let Some(min) = self.salary_min {
            job.salary_min = min;
        }
        if let Some(max) = self.salary_max {
            job.salary_max = max;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobListQuery {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
    pub user_id: Option<Uuid>,
}

impl JobListQuery {
    pub fn filter(&self) -> JobFilter {
        JobFilter {
            keyword: self.keyword.clone(),
            location: self.location.clone(),
            category: self.category.clone(),
            job_type: self.job_type.clone(),
            min_salary: self.min_salary,
            max_salary: self.max_salary,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobActionResponse {
    pub message: String,
    pub job: Job,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn merge_keeps_absent_fields() {
        let mut job = Job {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: "Designer".into(),
            description: "Design".into(),
            requirements: "Figma".into(),
            location: Some("Remote".into()),
            category: Some("Design".into()),
            job_type: Some("Contract".into()),
            salary_min: Decimal::from(50_000),
            salary_max: Decimal::from(70_000),
            is_closed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        UpdateJobPayload {
            title: Some("Senior Designer".into()),
            salary_max: Some(Decimal::from(90_000)),
            ..Default::default()
        }
        .merge_into(&mut job);

        assert_eq!(job.title, "Senior Designer");
        assert_eq!(job.salary_min, Decimal::from(50_000));
        assert_eq!(job.salary_max, Decimal::from(90_000));
        assert_eq!(job.location.as_deref(), Some("Remote"));
    }

    #[test]
    fn payload_reads_type_field() {
        let payload: CreateJobPayload = serde_json::from_value(serde_json::json!({
            "title": "Ops",
            "description": "Run things",
            "requirements": "Linux",
            "type": "Part-Time",
            "salary_min": 10,
            "salary_max": 20
        }))
        .unwrap();
        assert_eq!(payload.job_type.as_deref(), Some("Part-Time"));
    }
}
