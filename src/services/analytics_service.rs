use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::database::Store;
use crate::dto::analytics_dto::{
    AnalyticsOverview, OverviewCounts, OverviewData, RecentApplication, RecentJob, Trends,
};
use crate::error::{Error, Result};
use crate::models::application::ApplicationStatus;
use crate::services::authorization::Actor;
use crate::utils::time::{days_before, now};

const RECENT_LIMIT: usize = 5;
const TREND_WINDOW_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn Store>,
}

/// Percentage change from `previous` to `current`, rounded toward zero.
pub fn percent_change(current: i64, previous: i64) -> i64 {
    if previous == 0 {
        return if current > 0 { 100 } else { 0 };
    }
    (current - previous) * 100 / previous
}

/// Counts timestamps in the last window and in the window before it.
fn window_counts<I>(stamps: I, at: DateTime<Utc>) -> (i64, i64)
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let current_start = days_before(at, TREND_WINDOW_DAYS);
    let previous_start = days_before(at, TREND_WINDOW_DAYS * 2);
    stamps.into_iter().fold((0, 0), |(cur, prev), ts| {
        if ts >= current_start && ts <= at {
            (cur + 1, prev)
        } else if ts >= previous_start && ts < current_start {
            (cur, prev + 1)
        } else {
            (cur, prev)
        }
    })
}

fn trend<I>(stamps: I, at: DateTime<Utc>) -> i64
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let (current, previous) = window_counts(stamps, at);
    percent_change(current, previous)
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn overview(&self, actor: &Actor) -> Result<AnalyticsOverview> {
        if !actor.is_employer() {
            return Err(Error::Forbidden("Access denied".to_string()));
        }

        let jobs = self.store.list_jobs_by_company(actor.id).await?;
        let applications = self.store.list_applications_by_company(actor.id).await?;
        let at = now();

        let hired: Vec<_> = applications
            .iter()
            .filter(|a| a.application.status == ApplicationStatus::Accepted)
            .collect();

        let counts = OverviewCounts {
            total_active_jobs: jobs.iter().filter(|j| !j.job.is_closed).count() as i64,
            total_closed_jobs: jobs.iter().filter(|j| j.job.is_closed).count() as i64,
            total_applications: applications.len() as i64,
            total_hired: hired.len() as i64,
            trends: Trends {
                active_jobs: trend(jobs.iter().map(|j| j.job.created_at), at),
                applications: trend(applications.iter().map(|a| a.application.created_at), at),
                hired: trend(hired.iter().map(|a| a.application.updated_at), at),
            },
        };

        // Both store lists are newest first.
        let recent_jobs = jobs
            .iter()
            .take(RECENT_LIMIT)
            .map(|j| RecentJob {
                id: j.job.id,
                title: j.job.title.clone(),
                location: j.job.location.clone(),
                job_type: j.job.job_type.clone(),
                is_closed: j.job.is_closed,
                application_count: j.application_count,
                created_at: j.job.created_at,
            })
            .collect();
        let recent_applications = applications
            .into_iter()
            .take(RECENT_LIMIT)
            .map(|a| RecentApplication {
                id: a.application.id,
                job_id: a.application.job_id,
                job_title: a.job.map(|j| j.title),
                applicant: a.applicant,
                status: a.application.status,
                created_at: a.application.created_at,
            })
            .collect();

        Ok(AnalyticsOverview {
            counts,
            data: OverviewData {
                recent_jobs,
                recent_applications,
            },
        })
    }
}
