use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::database::Store;
use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::application::ApplicationStatus;
use crate::models::job::{
    validate_salary_range, EmployerJob, Job, JobFilter, JobView, JobWithCompany, NewJob,
};
use crate::services::authorization::{self, Actor};

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn Store>,
}

/// Bookmarks and application statuses of one viewer, keyed by job.
#[derive(Default)]
struct ViewerMarks {
    saved: HashSet<Uuid>,
    statuses: HashMap<Uuid, ApplicationStatus>,
}

impl ViewerMarks {
    fn view(&self, item: JobWithCompany) -> JobView {
        let id = item.job.id;
        JobView {
            job: item.job,
            company: item.company,
            is_saved: self.saved.contains(&id),
            application_status: self.statuses.get(&id).copied(),
        }
    }
}

impl JobService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, actor: &Actor, payload: CreateJobPayload) -> Result<Job> {
        if !authorization::can_post_job(Some(actor)) {
            warn!(user_id = %actor.id, "non-employer tried to post a job");
            return Err(Error::Forbidden("Only employers can post jobs".to_string()));
        }
        validate_salary_range(payload.salary_min, payload.salary_max)?;

        let job = self
            .store
            .insert_job(NewJob {
                company_id: actor.id,
                title: payload.title,
                description: payload.description,
                requirements: payload.requirements,
                location: payload.location,
                category: payload.category,
                job_type: payload.job_type,
                salary_min: payload.salary_min,
                salary_max: payload.salary_max,
            })
            .await?;

        info!(job_id = %job.id, company_id = %job.company_id, "job created");
        Ok(job)
    }

    async fn viewer_marks(&self, viewer: Option<Uuid>) -> Result<ViewerMarks> {
        let Some(viewer) = viewer else {
            return Ok(ViewerMarks::default());
        };
        let saved = self
            .store
            .list_saved_jobs(viewer)
            .await?
            .into_iter()
            .map(|s| s.saved.job_id)
            .collect();
        let statuses = self
            .store
            .list_applications_by_applicant(viewer)
            .await?
            .into_iter()
            .map(|a| (a.application.job_id, a.application.status))
            .collect();
        Ok(ViewerMarks { saved, statuses })
    }

    pub async fn list(&self, filter: &JobFilter, viewer: Option<Uuid>) -> Result<Vec<JobView>> {
        let jobs = self.store.list_open_jobs(filter).await?;
        let marks = self.viewer_marks(viewer).await?;
        Ok(jobs.into_iter().map(|item| marks.view(item)).collect())
    }

    pub async fn get(&self, id: Uuid, viewer: Option<Uuid>) -> Result<JobView> {
        let item = self
            .store
            .find_job_with_company(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

        let mut marks = ViewerMarks::default();
        if let Some(viewer) = viewer {
            if let Some(app) = self.store.find_application_for(id, viewer).await? {
                marks.statuses.insert(id, app.status);
            }
            if self.store.find_saved_job(id, viewer).await?.is_some() {
                marks.saved.insert(id);
            }
        }
        Ok(marks.view(item))
    }

    pub async fn list_for_employer(&self, actor: &Actor) -> Result<Vec<EmployerJob>> {
        if !actor.is_employer() {
            return Err(Error::Forbidden("Access denied".to_string()));
        }
        self.store.list_jobs_by_company(actor.id).await
    }

    /// Loads a job the actor is allowed to change.
    pub async fn owned_job(&self, actor: &Actor, id: Uuid) -> Result<Job> {
        let job = self
            .store
            .find_job(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        if !authorization::can_mutate_job(Some(actor), &job) {
            warn!(user_id = %actor.id, job_id = %id, "job ownership check failed");
            return Err(Error::Forbidden("You are not the owner of this job".to_string()));
        }
        Ok(job)
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, payload: UpdateJobPayload) -> Result<Job> {
        let mut job = self.owned_job(actor, id).await?;
        payload.merge_into(&mut job);
        validate_salary_range(job.salary_min, job.salary_max)?;

        let job = self.store.save_job(&job).await?;
        info!(job_id = %job.id, "job updated");
        Ok(job)
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<()> {
        self.owned_job(actor, id).await?;
        if !self.store.delete_job(id).await? {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        info!(job_id = %id, "job deleted");
        Ok(())
    }

    pub async fn toggle_close(&self, actor: &Actor, id: Uuid) -> Result<Job> {
        self.owned_job(actor, id).await?;
        let job = self
            .store
            .toggle_job_closed(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        info!(job_id = %job.id, closed = job.is_closed, "job close flag toggled");
        Ok(job)
    }
}
