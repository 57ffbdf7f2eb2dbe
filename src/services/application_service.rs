use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::database::Store;
use crate::dto::application_dto::{JobApplicantsResponse, JobBrief};
use crate::error::{Error, Result};
use crate::models::application::{
    Application, ApplicationDetail, ApplicationStatus, ApplicationWithJob, NewApplication,
};
use crate::services::authorization::{self, Actor};

#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn Store>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates an `Applied` application. The duplicate pre-check gives a clear
    /// message; the store's unique constraint still decides concurrent races.
    pub async fn apply(&self, actor: &Actor, job_id: Uuid) -> Result<Application> {
        if !actor.is_jobseeker() {
            return Err(Error::Forbidden(
                "Only job seekers can apply to jobs".to_string(),
            ));
        }

        let job = self
            .store
            .find_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        let already_applied = self
            .store
            .find_application_for(job_id, actor.id)
            .await?
            .is_some();

        if !authorization::can_apply(Some(actor), &job, already_applied) {
            return Err(if job.is_closed {
                Error::Conflict(
                    "This job is closed and no longer accepting applications".to_string(),
                )
            } else {
                Error::Conflict("Already applied to this job".to_string())
            });
        }

        let resume = self
            .store
            .find_user(actor.id)
            .await?
            .and_then(|u| u.resume)
            .filter(|r| !r.trim().is_empty());

        let application = self
            .store
            .insert_application(NewApplication {
                job_id,
                applicant_id: actor.id,
                resume,
            })
            .await?;

        info!(
            application_id = %application.id,
            job_id = %job_id,
            applicant_id = %actor.id,
            "application submitted"
        );
        Ok(application)
    }

    pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<ApplicationWithJob>> {
        if !actor.is_jobseeker() {
            return Err(Error::Forbidden(
                "Only job seekers can view their applications".to_string(),
            ));
        }
        self.store.list_applications_by_applicant(actor.id).await
    }

    pub async fn list_for_job(&self, actor: &Actor, job_id: Uuid) -> Result<JobApplicantsResponse> {
        let job = self
            .store
            .find_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        if !authorization::can_mutate_job(Some(actor), &job) {
            warn!(user_id = %actor.id, job_id = %job_id, "applicant list denied");
            return Err(Error::Forbidden(
                "Only the job owner can view its applicants".to_string(),
            ));
        }

        let applications = self.store.list_applications_by_job(job_id).await?;
        Ok(JobApplicantsResponse {
            job: JobBrief::from(&job),
            applications,
        })
    }

    pub async fn get_by_id(&self, actor: &Actor, id: Uuid) -> Result<ApplicationDetail> {
        let detail = self
            .store
            .find_application_detail(id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        let job = self.store.find_job(detail.application.job_id).await?;

        if !authorization::can_view_application(Some(actor), &detail.application, job.as_ref()) {
            warn!(user_id = %actor.id, application_id = %id, "application view denied");
            return Err(Error::Forbidden(
                "You are not allowed to view this application".to_string(),
            ));
        }
        Ok(detail)
    }

    pub async fn set_status(&self, actor: &Actor, id: Uuid, status: &str) -> Result<Application> {
        let status: ApplicationStatus = status.parse().map_err(Error::BadRequest)?;

        let application = self
            .store
            .find_application(id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        let job = self.store.find_job(application.job_id).await?;

        let allowed = job
            .as_ref()
            .map(|j| authorization::can_update_application_status(Some(actor), &application, j))
            .unwrap_or(false);
        if !allowed {
            warn!(user_id = %actor.id, application_id = %id, "status change denied");
            return Err(Error::Forbidden(
                "Not authorized to update this application".to_string(),
            ));
        }

        let updated = self.store.update_application_status(id, status).await?;
        info!(
            application_id = %id,
            from = %application.status,
            to = %updated.status,
            "application status changed"
        );
        Ok(updated)
    }
}
