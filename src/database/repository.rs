use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::application::{
    Application, ApplicationDetail, ApplicationStatus, ApplicationWithApplicant,
    ApplicationWithJob, NewApplication,
};
use crate::models::job::{EmployerJob, Job, JobFilter, JobWithCompany, NewJob};
use crate::models::saved_job::{SavedJob, SavedJobWithJob};
use crate::models::user::{NewUser, ProfileChanges, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User>;
    async fn clear_resume(&self, id: Uuid) -> Result<User>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert_job(&self, job: NewJob) -> Result<Job>;
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>>;
    async fn find_job_with_company(&self, id: Uuid) -> Result<Option<JobWithCompany>>;
    /// Open jobs matching `filter`, newest first.
    async fn list_open_jobs(&self, filter: &JobFilter) -> Result<Vec<JobWithCompany>>;
    /// Every job owned by `company_id`, newest first, with its application count.
    async fn list_jobs_by_company(&self, company_id: Uuid) -> Result<Vec<EmployerJob>>;
    /// Writes the editable fields. `is_closed`, the owner and `created_at` are left as stored.
    async fn save_job(&self, job: &Job) -> Result<Job>;
    /// Flips `is_closed` in a single write. `None` when the job does not exist.
    async fn toggle_job_closed(&self, id: Uuid) -> Result<Option<Job>>;
    /// Removes the job together with its applications and bookmarks.
    async fn delete_job(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Fails with `NotFound` for a missing job, and with `Conflict` when the job is
    /// closed or the (job, applicant) pair already exists.
    async fn insert_application(&self, application: NewApplication) -> Result<Application>;
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>>;
    async fn find_application_detail(&self, id: Uuid) -> Result<Option<ApplicationDetail>>;
    async fn find_application_for(
        &self,
        job_id: Uuid,
        applicant_id: Uuid,
    ) -> Result<Option<Application>>;
    async fn list_applications_by_applicant(
        &self,
        applicant_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>>;
    async fn list_applications_by_job(&self, job_id: Uuid)
        -> Result<Vec<ApplicationWithApplicant>>;
    /// Applications to any job owned by `company_id`, newest first.
    async fn list_applications_by_company(&self, company_id: Uuid) -> Result<Vec<ApplicationDetail>>;
    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application>;
}

#[async_trait]
pub trait SavedJobRepository: Send + Sync {
    /// Fails with `Conflict` when the (job, jobseeker) pair already exists.
    async fn insert_saved_job(&self, job_id: Uuid, jobseeker_id: Uuid) -> Result<SavedJob>;
    async fn find_saved_job(&self, job_id: Uuid, jobseeker_id: Uuid) -> Result<Option<SavedJob>>;
    async fn delete_saved_job(&self, job_id: Uuid, jobseeker_id: Uuid) -> Result<bool>;
    async fn list_saved_jobs(&self, jobseeker_id: Uuid) -> Result<Vec<SavedJobWithJob>>;
}

/// Everything a service needs from persistence.
pub trait Store: UserRepository + JobRepository + ApplicationRepository + SavedJobRepository {}

impl<T> Store for T where
    T: UserRepository + JobRepository + ApplicationRepository + SavedJobRepository
{
}
