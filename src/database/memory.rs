use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::repository::{
    ApplicationRepository, JobRepository, SavedJobRepository, UserRepository,
};
use crate::error::{Error, Result};
use crate::models::application::{
    Application, ApplicationDetail, ApplicationStatus, ApplicationWithApplicant,
    ApplicationWithJob, NewApplication,
};
use crate::models::job::{EmployerJob, Job, JobFilter, JobSummary, JobWithCompany, NewJob};
use crate::models::saved_job::{SavedJob, SavedJobWithJob};
use crate::models::user::{ApplicantSummary, EmployerSummary, NewUser, ProfileChanges, User};
use crate::utils::time::now;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    saved_jobs: Vec<SavedJob>,
    // unique indexes
    user_emails: HashMap<String, Uuid>,
    application_pairs: HashMap<(Uuid, Uuid), Uuid>,
    saved_pairs: HashMap<(Uuid, Uuid), Uuid>,
}

impl Tables {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn job(&self, id: Uuid) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    fn with_company(&self, job: &Job) -> JobWithCompany {
        JobWithCompany {
            job: job.clone(),
            company: self.user(job.company_id).map(EmployerSummary::from),
        }
    }

    fn detail(&self, application: &Application) -> ApplicationDetail {
        ApplicationDetail {
            application: application.clone(),
            job: self.job(application.job_id).map(JobSummary::from),
            applicant: self.user(application.applicant_id).map(ApplicantSummary::from),
        }
    }
}

/// In-process store used by the test suite and `STORAGE=memory` runs.
///
/// All tables sit behind one lock, so every uniqueness check and the insert it
/// guards happen atomically.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))
    }
}

/// Rows are stored oldest first; reversing before a stable sort keeps later
/// inserts ahead on timestamp ties.
fn newest_first<T, F>(mut items: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    items.reverse();
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.lock()?;
        if tables.user_emails.contains_key(&user.email) {
            return Err(Error::Conflict("User already exists".to_string()));
        }
        let ts = now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            avatar: user.avatar,
            resume: None,
            company_name: None,
            company_description: None,
            company_logo: None,
            created_at: ts,
            updated_at: ts,
        };
        tables.user_emails.insert(created.email.clone(), created.id);
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.lock()?.user(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.lock()?;
        Ok(tables
            .user_emails
            .get(email)
            .and_then(|id| tables.user(*id))
            .cloned())
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User> {
        let mut tables = self.lock()?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        user.apply_profile_changes(changes);
        user.updated_at = now();
        Ok(user.clone())
    }

    async fn clear_resume(&self, id: Uuid) -> Result<User> {
        let mut tables = self.lock()?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        user.resume = None;
        user.updated_at = now();
        Ok(user.clone())
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn insert_job(&self, job: NewJob) -> Result<Job> {
        let mut tables = self.lock()?;
        if tables.user(job.company_id).is_none() {
            return Err(Error::NotFound("Employer not found".to_string()));
        }
        let ts = now();
        let created = Job {
            id: Uuid::new_v4(),
            company_id: job.company_id,
            title: job.title,
            description: job.description,
            requirements: job.requirements,
            location: job.location,
            category: job.category,
            job_type: job.job_type,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            is_closed: false,
            created_at: ts,
            updated_at: ts,
        };
        tables.jobs.push(created.clone());
        Ok(created)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.lock()?.job(id).cloned())
    }

    async fn find_job_with_company(&self, id: Uuid) -> Result<Option<JobWithCompany>> {
        let tables = self.lock()?;
        Ok(tables.job(id).map(|job| tables.with_company(job)))
    }

    async fn list_open_jobs(&self, filter: &JobFilter) -> Result<Vec<JobWithCompany>> {
        let tables = self.lock()?;
        let jobs = tables
            .jobs
            .iter()
            .filter(|job| filter.matches(job))
            .map(|job| tables.with_company(job))
            .collect();
        Ok(newest_first(jobs, |j: &JobWithCompany| j.job.created_at))
    }

    async fn list_jobs_by_company(&self, company_id: Uuid) -> Result<Vec<EmployerJob>> {
        let tables = self.lock()?;
        let jobs = tables
            .jobs
            .iter()
            .filter(|job| job.company_id == company_id)
            .map(|job| {
                let application_count = tables
                    .applications
                    .iter()
                    .filter(|a| a.job_id == job.id)
                    .count() as i64;
                EmployerJob {
                    job: job.clone(),
                    company: tables.user(job.company_id).map(EmployerSummary::from),
                    application_count,
                }
            })
            .collect();
        Ok(newest_first(jobs, |j: &EmployerJob| j.job.created_at))
    }

    async fn save_job(&self, job: &Job) -> Result<Job> {
        let mut tables = self.lock()?;
        let stored = tables
            .jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        *stored = Job {
            created_at: stored.created_at,
            company_id: stored.company_id,
            is_closed: stored.is_closed,
            updated_at: now(),
            ..job.clone()
        };
        Ok(stored.clone())
    }

    async fn toggle_job_closed(&self, id: Uuid) -> Result<Option<Job>> {
        let mut tables = self.lock()?;
        Ok(tables.jobs.iter_mut().find(|j| j.id == id).map(|job| {
            job.is_closed = !job.is_closed;
            job.updated_at = now();
            job.clone()
        }))
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.lock()?;
        let before = tables.jobs.len();
        tables.jobs.retain(|j| j.id != id);
        if tables.jobs.len() == before {
            return Ok(false);
        }
        tables.applications.retain(|a| a.job_id != id);
        tables.application_pairs.retain(|(job_id, _), _| *job_id != id);
        tables.saved_jobs.retain(|s| s.job_id != id);
        tables.saved_pairs.retain(|(job_id, _), _| *job_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn insert_application(&self, application: NewApplication) -> Result<Application> {
        let mut tables = self.lock()?;
        match tables.job(application.job_id) {
            None => return Err(Error::NotFound("Job not found".to_string())),
            Some(job) if job.is_closed => {
                return Err(Error::Conflict(
                    "This job is closed and no longer accepting applications".to_string(),
                ))
            }
            Some(_) => {}
        }
        let key = (application.job_id, application.applicant_id);
        if tables.application_pairs.contains_key(&key) {
            return Err(Error::Conflict("Already applied to this job".to_string()));
        }
        let ts = now();
        let created = Application {
            id: Uuid::new_v4(),
            job_id: application.job_id,
            applicant_id: application.applicant_id,
            resume: application.resume,
            status: ApplicationStatus::Applied,
            created_at: ts,
            updated_at: ts,
        };
        tables.application_pairs.insert(key, created.id);
        tables.applications.push(created.clone());
        Ok(created)
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
        let tables = self.lock()?;
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn find_application_detail(&self, id: Uuid) -> Result<Option<ApplicationDetail>> {
        let tables = self.lock()?;
        Ok(tables
            .applications
            .iter()
            .find(|a| a.id == id)
            .map(|a| tables.detail(a)))
    }

    async fn find_application_for(
        &self,
        job_id: Uuid,
        applicant_id: Uuid,
    ) -> Result<Option<Application>> {
        let tables = self.lock()?;
        Ok(tables
            .application_pairs
            .get(&(job_id, applicant_id))
            .and_then(|id| tables.applications.iter().find(|a| a.id == *id))
            .cloned())
    }

    async fn list_applications_by_applicant(
        &self,
        applicant_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>> {
        let tables = self.lock()?;
        let items = tables
            .applications
            .iter()
            .filter(|a| a.applicant_id == applicant_id)
            .map(|a| ApplicationWithJob {
                application: a.clone(),
                job: tables.job(a.job_id).map(JobSummary::from),
            })
            .collect();
        Ok(newest_first(items, |a: &ApplicationWithJob| {
            a.application.created_at
        }))
    }

    async fn list_applications_by_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationWithApplicant>> {
        let tables = self.lock()?;
        let items = tables
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .map(|a| ApplicationWithApplicant {
                application: a.clone(),
                applicant: tables.user(a.applicant_id).map(ApplicantSummary::from),
            })
            .collect();
        Ok(newest_first(items, |a: &ApplicationWithApplicant| {
            a.application.created_at
        }))
    }

    async fn list_applications_by_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<ApplicationDetail>> {
        let tables = self.lock()?;
        let items = tables
            .applications
            .iter()
            .filter(|a| {
                tables
                    .job(a.job_id)
                    .map(|j| j.company_id == company_id)
                    .unwrap_or(false)
            })
            .map(|a| tables.detail(a))
            .collect();
        Ok(newest_first(items, |a: &ApplicationDetail| {
            a.application.created_at
        }))
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let mut tables = self.lock()?;
        let application = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        application.status = status;
        application.updated_at = now();
        Ok(application.clone())
    }
}

#[async_trait]
impl SavedJobRepository for MemoryStore {
    async fn insert_saved_job(&self, job_id: Uuid, jobseeker_id: Uuid) -> Result<SavedJob> {
        let mut tables = self.lock()?;
        if tables.job(job_id).is_none() {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        let key = (job_id, jobseeker_id);
        if tables.saved_pairs.contains_key(&key) {
            return Err(Error::Conflict("Job already saved".to_string()));
        }
        let saved = SavedJob {
            id: Uuid::new_v4(),
            job_id,
            jobseeker_id,
            created_at: now(),
        };
        tables.saved_pairs.insert(key, saved.id);
        tables.saved_jobs.push(saved.clone());
        Ok(saved)
    }

    async fn find_saved_job(&self, job_id: Uuid, jobseeker_id: Uuid) -> Result<Option<SavedJob>> {
        let tables = self.lock()?;
        Ok(tables
            .saved_pairs
            .get(&(job_id, jobseeker_id))
            .and_then(|id| tables.saved_jobs.iter().find(|s| s.id == *id))
            .cloned())
    }

    async fn delete_saved_job(&self, job_id: Uuid, jobseeker_id: Uuid) -> Result<bool> {
        let mut tables = self.lock()?;
        match tables.saved_pairs.remove(&(job_id, jobseeker_id)) {
            Some(id) => {
                tables.saved_jobs.retain(|s| s.id != id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_saved_jobs(&self, jobseeker_id: Uuid) -> Result<Vec<SavedJobWithJob>> {
        let tables = self.lock()?;
        let items = tables
            .saved_jobs
            .iter()
            .filter(|s| s.jobseeker_id == jobseeker_id)
            .map(|s| SavedJobWithJob {
                saved: s.clone(),
                job: tables.job(s.job_id).map(|job| tables.with_company(job)),
            })
            .collect();
        Ok(newest_first(items, |s: &SavedJobWithJob| s.saved.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use rust_decimal::Decimal;

    async fn seed(store: &MemoryStore) -> (User, User, Job) {
        let employer = store
            .insert_user(NewUser {
                name: "Acme HR".into(),
                email: "hr@acme.test".into(),
                password_hash: "x".into(),
                role: Role::Employer,
                avatar: None,
            })
            .await
            .unwrap();
        let seeker = store
            .insert_user(NewUser {
                name: "Sam".into(),
                email: "sam@example.test".into(),
                password_hash: "x".into(),
                role: Role::Jobseeker,
                avatar: None,
            })
            .await
            .unwrap();
        let job = store
            .insert_job(NewJob {
                company_id: employer.id,
                title: "Backend Engineer".into(),
                description: "d".into(),
                requirements: "r".into(),
                location: None,
                category: None,
                job_type: None,
                salary_min: Decimal::from(1),
                salary_max: Decimal::from(2),
            })
            .await
            .unwrap();
        (employer, seeker, job)
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        seed(&store).await;
        let err = store
            .insert_user(NewUser {
                name: "Other".into(),
                email: "sam@example.test".into(),
                password_hash: "x".into(),
                role: Role::Jobseeker,
                avatar: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn application_pair_is_unique() {
        let store = MemoryStore::new();
        let (_, seeker, job) = seed(&store).await;
        let new_app = NewApplication {
            job_id: job.id,
            applicant_id: seeker.id,
            resume: None,
        };
        store.insert_application(new_app.clone()).await.unwrap();
        let err = store.insert_application(new_app).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_a_job_cascades() {
        let store = MemoryStore::new();
        let (employer, seeker, job) = seed(&store).await;
        store
            .insert_application(NewApplication {
                job_id: job.id,
                applicant_id: seeker.id,
                resume: None,
            })
            .await
            .unwrap();
        store.insert_saved_job(job.id, seeker.id).await.unwrap();

        assert!(store.delete_job(job.id).await.unwrap());
        assert!(store
            .list_applications_by_applicant(seeker.id)
            .await
            .unwrap()
            .is_empty());
        assert!(store.list_saved_jobs(seeker.id).await.unwrap().is_empty());
        assert!(store
            .list_jobs_by_company(employer.id)
            .await
            .unwrap()
            .is_empty());
        assert!(!store.delete_job(job.id).await.unwrap());
    }

    #[tokio::test]
    async fn save_job_keeps_owner_and_creation_time() {
        let store = MemoryStore::new();
        let (employer, _, job) = seed(&store).await;
        let mut edited = job.clone();
        edited.title = "Staff Engineer".into();
        edited.company_id = Uuid::new_v4();
        let saved = store.save_job(&edited).await.unwrap();
        assert_eq!(saved.title, "Staff Engineer");
        assert_eq!(saved.company_id, employer.id);
        assert_eq!(saved.created_at, job.created_at);
    }

    #[tokio::test]
    async fn closing_survives_a_stale_save() {
        let store = MemoryStore::new();
        let (_, _, job) = seed(&store).await;
        let mut stale = job.clone();
        stale.title = "Platform Engineer".into();

        let closed = store.toggle_job_closed(job.id).await.unwrap().unwrap();
        assert!(closed.is_closed);

        let saved = store.save_job(&stale).await.unwrap();
        assert_eq!(saved.title, "Platform Engineer");
        assert!(saved.is_closed);
        assert!(store.toggle_job_closed(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn closed_job_rejects_new_applications() {
        let store = MemoryStore::new();
        let (_, seeker, job) = seed(&store).await;
        store.toggle_job_closed(job.id).await.unwrap();

        let err = store
            .insert_application(NewApplication {
                job_id: job.id,
                applicant_id: seeker.id,
                resume: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(msg) if msg.contains("closed")));
        assert!(store
            .find_application_for(job.id, seeker.id)
            .await
            .unwrap()
            .is_none());
    }
}
