use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
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
use crate::models::user::{
    ApplicantSummary, EmployerSummary, NewUser, ProfileChanges, User,
};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, avatar, resume, company_name, company_description, company_logo, created_at, updated_at";

const JOB_COLUMNS: &str = "j.id, j.company_id, j.title, j.description, j.requirements, j.location, j.category, j.job_type, j.salary_min, j.salary_max, j.is_closed, j.created_at, j.updated_at";

const OWNER_COLUMNS: &str =
    "u.name AS owner_name, u.company_name AS owner_company_name, u.company_logo AS owner_company_logo";

const APPLICATION_COLUMNS: &str =
    "a.id, a.job_id, a.applicant_id, a.resume, a.status, a.created_at, a.updated_at";

const APPLICATION_JOB_COLUMNS: &str = "j.title AS job_title, j.company_id AS job_company_id, j.location AS job_location, j.job_type AS job_job_type";

const APPLICANT_COLUMNS: &str = "p.name AS applicant_name, p.email AS applicant_email, p.resume AS applicant_resume";

/// Postgres-backed store. Uniqueness lives in the schema's unique constraints.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct JobCompanyRow {
    #[sqlx(flatten)]
    job: Job,
    owner_name: Option<String>,
    owner_company_name: Option<String>,
    owner_company_logo: Option<String>,
}

impl JobCompanyRow {
    fn owner(&self) -> Option<EmployerSummary> {
        self.owner_name.as_ref().map(|name| EmployerSummary {
            id: self.job.company_id,
            name: name.clone(),
            company_name: self.owner_company_name.clone(),
            company_logo: self.owner_company_logo.clone(),
        })
    }
}

impl From<JobCompanyRow> for JobWithCompany {
    fn from(row: JobCompanyRow) -> Self {
        let company = row.owner();
        Self {
            job: row.job,
            company,
        }
    }
}

#[derive(FromRow)]
struct EmployerJobRow {
    #[sqlx(flatten)]
    base: JobCompanyRow,
    application_count: i64,
}

#[derive(FromRow)]
struct ApplicationRow {
    #[sqlx(flatten)]
    application: Application,
    job_title: Option<String>,
    job_company_id: Option<Uuid>,
    job_location: Option<String>,
    job_job_type: Option<String>,
    applicant_name: Option<String>,
    applicant_email: Option<String>,
    applicant_resume: Option<String>,
}

impl ApplicationRow {
    fn job(&self) -> Option<JobSummary> {
        match (&self.job_title, self.job_company_id) {
            (Some(title), Some(company_id)) => Some(JobSummary {
                id: self.application.job_id,
                title: title.clone(),
                company_id,
                location: self.job_location.clone(),
                job_type: self.job_job_type.clone(),
            }),
            _ => None,
        }
    }

    fn applicant(&self) -> Option<ApplicantSummary> {
        match (&self.applicant_name, &self.applicant_email) {
            (Some(name), Some(email)) => Some(ApplicantSummary {
                id: self.application.applicant_id,
                name: name.clone(),
                email: email.clone(),
                resume: self.applicant_resume.clone(),
            }),
            _ => None,
        }
    }

    fn into_detail(self) -> ApplicationDetail {
        let job = self.job();
        let applicant = self.applicant();
        ApplicationDetail {
            application: self.application,
            job,
            applicant,
        }
    }
}

fn application_detail_query(where_clause: &str) -> String {
    format!(
        "SELECT {}, {}, {}
         FROM applications a
         LEFT JOIN jobs j ON j.id = a.job_id
         LEFT JOIN users p ON p.id = a.applicant_id
         {}
         ORDER BY a.created_at DESC",
        APPLICATION_COLUMNS, APPLICATION_JOB_COLUMNS, APPLICANT_COLUMNS, where_clause
    )
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role, avatar)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.avatar)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User> {
        let mut user = self
            .find_user(id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        user.apply_profile_changes(changes);

        let query = format!(
            "UPDATE users
             SET name = $2, avatar = $3, resume = $4,
                 company_name = $5, company_description = $6, company_logo = $7,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );
        let updated = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&user.name)
            .bind(&user.avatar)
            .bind(&user.resume)
            .bind(&user.company_name)
            .bind(&user.company_description)
            .bind(&user.company_logo)
            .fetch_one(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn clear_resume(&self, id: Uuid) -> Result<User> {
        let query = format!(
            "UPDATE users SET resume = NULL, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let updated = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(updated)
    }
}

#[async_trait]
impl JobRepository for PgStore {
    async fn insert_job(&self, job: NewJob) -> Result<Job> {
        let query = format!(
            "INSERT INTO jobs AS j (
                company_id, title, description, requirements, location,
                category, job_type, salary_min, salary_max
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {}",
            JOB_COLUMNS
        );
        let created = sqlx::query_as::<_, Job>(&query)
            .bind(job.company_id)
            .bind(&job.title)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.location)
            .bind(&job.category)
            .bind(&job.job_type)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>> {
        let query = format!("SELECT {} FROM jobs j WHERE j.id = $1", JOB_COLUMNS);
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn find_job_with_company(&self, id: Uuid) -> Result<Option<JobWithCompany>> {
        let query = format!(
            "SELECT {}, {} FROM jobs j LEFT JOIN users u ON u.id = j.company_id WHERE j.id = $1",
            JOB_COLUMNS, OWNER_COLUMNS
        );
        let row = sqlx::query_as::<_, JobCompanyRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn list_open_jobs(&self, filter: &JobFilter) -> Result<Vec<JobWithCompany>> {
        let mut filters = vec!["j.is_closed = FALSE".to_string()];
        let mut args: Vec<String> = Vec::new();

        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        if let Some(keyword) = non_blank(&filter.keyword) {
            filters.push(format!(
                "POSITION(LOWER(${}) IN LOWER(j.title)) > 0",
                args.len() + 1
            ));
            args.push(keyword);
        }
        if let Some(location) = non_blank(&filter.location) {
            filters.push(format!(
                "POSITION(LOWER(${}) IN LOWER(COALESCE(j.location, ''))) > 0",
                args.len() + 1
            ));
            args.push(location);
        }
        if let Some(category) = non_blank(&filter.category) {
            filters.push(format!("j.category = ${}", args.len() + 1));
            args.push(category);
        }
        if let Some(job_type) = non_blank(&filter.job_type) {
            filters.push(format!("j.job_type = ${}", args.len() + 1));
            args.push(job_type);
        }
        if let Some(min) = filter.min_salary {
            filters.push(format!("j.salary_max >= ${}::numeric", args.len() + 1));
            args.push(min.to_string());
        }
        if let Some(max) = filter.max_salary {
            filters.push(format!("j.salary_max <= ${}::numeric", args.len() + 1));
            args.push(max.to_string());
        }

        let query = format!(
            "SELECT {}, {}
             FROM jobs j
             LEFT JOIN users u ON u.id = j.company_id
             WHERE {}
             ORDER BY j.created_at DESC",
            JOB_COLUMNS,
            OWNER_COLUMNS,
            filters.join(" AND ")
        );

        let mut statement = sqlx::query_as::<_, JobCompanyRow>(&query);
        for value in &args {
            statement = statement.bind(value);
        }
        let rows = statement.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_jobs_by_company(&self, company_id: Uuid) -> Result<Vec<EmployerJob>> {
        let query = format!(
            "SELECT {}, {},
                (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count
             FROM jobs j
             LEFT JOIN users u ON u.id = j.company_id
             WHERE j.company_id = $1
             ORDER BY j.created_at DESC",
            JOB_COLUMNS, OWNER_COLUMNS
        );
        let rows = sqlx::query_as::<_, EmployerJobRow>(&query)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let company = row.base.owner();
                EmployerJob {
                    job: row.base.job,
                    company,
                    application_count: row.application_count,
                }
            })
            .collect())
    }

    async fn save_job(&self, job: &Job) -> Result<Job> {
        let query = format!(
            "UPDATE jobs AS j
             SET title = $2, description = $3, requirements = $4, location = $5,
                 category = $6, job_type = $7, salary_min = $8, salary_max = $9,
                 updated_at = NOW()
             WHERE j.id = $1
             RETURNING {}",
            JOB_COLUMNS
        );
        let updated = sqlx::query_as::<_, Job>(&query)
            .bind(job.id)
            .bind(&job.title)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.location)
            .bind(&job.category)
            .bind(&job.job_type)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .fetch_one(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn toggle_job_closed(&self, id: Uuid) -> Result<Option<Job>> {
        let query = format!(
            "UPDATE jobs AS j
             SET is_closed = NOT j.is_closed, updated_at = NOW()
             WHERE j.id = $1
             RETURNING {}",
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl ApplicationRepository for PgStore {
    async fn insert_application(&self, application: NewApplication) -> Result<Application> {
        // Inserts nothing when the job is missing or closed.
        let query = format!(
            "INSERT INTO applications AS a (job_id, applicant_id, resume, status)
             SELECT $1, $2, $3, $4 FROM jobs WHERE id = $1 AND NOT is_closed
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let created = sqlx::query_as::<_, Application>(&query)
            .bind(application.job_id)
            .bind(application.applicant_id)
            .bind(&application.resume)
            .bind(ApplicationStatus::Applied.as_str())
            .fetch_optional(&self.pool)
            .await?;
        match created {
            Some(created) => Ok(created),
            None if self.find_job(application.job_id).await?.is_none() => {
                Err(Error::NotFound("Job not found".to_string()))
            }
            None => Err(Error::Conflict(
                "This job is closed and no longer accepting applications".to_string(),
            )),
        }
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
        let query = format!(
            "SELECT {} FROM applications a WHERE a.id = $1",
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(application)
    }

    async fn find_application_detail(&self, id: Uuid) -> Result<Option<ApplicationDetail>> {
        let query = application_detail_query("WHERE a.id = $1");
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ApplicationRow::into_detail))
    }

    async fn find_application_for(
        &self,
        job_id: Uuid,
        applicant_id: Uuid,
    ) -> Result<Option<Application>> {
        let query = format!(
            "SELECT {} FROM applications a WHERE a.job_id = $1 AND a.applicant_id = $2",
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(job_id)
            .bind(applicant_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(application)
    }

    async fn list_applications_by_applicant(
        &self,
        applicant_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>> {
        let query = application_detail_query("WHERE a.applicant_id = $1");
        let rows = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(applicant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let job = row.job();
                ApplicationWithJob {
                    application: row.application,
                    job,
                }
            })
            .collect())
    }

    async fn list_applications_by_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationWithApplicant>> {
        let query = application_detail_query("WHERE a.job_id = $1");
        let rows = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let applicant = row.applicant();
                ApplicationWithApplicant {
                    application: row.application,
                    applicant,
                }
            })
            .collect())
    }

    async fn list_applications_by_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<ApplicationDetail>> {
        let query = application_detail_query("WHERE j.company_id = $1");
        let rows = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ApplicationRow::into_detail).collect())
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let query = format!(
            "UPDATE applications AS a SET status = $2, updated_at = NOW()
             WHERE a.id = $1
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let updated = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(updated)
    }
}

#[async_trait]
impl SavedJobRepository for PgStore {
    async fn insert_saved_job(&self, job_id: Uuid, jobseeker_id: Uuid) -> Result<SavedJob> {
        let saved = sqlx::query_as::<_, SavedJob>(
            "INSERT INTO saved_jobs (job_id, jobseeker_id)
             VALUES ($1, $2)
             RETURNING id, job_id, jobseeker_id, created_at",
        )
        .bind(job_id)
        .bind(jobseeker_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn find_saved_job(&self, job_id: Uuid, jobseeker_id: Uuid) -> Result<Option<SavedJob>> {
        let saved = sqlx::query_as::<_, SavedJob>(
            "SELECT id, job_id, jobseeker_id, created_at
             FROM saved_jobs
             WHERE job_id = $1 AND jobseeker_id = $2",
        )
        .bind(job_id)
        .bind(jobseeker_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn delete_saved_job(&self, job_id: Uuid, jobseeker_id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM saved_jobs WHERE job_id = $1 AND jobseeker_id = $2")
            .bind(job_id)
            .bind(jobseeker_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_saved_jobs(&self, jobseeker_id: Uuid) -> Result<Vec<SavedJobWithJob>> {
        let saved = sqlx::query_as::<_, SavedJob>(
            "SELECT id, job_id, jobseeker_id, created_at
             FROM saved_jobs
             WHERE jobseeker_id = $1
             ORDER BY created_at DESC",
        )
        .bind(jobseeker_id)
        .fetch_all(&self.pool)
        .await?;

        let job_ids: Vec<Uuid> = saved.iter().map(|s| s.job_id).collect();
        let query = format!(
            "SELECT {}, {} FROM jobs j LEFT JOIN users u ON u.id = j.company_id WHERE j.id = ANY($1)",
            JOB_COLUMNS, OWNER_COLUMNS
        );
        let jobs: Vec<JobWithCompany> = sqlx::query_as::<_, JobCompanyRow>(&query)
            .bind(&job_ids)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(saved
            .into_iter()
            .map(|s| {
                let job = jobs.iter().find(|j| j.job.id == s.job_id).cloned();
                SavedJobWithJob { saved: s, job }
            })
            .collect())
    }
}
