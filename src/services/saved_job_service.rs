use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::Store;
use crate::error::{Error, Result};
use crate::models::saved_job::{SavedJob, SavedJobWithJob};
use crate::services::authorization::{self, Actor};

#[derive(Clone)]
pub struct SavedJobService {
    store: Arc<dyn Store>,
}

impl SavedJobService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    fn ensure_jobseeker(actor: &Actor) -> Result<()> {
        if authorization::can_manage_bookmarks(Some(actor)) {
            Ok(())
        } else {
            Err(Error::Forbidden(
                "Only job seekers can manage saved jobs".to_string(),
            ))
        }
    }

    pub async fn save(&self, actor: &Actor, job_id: Uuid) -> Result<SavedJob> {
        Self::ensure_jobseeker(actor)?;
        if self.store.find_job(job_id).await?.is_none() {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        if self.store.find_saved_job(job_id, actor.id).await?.is_some() {
            return Err(Error::Conflict("Job already saved".to_string()));
        }

        let saved = self.store.insert_saved_job(job_id, actor.id).await?;
        info!(job_id = %job_id, jobseeker_id = %actor.id, "job saved");
        Ok(saved)
    }

    pub async fn unsave(&self, actor: &Actor, job_id: Uuid) -> Result<()> {
        Self::ensure_jobseeker(actor)?;
        if !self.store.delete_saved_job(job_id, actor.id).await? {
            return Err(Error::NotFound(
                "Job not found in your saved list".to_string(),
            ));
        }
        info!(job_id = %job_id, jobseeker_id = %actor.id, "job unsaved");
        Ok(())
    }

    pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<SavedJobWithJob>> {
        Self::ensure_jobseeker(actor)?;
        self.store.list_saved_jobs(actor.id).await
    }
}
