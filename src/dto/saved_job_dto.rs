use serde::{Deserialize, Serialize};

use crate::models::saved_job::SavedJob;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveJobResponse {
    pub message: String,
    pub saved: SavedJob,
}
