use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::{ProfileChanges, Role, User};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub role: Role,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateProfilePayload {
    #[validate(length(max = 120))]
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub resume: Option<String>,
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_logo: Option<String>,
}

impl From<UpdateProfilePayload> for ProfileChanges {
    fn from(value: UpdateProfilePayload) -> Self {
        Self {
            name: value.name,
            avatar: value.avatar,
            resume: value.resume,
            company_name: value.company_name,
            company_description: value.company_description,
            company_logo: value.company_logo,
        }
    }
}

/// The caller's own profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub avatar: String,
    pub resume: String,
    pub company_name: String,
    pub company_description: String,
    pub company_logo: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    pub token: String,
}

/// What anyone may see about an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub avatar: String,
    pub resume: String,
    pub company_name: String,
    pub company_description: String,
    pub company_logo: String,
}

impl From<User> for UserProfile {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
            avatar: value.avatar.unwrap_or_default(),
            resume: value.resume.unwrap_or_default(),
            company_name: value.company_name.unwrap_or_default(),
            company_description: value.company_description.unwrap_or_default(),
            company_logo: value.company_logo.unwrap_or_default(),
            created_at: value.created_at,
        }
    }
}

impl From<User> for PublicProfile {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            role: value.role,
            avatar: value.avatar.unwrap_or_default(),
            resume: value.resume.unwrap_or_default(),
            company_name: value.company_name.unwrap_or_default(),
            company_description: value.company_description.unwrap_or_default(),
            company_logo: value.company_logo.unwrap_or_default(),
        }
    }
}
