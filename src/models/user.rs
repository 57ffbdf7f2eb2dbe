use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employer,
    Jobseeker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employer => "employer",
            Role::Jobseeker => "jobseeker",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employer" => Ok(Role::Employer),
            "jobseeker" => Ok(Role::Jobseeker),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub avatar: Option<String>,
    pub resume: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub avatar: Option<String>,
}

/// Profile fields an identity may change on itself. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub resume: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_logo: Option<String>,
}

impl User {
    /// Applies `changes` in place. Company fields only stick for employers.
    pub fn apply_profile_changes(&mut self, changes: ProfileChanges) {
        fn keep_non_empty(slot: &mut Option<String>, value: Option<String>) {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                *slot = Some(v);
            }
        }

        if let Some(name) = changes.name.filter(|n| !n.trim().is_empty()) {
            self.name = name;
        }
        keep_non_empty(&mut self.avatar, changes.avatar);
        keep_non_empty(&mut self.resume, changes.resume);

        if self.role == Role::Employer {
            keep_non_empty(&mut self.company_name, changes.company_name);
            keep_non_empty(&mut self.company_description, changes.company_description);
            keep_non_empty(&mut self.company_logo, changes.company_logo);
        }
    }
}

/// Owner fields joined onto job listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployerSummary {
    pub id: Uuid,
    pub name: String,
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
}

/// Applicant fields joined onto applications.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicantSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub resume: Option<String>,
}

impl From<&User> for EmployerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            company_name: user.company_name.clone(),
            company_logo: user.company_logo.clone(),
        }
    }
}

impl From<&User> for ApplicantSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            resume: user.resume.clone(),
        }
    }
}
