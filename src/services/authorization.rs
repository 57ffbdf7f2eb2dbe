//! Ownership and role rules for jobs, applications and bookmarks.
//!
//! Every predicate takes the actor as `Option<&Actor>`: a missing actor is never
//! allowed anything, and nothing here returns an error. Callers turn `false` into
//! the matching error before touching the store.

use uuid::Uuid;

use crate::models::application::Application;
use crate::models::job::Job;
use crate::models::user::Role;

/// The authenticated identity behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn is_employer(&self) -> bool {
        self.role == Role::Employer
    }

    pub fn is_jobseeker(&self) -> bool {
        self.role == Role::Jobseeker
    }
}

pub fn can_post_job(actor: Option<&Actor>) -> bool {
    actor.map(Actor::is_employer).unwrap_or(false)
}

pub fn can_mutate_job(actor: Option<&Actor>, job: &Job) -> bool {
    matches!(actor, Some(a) if a.is_employer() && job.company_id == a.id)
}

pub fn can_apply(actor: Option<&Actor>, job: &Job, already_applied: bool) -> bool {
    matches!(actor, Some(a) if a.is_jobseeker() && !job.is_closed && !already_applied)
}

pub fn can_view_application(
    actor: Option<&Actor>,
    application: &Application,
    job: Option<&Job>,
) -> bool {
    let Some(a) = actor else {
        return false;
    };
    a.id == application.applicant_id || job.map(|j| can_mutate_job(actor, j)).unwrap_or(false)
}

pub fn can_update_application_status(
    actor: Option<&Actor>,
    application: &Application,
    job: &Job,
) -> bool {
    application.job_id == job.id && can_mutate_job(actor, job)
}

pub fn can_manage_bookmarks(actor: Option<&Actor>) -> bool {
    actor.map(Actor::is_jobseeker).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn employer() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::Employer,
        }
    }

    fn seeker() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::Jobseeker,
        }
    }

    fn job_owned_by(owner: &Actor) -> Job {
        Job {
            id: Uuid::new_v4(),
            company_id: owner.id,
            title: "QA Engineer".into(),
            description: String::new(),
            requirements: String::new(),
            location: None,
            category: None,
            job_type: None,
            salary_min: Decimal::from(1),
            salary_max: Decimal::from(2),
            is_closed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn application(job: &Job, applicant: &Actor) -> Application {
        Application {
            id: Uuid::new_v4(),
            job_id: job.id,
            applicant_id: applicant.id,
            resume: None,
            status: ApplicationStatus::Applied,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn missing_actor_is_denied_everything() {
        let owner = employer();
        let job = job_owned_by(&owner);
        let app = application(&job, &seeker());
        assert!(!can_post_job(None));
        assert!(!can_mutate_job(None, &job));
        assert!(!can_apply(None, &job, false));
        assert!(!can_view_application(None, &app, Some(&job)));
        assert!(!can_update_application_status(None, &app, &job));
        assert!(!can_manage_bookmarks(None));
    }

    #[test]
    fn only_employers_post_jobs() {
        assert!(can_post_job(Some(&employer())));
        assert!(!can_post_job(Some(&seeker())));
    }

    #[test]
    fn only_the_owner_mutates_a_job() {
        let owner = employer();
        let job = job_owned_by(&owner);
        assert!(can_mutate_job(Some(&owner), &job));
        assert!(!can_mutate_job(Some(&employer()), &job));

        let impostor = Actor {
            id: owner.id,
            role: Role::Jobseeker,
        };
        assert!(!can_mutate_job(Some(&impostor), &job));
    }

    #[test]
    fn apply_requires_open_job_seeker_and_no_prior_application() {
        let job = job_owned_by(&employer());
        let candidate = seeker();
        assert!(can_apply(Some(&candidate), &job, false));
        assert!(!can_apply(Some(&candidate), &job, true));
        assert!(!can_apply(Some(&employer()), &job, false));

        let mut closed = job.clone();
        closed.is_closed = true;
        assert!(!can_apply(Some(&candidate), &closed, false));
    }

    #[test]
    fn exactly_applicant_and_owner_can_view() {
        let owner = employer();
        let job = job_owned_by(&owner);
        let applicant = seeker();
        let app = application(&job, &applicant);

        assert!(can_view_application(Some(&applicant), &app, Some(&job)));
        assert!(can_view_application(Some(&owner), &app, Some(&job)));
        assert!(!can_view_application(Some(&seeker()), &app, Some(&job)));
        assert!(!can_view_application(Some(&employer()), &app, Some(&job)));
        assert!(can_view_application(Some(&applicant), &app, None));
        assert!(!can_view_application(Some(&owner), &app, None));
    }

    #[test]
    fn only_owner_updates_status() {
        let owner = employer();
        let job = job_owned_by(&owner);
        let applicant = seeker();
        let app = application(&job, &applicant);

        assert!(can_update_application_status(Some(&owner), &app, &job));
        assert!(!can_update_application_status(Some(&applicant), &app, &job));
        assert!(!can_update_application_status(Some(&employer()), &app, &job));

        let other_job = job_owned_by(&owner);
        assert!(!can_update_application_status(Some(&owner), &app, &other_job));
    }

    #[test]
    fn bookmarks_are_for_job_seekers() {
        assert!(can_manage_bookmarks(Some(&seeker())));
        assert!(!can_manage_bookmarks(Some(&employer())));
    }
}
