use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::Store;
use crate::dto::auth_dto::{LoginPayload, RegisterPayload};
use crate::error::{Error, Result};
use crate::models::user::{NewUser, ProfileChanges, User};
use crate::services::authorization::Actor;
use crate::utils::{crypto, token};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
    jwt_secret: String,
    jwt_ttl_days: i64,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, jwt_secret: String, jwt_ttl_days: i64) -> Self {
        Self {
            store,
            jwt_secret,
            jwt_ttl_days,
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String> {
        Ok(token::issue_token(
            user.id,
            user.role,
            &self.jwt_secret,
            self.jwt_ttl_days,
        )?)
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<(User, String)> {
        let email = payload.email.trim().to_string();
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(Error::Conflict("User already exists".to_string()));
        }

        let password_hash = crypto::hash_password(&payload.password)?;
        let user = self
            .store
            .insert_user(NewUser {
                name: payload.name.trim().to_string(),
                email,
                password_hash,
                role: payload.role,
                avatar: payload.avatar.filter(|a| !a.trim().is_empty()),
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "user registered");
        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<(User, String)> {
        let invalid = || Error::Unauthorized("Invalid email or password".to_string());

        let user = self
            .store
            .find_user_by_email(payload.email.trim())
            .await?
            .ok_or_else(invalid)?;
        if !crypto::verify_password(&payload.password, &user.password_hash)? {
            return Err(invalid());
        }

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    pub async fn me(&self, actor: &Actor) -> Result<User> {
        self.store
            .find_user(actor.id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(&self, actor: &Actor, changes: ProfileChanges) -> Result<User> {
        let user = self.store.update_profile(actor.id, changes).await?;
        info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    pub async fn delete_resume(&self, actor: &Actor) -> Result<User> {
        let user = self.me(actor).await?;
        if user.resume.as_deref().map(str::trim).unwrap_or_default().is_empty() {
            return Err(Error::BadRequest("No resume to delete".to_string()));
        }
        self.store.clear_resume(actor.id).await
    }

    pub async fn public_profile(&self, id: Uuid) -> Result<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }
}
