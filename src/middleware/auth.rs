use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::models::user::Role;
use crate::services::authorization::Actor;
use crate::utils::token::decode_token;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

impl Claims {
    pub fn actor(&self) -> Option<Actor> {
        let id = Uuid::parse_str(&self.sub).ok()?;
        let role: Role = self.role.as_deref()?.parse().ok()?;
        Some(Actor { id, role })
    }
}

fn unauthorized(code: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

/// Rejects requests without a valid bearer token before any handler runs.
/// On success the decoded `Claims` and the `Actor` are stored in request extensions.
pub async fn require_bearer_auth(mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let config = crate::config::get_config();
    match decode_token(token.trim(), &config.jwt_secret) {
        Ok(claims) => {
            let Some(actor) = claims.actor() else {
                tracing::warn!(sub = %claims.sub, "token carries unusable subject or role");
                return unauthorized("invalid_token");
            };
            req.extensions_mut().insert(claims);
            req.extensions_mut().insert(actor);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("bearer token rejected: {}", e);
            unauthorized("invalid_token")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_resolve_to_actor() {
        let id = Uuid::new_v4();
        let claims = Claims {
            sub: id.to_string(),
            exp: 0,
            role: Some("jobseeker".into()),
        };
        let actor = claims.actor().unwrap();
        assert_eq!(actor.id, id);
        assert_eq!(actor.role, Role::Jobseeker);
    }

    #[test]
    fn claims_without_role_have_no_actor() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: 0,
            role: None,
        };
        assert!(claims.actor().is_none());

        let claims = Claims {
            sub: "not-a-uuid".into(),
            exp: 0,
            role: Some("employer".into()),
        };
        assert!(claims.actor().is_none());
    }
}
