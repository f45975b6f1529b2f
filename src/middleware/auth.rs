use axum::{extract::FromRequestParts, http::header};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

/// A live session; extracting it gates a handler behind sign-in.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session_id: Uuid,
    pub account_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

pub fn bearer_token(value: &str) -> Option<&str> {
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = bearer_token(auth_str)
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;

        state
            .sessions()
            .current_session(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Session expired or signed out".into()))
    }
}
