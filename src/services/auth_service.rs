use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    dto::auth::{
        ChangePasswordRequest, Claims, SessionInfo, SessionToken, SignInRequest, SignUpRequest,
    },
    entity::accounts,
    error::{AppError, AppResult},
    middleware::auth::CurrentSession,
    models::{Account, AccountDraft, Session, SessionDraft, UserProfile, UserProfileDraft},
    response::{ApiResponse, Meta},
    state::AppState,
    store::{DynRepository, Filter, Select, Store, Value},
    validation::{self, ValidationError},
};

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub jwt_secret: String,
    pub ttl: Duration,
}

/// Credential-based sessions over the `accounts` and `sessions` tables.
#[derive(Clone)]
pub struct SessionService {
    accounts: DynRepository<Account>,
    sessions: DynRepository<Session>,
    users: DynRepository<UserProfile>,
    settings: SessionSettings,
}

impl SessionService {
    pub fn new(store: &Store, settings: SessionSettings) -> Self {
        Self {
            accounts: store.accounts.clone(),
            sessions: store.sessions.clone(),
            users: store.users.clone(),
            settings,
        }
    }

    async fn account_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let rows = self
            .accounts
            .select(
                &Select::all()
                    .filter(Filter::Eq(accounts::Column::Email, Value::Text(email.to_string())))
                    .limit(1),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Creates the account, then provisions its row in `users`.
    pub async fn sign_up(&self, email: &str, password: &str) -> AppResult<UserProfile> {
        let email = normalize_email(email);
        validation::email(&email)?;
        validation::password(password)?;

        if self.account_by_email(&email).await?.is_some() {
            return Err(AppError::BadRequest("User already registered".into()));
        }

        let account = self
            .accounts
            .insert(&AccountDraft {
                email: email.clone(),
                password_hash: hash_password(password)?,
            })
            .await?;

        let profile = self
            .users
            .insert(&UserProfileDraft {
                email,
                user_id: account.id,
            })
            .await?;

        tracing::info!(account_id = %account.id, "account registered");
        Ok(profile)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<SessionToken> {
        let email = normalize_email(email);
        let invalid = || AppError::Unauthorized("Invalid login credentials".into());

        let account = self.account_by_email(&email).await?.ok_or_else(invalid)?;
        if !verify_password(password, &account.password_hash)? {
            return Err(invalid());
        }

        let expires_at = Utc::now() + self.settings.ttl;
        let session = self
            .sessions
            .insert(&SessionDraft {
                account_id: account.id,
                expires_at,
            })
            .await?;

        let claims = Claims {
            sub: account.id.to_string(),
            sid: session.id.to_string(),
            exp: expires_at.timestamp().max(0) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

        tracing::info!(account_id = %account.id, session_id = %session.id, "signed in");
        Ok(SessionToken {
            access_token: token,
            token_type: "bearer".into(),
            expires_at,
        })
    }

    pub async fn sign_out(&self, session: &CurrentSession) -> AppResult<()> {
        self.sessions.delete(session.session_id).await?;
        tracing::info!(session_id = %session.session_id, "signed out");
        Ok(())
    }

    /// Resolves a bearer token to a live session. Tokens that fail to decode,
    /// or whose session was revoked or has expired, resolve to `None`.
    pub async fn current_session(&self, token: &str) -> AppResult<Option<CurrentSession>> {
        let decoded = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(decoded) => decoded,
            Err(_) => return Ok(None),
        };
        let (Ok(account_id), Ok(session_id)) = (
            Uuid::parse_str(&decoded.claims.sub),
            Uuid::parse_str(&decoded.claims.sid),
        ) else {
            return Ok(None);
        };

        let Some(session) = self.sessions.find(session_id).await? else {
            return Ok(None);
        };
        if session.account_id != account_id || session.expires_at <= Utc::now() {
            return Ok(None);
        }
        let Some(account) = self.accounts.find(account_id).await? else {
            return Ok(None);
        };

        Ok(Some(CurrentSession {
            session_id,
            account_id,
            email: account.email,
            expires_at: session.expires_at,
        }))
    }

    pub async fn change_password(
        &self,
        session: &CurrentSession,
        password: &str,
        confirm_password: &str,
    ) -> AppResult<()> {
        validation::password(password)?;
        if password != confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }

        let account = self
            .accounts
            .find(session.account_id)
            .await?
            .ok_or(AppError::NotFound)?;
        self.accounts
            .update(
                account.id,
                &AccountDraft {
                    email: account.email,
                    password_hash: hash_password(password)?,
                },
            )
            .await?;

        tracing::info!(account_id = %session.account_id, "password changed");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn sign_up(
    state: &AppState,
    payload: SignUpRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    let profile = state
        .sessions()
        .sign_up(&payload.email, &payload.password)
        .await?;
    Ok(ApiResponse::success("User created", profile, None))
}

pub async fn sign_in(
    state: &AppState,
    payload: SignInRequest,
) -> AppResult<ApiResponse<SessionToken>> {
    let token = state
        .sessions()
        .sign_in(&payload.email, &payload.password)
        .await?;
    Ok(ApiResponse::success("Signed in", token, Some(Meta::empty())))
}

pub async fn sign_out(
    state: &AppState,
    session: &CurrentSession,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.sessions().sign_out(session).await?;
    Ok(ApiResponse::success(
        "Signed out",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub fn session_info(session: &CurrentSession) -> ApiResponse<SessionInfo> {
    ApiResponse::success(
        "Session",
        SessionInfo {
            account_id: session.account_id,
            email: session.email.clone(),
            expires_at: session.expires_at,
        },
        None,
    )
}

pub async fn change_password(
    state: &AppState,
    session: &CurrentSession,
    payload: ChangePasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state
        .sessions()
        .change_password(session, &payload.password, &payload.confirm_password)
        .await?;
    Ok(ApiResponse::success(
        "Password updated",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
