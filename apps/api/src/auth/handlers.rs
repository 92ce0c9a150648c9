//! Axum route handlers for registration, login and logout.

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::password::{dummy_hash, hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::auth::session::{
    hash_token, open_session, removal_cookie, session_cookie, token_from_headers,
};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::user::User;
use crate::state::AppState;
use crate::validation::{ensure_present, non_blank};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    /// Raw session token, for clients that prefer a bearer header to the cookie.
    pub token: String,
}

fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(AppError::Validation("email must be a valid address".to_string()))
    }
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>), AppError> {
    ensure_present(&[("email", &req.email), ("password", &req.password)])?;
    let email = normalize_email(req.email.as_deref().unwrap_or_default())?;
    let password = req.password.unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    // Argon2 runs on the blocking pool.
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(anyhow::Error::from)?
        .map_err(anyhow::Error::from)?;

    let name = non_blank(req.name);
    let user = state
        .store
        .create_user(&email, name.as_deref(), &password_hash)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("An account with this email already exists".to_string())
        })?;

    let token = open_session(state.store.as_ref(), user.id, state.config.session_ttl_hours).await?;
    info!("Registered user {}", user.id);

    let jar = jar.add(session_cookie(
        token.clone(),
        state.config.cookie_secure,
        state.config.session_ttl_hours,
    ));
    Ok((StatusCode::CREATED, jar, Json(SessionResponse { user, token })))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), AppError> {
    ensure_present(&[("email", &req.email), ("password", &req.password)])?;
    let email = req.email.unwrap_or_default().trim().to_lowercase();
    let password = req.password.unwrap_or_default();

    let user = state.store.find_user_by_email(&email).await?;

    // Unknown emails still pay for one verification.
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let matches = tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&password, &hash),
        None => dummy_hash()
            .and_then(|hash| verify_password(&password, hash))
            .map(|_| false),
    })
    .await
    .map_err(anyhow::Error::from)?
    .map_err(anyhow::Error::from)?;

    let user = match user {
        Some(user) if matches => user,
        Some(user) => {
            warn!("Failed login for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }
        None => {
            warn!("Login attempt for unknown email");
            return Err(AppError::InvalidCredentials);
        }
    };

    let token = open_session(state.store.as_ref(), user.id, state.config.session_ttl_hours).await?;
    info!("User {} signed in", user.id);

    let jar = jar.add(session_cookie(
        token.clone(),
        state.config.cookie_secure,
        state.config.session_ttl_hours,
    ));
    Ok((jar, Json(SessionResponse { user, token })))
}

/// POST /api/auth/logout
///
/// Idempotent: succeeds whether or not the presented token is still valid.
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar), AppError> {
    if let Some(token) = token_from_headers(&headers) {
        state.store.delete_session(&hash_token(&token)).await?;
    }
    Ok((StatusCode::NO_CONTENT, jar.remove(removal_cookie())))
}

/// GET /api/auth/session
pub async fn handle_session(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}
