use argon2::password_hash::rand_core::{OsRng, RngCore};
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::store::TrackerStore;

pub const SESSION_COOKIE: &str = "tracker_session";

const TOKEN_BYTES: usize = 32;

/// The caller behind a valid, unexpired session.
///
/// Add it as a handler argument to make the route require authentication;
/// extraction fails with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub token_hash: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = token_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        let token_hash = hash_token(&token);

        let user = state
            .store
            .find_session_user(&token_hash, Utc::now())
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser { user, token_hash })
    }
}

/// Reads the session token from the cookie, falling back to a bearer header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// 256 bits from the OS RNG, hex encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Creates a session row for `user_id` and returns the raw token.
///
/// Expired sessions are swept first, so the table stays bounded by the live ones.
pub async fn open_session(
    store: &dyn TrackerStore,
    user_id: Uuid,
    ttl_hours: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let purged = store.delete_expired_sessions(now).await?;
    if purged > 0 {
        debug!("Purged {purged} expired sessions");
    }

    let token = generate_token();
    let expires_at = now + Duration::hours(ttl_hours);
    store
        .create_session(&hash_token(&token), user_id, expires_at)
        .await?;
    Ok(token)
}

pub fn session_cookie(token: String, secure: bool, ttl_hours: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::hours(ttl_hours))
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}
