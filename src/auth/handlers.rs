use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::auth::dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest};
use crate::auth::extractors::{request_token, AuthUser, SESSION_COOKIE};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::User;
use crate::auth::session::Session;
use crate::error::ApiError;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn session_cookie(token: &str, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(max_age)
        .path("/")
        .build()
}

fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .build()
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("password too short".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        &payload.email,
        &payload.name,
        None,
        Some(hash.as_str()),
    )
    .await?;

    let ttl = state.config.session_ttl();
    let session = Session::create(&state.db, user.id, ttl).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        jar.add(session_cookie(&session.token, ttl)),
        Json(AuthResponse {
            session_token: session.token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    // One generic failure for unknown email, passwordless account and wrong
    // password alike.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::InvalidCredentials
        })?;

    let Some(hash) = user.password_hash.as_deref() else {
        warn!(user_id = %user.id, "login against passwordless account");
        return Err(ApiError::InvalidCredentials);
    };
    if !verify_password(&payload.password, hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let ttl = state.config.session_ttl();
    let session = Session::create(&state.db, user.id, ttl).await?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        jar.add(session_cookie(&session.token, ttl)),
        Json(AuthResponse {
            session_token: session.token,
            user: user.into(),
        }),
    ))
}

/// Exchange an external identity-provider session id for a local session.
/// Known emails get their name/picture refreshed; unknown emails become new
/// passwordless accounts.
#[instrument(skip(state, jar, headers))]
pub async fn exchange_session(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let session_id = headers
        .get("X-Session-ID")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Validation("missing X-Session-ID header".into()))?;

    let ext = state
        .identity
        .fetch_session(session_id)
        .await
        .map_err(ApiError::Upstream)?
        .ok_or(ApiError::Unauthenticated)?;

    let user = match User::find_by_email(&state.db, &ext.email).await? {
        Some(existing) => {
            User::sync_identity(&state.db, existing.id, &ext.name, ext.picture.as_deref()).await?
        }
        None => User::create(&state.db, &ext.email, &ext.name, ext.picture.as_deref(), None).await?,
    };

    let ttl = state.config.session_ttl();
    let session = Session::create_with_token(&state.db, user.id, &ext.session_token, ttl).await?;

    info!(user_id = %user.id, "external session exchanged");
    Ok((
        jar.add(session_cookie(&session.token, ttl)),
        Json(AuthResponse {
            session_token: session.token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip_all)]
pub async fn me(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(user.into())
}

#[instrument(skip(state, jar, headers))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    if let Some(token) = request_token(&jar, &headers) {
        Session::revoke(&state.db, &token).await?;
    }
    Ok((
        jar.remove(expired_session_cookie()),
        Json(json!({ "message": "logged out" })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("jean@dupont.fr"));
        assert!(is_valid_email("a+b@c.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two words@example.com"));
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("tok", time::Duration::days(7));
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
    }
}
