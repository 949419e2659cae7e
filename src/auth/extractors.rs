use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::repo_types::User;
use crate::auth::session::Session;
use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session_token";

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
}

/// Token carried by the request: the session cookie wins over a bearer header.
pub(crate) fn request_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }
    bearer_token(headers).map(str::to_string)
}

/// Resolves the inbound request to an authenticated user.
///
/// Read-only: the session is neither refreshed nor rotated. Handlers that are
/// public by design simply omit this extractor.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = request_token(&jar, &parts.headers).ok_or(ApiError::Unauthenticated)?;

        let session = Session::resolve(&state.db, &token)
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        let user = User::find_by_id(&state.db, session.user_id)
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn cookie_wins_over_bearer_header() {
        let headers = headers(&[
            ("cookie", "session_token=from-cookie"),
            ("authorization", "Bearer from-header"),
        ]);
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(
            request_token(&jar, &headers).as_deref(),
            Some("from-cookie")
        );
    }

    #[test]
    fn bearer_header_used_when_cookie_absent() {
        let headers = headers(&[("authorization", "Bearer from-header")]);
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(
            request_token(&jar, &headers).as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn lowercase_bearer_scheme_accepted() {
        let headers = headers(&[("authorization", "bearer tok")]);
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(request_token(&jar, &headers).as_deref(), Some("tok"));
    }

    #[test]
    fn no_credentials_yields_none() {
        let headers = headers(&[]);
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(request_token(&jar, &headers), None);
    }

    #[test]
    fn other_auth_schemes_are_ignored() {
        let headers = headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(request_token(&jar, &headers), None);
    }
}
