//! Session cookie handling and the `Operator` extractor.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use lightdeck_core::SessionToken;

use crate::error::ApiError;
use crate::state::WebState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// An operator with a live session.
///
/// This extractor reads the `session` cookie and validates it against the
/// session table, refreshing the session on success. Page handlers take
/// `Option<Operator>` to redirect instead of failing.
#[derive(Debug, Clone)]
pub struct Operator {
    /// The validated session token.
    pub token: SessionToken,
}

#[async_trait]
impl FromRequestParts<Arc<WebState>> for Operator {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<WebState>,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(ApiError::Unauthorized)?;

        if state.auth.validate(&token) {
            Ok(Self { token })
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

/// Extract the session token from the request's `Cookie` headers.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .find_map(|value| SessionToken::from_hex(value).ok())
}

/// `Set-Cookie` value that installs `token`.
#[must_use]
pub fn session_cookie(token: &SessionToken) -> String {
    format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Strict",
        token.to_hex()
    )
}

/// `Set-Cookie` value that deletes the session cookie.
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; Max-Age=0")
}
