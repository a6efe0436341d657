//! Login and logout endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;

use lightdeck_auth::AuthError;

use crate::auth::{clear_session_cookie, session_cookie, session_token};
use crate::error::ApiError;
use crate::handlers::pages::login_page;
use crate::state::WebState;

/// Login form body.
#[derive(Deserialize)]
pub struct LoginForm {
    /// The operator password.
    #[serde(default)]
    pub password: String,
}

/// Check the operator password and open a session.
///
/// `POST /login`
///
/// A wrong password re-serves the login page with 401 once the failure
/// delay has elapsed.
pub async fn login(State(state): State<Arc<WebState>>, Form(form): Form<LoginForm>) -> Response {
    let stored_hash = state.mutations.current().web_credential_hash.clone();

    match state.auth.login(&form.password, &stored_hash).await {
        Ok(token) => (
            StatusCode::SEE_OTHER,
            [
                (LOCATION, "/settings".to_string()),
                (SET_COOKIE, session_cookie(&token)),
            ],
        )
            .into_response(),
        Err(AuthError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            login_page(Some("Incorrect password.")),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// End the caller's session, if any, and clear the cookie.
///
/// `POST /logout`
pub async fn logout(State(state): State<Arc<WebState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.auth.logout(&token);
    }

    (
        [(SET_COOKIE, clear_session_cookie())],
        Json(json!({ "ok": true })),
    )
        .into_response()
}
