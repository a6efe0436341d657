//! HTML pages.

use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::auth::Operator;

const LOGIN_PAGE: &str = include_str!("../../assets/login.html");
const SETTINGS_PAGE: &str = include_str!("../../assets/settings.html");

/// Render the login page, optionally with an error message.
#[must_use]
pub fn login_page(error: Option<&str>) -> Html<String> {
    let error = error
        .map(|message| format!("<p class=\"error\">{message}</p>"))
        .unwrap_or_default();
    Html(LOGIN_PAGE.replace("{{error}}", &error))
}

/// Serve the login page, or go straight to settings when logged in.
///
/// `GET /`
pub async fn index(operator: Option<Operator>) -> Response {
    match operator {
        Some(_) => Redirect::to("/settings").into_response(),
        None => login_page(None).into_response(),
    }
}

/// Serve the configuration editor.
///
/// `GET /settings`
pub async fn settings(operator: Option<Operator>) -> Response {
    match operator {
        Some(_) => Html(SETTINGS_PAGE).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_error_slot() {
        assert!(!login_page(None).0.contains("{{error}}"));
        assert!(login_page(Some("Incorrect password.")).0.contains("Incorrect password."));
    }
}
