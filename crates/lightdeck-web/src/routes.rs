//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{config, pages, session};
use crate::state::WebState;

/// Create the web router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /` - Login page (redirects to `/settings` when logged in)
/// - `POST /login` - Check password, set session cookie
/// - `POST /logout` - Drop session, clear cookie
///
/// ## Authenticated
/// - `GET /settings` - Configuration editor (redirects to `/` otherwise)
/// - `GET /api/config` - Current configuration
/// - `POST /api/config` - Replace configuration and reload the panel
pub fn create_router(state: WebState) -> Router {
    // Extract config values before moving state
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    let state = Arc::new(state);

    Router::new()
        // Pages
        .route("/", get(pages::index))
        .route("/settings", get(pages::settings))
        // Session
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
        // Configuration
        .route(
            "/api/config",
            get(config::get_config).post(config::put_config),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

/// Serve `state` on `listener` until `shutdown` completes.
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns an error if accepting connections fails.
pub async fn serve<F>(listener: TcpListener, state: WebState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Web server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Web server stopped");
    Ok(())
}
