//! lightdeck - touch-panel controller for remote lights.
//!
//! The process runs two threads that share one application context:
//!
//! ```text
//! ┌──────────────────────────────┐        ┌──────────────────────────────┐
//! │ main thread                  │        │ web thread                   │
//! │ current-thread runtime       │        │ multi-thread runtime         │
//! │                              │ reload │                              │
//! │ Panel loop ◄─────────────────┼────────┼── MutationService            │
//! │  (registry, surface, remote) │        │  (axum router, sessions)     │
//! └──────────────────────────────┘        └──────────────────────────────┘
//! ```
//!
//! On ctrl-c or SIGTERM the panel loop stops first, then the web server is
//! shut down gracefully and its thread joined.

mod cli;
mod context;
mod surface;

use std::io::BufRead;
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Context as _;
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lightdeck_panel::Panel;
use lightdeck_remote::HttpConnector;
use lightdeck_store::{ConfigStore, JsonFileStore};
use lightdeck_web::WebState;

use crate::cli::{Cli, Command, HashArgs, RunArgs};
use crate::context::AppContext;
use crate::surface::{LogSurface, NullPointer};

fn main() -> anyhow::Result<()> {
    // Initialize tracing. Logs go to stderr so `hash-password` output stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lightdeck=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(&args),
        Command::HashPassword(args) => hash_password(&args),
    }
}

fn run(args: &RunArgs) -> anyhow::Result<()> {
    tracing::info!(
        config = %args.config.display(),
        listen = %args.listen,
        poll_interval_ms = args.poll_interval_ms,
        toggle_policy = %args.toggle_policy,
        "Starting lightdeck"
    );

    let store: Arc<dyn ConfigStore> = Arc::new(JsonFileStore::new(&args.config));
    let (context, reloads) =
        AppContext::load(store, args.web_config()).context("failed to load configuration")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let web = spawn_web(context.listen_addr(), context.web_state(), shutdown_rx);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build panel runtime")?;

    let initial = context.initial_request();
    let connector = HttpConnector::new(args.remote_timeouts());
    let settings = args.panel_settings();
    runtime.block_on(async move {
        let panel = Panel::new(
            initial,
            reloads,
            LogSurface::new(),
            NullPointer,
            connector,
            settings,
        );
        panel.run(shutdown_signal()).await;
    });

    // No receiver left means the web thread already exited.
    let _ = shutdown_tx.send(true);
    if let Some(handle) = web {
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "Web server failed"),
            Err(_) => tracing::error!("Web server thread panicked"),
        }
    }

    drop(context);
    tracing::info!("lightdeck stopped");
    Ok(())
}

/// Bind the web listener and start serving on a dedicated thread.
///
/// A failure here leaves the panel running without the web UI.
fn spawn_web(
    listen_addr: &str,
    state: WebState,
    shutdown: watch::Receiver<bool>,
) -> Option<JoinHandle<anyhow::Result<()>>> {
    let listener = match std::net::TcpListener::bind(listen_addr)
        .and_then(|listener| listener.set_nonblocking(true).map(|()| listener))
    {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(listen_addr, error = %e, "Failed to bind web server, running without web UI");
            return None;
        }
    };

    match std::thread::Builder::new()
        .name("lightdeck-web".to_string())
        .spawn(move || serve_web(listener, state, shutdown))
    {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!(error = %e, "Failed to spawn web server thread, running without web UI");
            None
        }
    }
}

fn serve_web(
    listener: std::net::TcpListener,
    state: WebState,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("lightdeck-web-worker")
        .enable_all()
        .build()
        .context("failed to build web runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::from_std(listener)?;
        lightdeck_web::serve(listener, state, async move {
            // Sender dropped counts as shutdown too.
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await
    })?;

    Ok(())
}

/// Completes on ctrl-c or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutdown requested");
}

fn hash_password(args: &HashArgs) -> anyhow::Result<()> {
    let mut password = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut password)
        .context("failed to read password from stdin")?;

    let password = password.trim_end_matches(['\r', '\n']);
    anyhow::ensure!(!password.is_empty(), "password must not be empty");

    let hash = lightdeck_auth::hash_password(password, args.cost)?;
    println!("{hash}");
    Ok(())
}
