//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use lightdeck_auth::{SessionConfig, DEFAULT_HASH_COST};
use lightdeck_panel::PanelSettings;
use lightdeck_remote::{RemoteTimeouts, TogglePolicy};
use lightdeck_web::WebConfig;

/// Touch-panel controller for remote lights.
#[derive(Parser, Debug)]
#[command(name = "lightdeck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the panel and the operator web UI.
    Run(RunArgs),
    /// Read a password from stdin and print its bcrypt hash.
    HashPassword(HashArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Configuration file.
    #[arg(long, env = "LIGHTDECK_CONFIG", default_value = "/etc/ha_lights.conf")]
    pub config: PathBuf,

    /// Address the web UI listens on.
    #[arg(long, env = "LIGHTDECK_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Milliseconds between polls of every light.
    #[arg(long, default_value_t = 5000)]
    pub poll_interval_ms: u64,

    /// Minimum milliseconds between panel ticks.
    #[arg(long, default_value_t = 33)]
    pub frame_ms: u64,

    /// Seconds allowed to connect to the backend.
    #[arg(long, default_value_t = 5)]
    pub connect_timeout_secs: u64,

    /// Seconds allowed for a whole backend request.
    #[arg(long, default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// How a tap picks the command it sends (remote-read or tap-intent).
    #[arg(long, default_value = "remote-read")]
    pub toggle_policy: TogglePolicy,

    /// Maximum concurrent operator sessions.
    #[arg(long, default_value_t = 8)]
    pub session_capacity: usize,

    /// Seconds of inactivity before a session expires.
    #[arg(long, default_value_t = 3600)]
    pub session_timeout_secs: u64,

    /// Milliseconds every failed login is delayed by.
    #[arg(long, default_value_t = 1000)]
    pub login_delay_ms: u64,
}

impl RunArgs {
    pub fn panel_settings(&self) -> PanelSettings {
        PanelSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            frame: Duration::from_millis(self.frame_ms),
            toggle_policy: self.toggle_policy,
        }
    }

    pub fn remote_timeouts(&self) -> RemoteTimeouts {
        RemoteTimeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn web_config(&self) -> WebConfig {
        WebConfig {
            listen_addr: self.listen.clone(),
            sessions: SessionConfig {
                capacity: self.session_capacity,
                timeout_seconds: self.session_timeout_secs,
                failure_delay_ms: self.login_delay_ms,
            },
            ..WebConfig::default()
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct HashArgs {
    /// bcrypt cost factor.
    #[arg(long, default_value_t = DEFAULT_HASH_COST)]
    pub cost: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn run_defaults() {
        let Command::Run(args) = parse(&["lightdeck", "run"]).command else {
            panic!("expected run");
        };

        let panel = args.panel_settings();
        assert_eq!(panel, PanelSettings::default());

        let timeouts = args.remote_timeouts();
        assert_eq!(timeouts.connect, Duration::from_secs(5));
        assert_eq!(timeouts.request, Duration::from_secs(10));

        let web = args.web_config();
        assert_eq!(web.sessions.capacity, 8);
        assert_eq!(web.sessions.timeout_seconds, 3600);
        assert_eq!(web.sessions.failure_delay_ms, 1000);
        assert_eq!(web.max_body_bytes, 64 * 1024);
    }

    #[test]
    fn run_overrides() {
        let Command::Run(args) = parse(&[
            "lightdeck",
            "run",
            "--config",
            "/tmp/lights.json",
            "--listen",
            "127.0.0.1:9000",
            "--poll-interval-ms",
            "1000",
            "--toggle-policy",
            "tap-intent",
            "--session-capacity",
            "2",
        ])
        .command
        else {
            panic!("expected run");
        };

        assert_eq!(args.config, PathBuf::from("/tmp/lights.json"));
        assert_eq!(args.web_config().listen_addr, "127.0.0.1:9000");
        assert_eq!(args.web_config().sessions.capacity, 2);
        let panel = args.panel_settings();
        assert_eq!(panel.poll_interval, Duration::from_secs(1));
        assert_eq!(panel.toggle_policy, TogglePolicy::TapIntent);
    }

    #[test]
    fn unknown_toggle_policy_is_rejected() {
        let result = Cli::try_parse_from(["lightdeck", "run", "--toggle-policy", "guess"]);
        assert!(result.is_err());
    }

    #[test]
    fn hash_password_cost() {
        let Command::HashPassword(args) = parse(&["lightdeck", "hash-password", "--cost", "4"]).command
        else {
            panic!("expected hash-password");
        };
        assert_eq!(args.cost, 4);
    }
}
