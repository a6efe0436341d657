//! The remote light backend abstraction.
//!
//! `RemoteLights` is the seam between the panel loop and the backend. The
//! two required methods map one-to-one onto the backend's HTTP API; polling
//! and toggling are provided on top of them so every implementation shares
//! the same reconciliation rules.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use lightdeck_core::{LightId, LightSpec, LightState};
use serde::{Deserialize, Serialize};

use crate::error::{RemoteError, Result};

// ============================================================================
// Commands and policies
// ============================================================================

/// A service call on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `turn_on`
    TurnOn,
    /// `turn_off`
    TurnOff,
}

impl Command {
    /// The command that flips a light currently in `state`.
    ///
    /// Only a light known to be on is turned off.
    #[must_use]
    pub const fn toggling(state: LightState) -> Self {
        match state {
            LightState::On => Self::TurnOff,
            LightState::Off | LightState::Unknown => Self::TurnOn,
        }
    }

    /// The backend service name.
    #[must_use]
    pub const fn service(self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.service())
    }
}

/// How a toggle decides between `turn_on` and `turn_off`.
///
/// The tile flips immediately from its optimistic state, but the backend
/// may know better. The two policies pick which source wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TogglePolicy {
    /// Re-read the light from the backend and send the opposite of what it
    /// reports. A failed read counts as `Unknown`, so the light is turned on.
    #[default]
    RemoteRead,

    /// Send the opposite of the state the tile showed before the tap.
    TapIntent,
}

impl TogglePolicy {
    /// The policy name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RemoteRead => "remote-read",
            Self::TapIntent => "tap-intent",
        }
    }
}

impl fmt::Display for TogglePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TogglePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "remote-read" => Ok(Self::RemoteRead),
            "tap-intent" => Ok(Self::TapIntent),
            other => Err(format!(
                "unknown toggle policy '{other}' (expected remote-read or tap-intent)"
            )),
        }
    }
}

// ============================================================================
// Poll outcomes
// ============================================================================

/// The result of reading one light, classified for the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The backend reported a state.
    Reported(LightState),
    /// The backend answered with an error status or an unreadable body.
    Rejected,
    /// No response: connection refused, timeout, or no backend configured.
    Unreachable,
}

impl PollOutcome {
    /// Classify the result of a state read.
    #[must_use]
    pub fn classify(result: &Result<LightState>) -> Self {
        match result {
            Ok(state) => Self::Reported(*state),
            Err(err) if err.is_connection_failure() => Self::Unreachable,
            Err(_) => Self::Rejected,
        }
    }
}

// ============================================================================
// RemoteLights
// ============================================================================

/// Client for the remote light backend.
#[async_trait]
pub trait RemoteLights: Send + Sync {
    /// Read the current state of one light.
    ///
    /// A response without a string `state` field yields `Unknown`.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, timeout, an HTTP error status
    /// or a body that is not JSON.
    async fn fetch_state(&self, id: &LightId) -> Result<LightState>;

    /// Invoke `command` on one light.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, timeout or an HTTP error
    /// status.
    async fn send_command(&self, id: &LightId, command: Command) -> Result<()>;

    /// Read one light and classify the outcome.
    async fn poll(&self, id: &LightId) -> PollOutcome {
        let result = self.fetch_state(id).await;
        if let Err(err) = &result {
            if err.is_connection_failure() {
                tracing::warn!(entity_id = %id, error = %err, "Light poll failed, keeping last state");
            } else {
                tracing::warn!(entity_id = %id, error = %err, "Light poll rejected, marking unknown");
            }
        }
        PollOutcome::classify(&result)
    }

    /// Read every light in order, one request at a time.
    ///
    /// Each light's outcome is independent of the others. The returned
    /// vector lines up with `lights`.
    async fn poll_all(&self, lights: &[LightSpec]) -> Vec<PollOutcome> {
        let mut outcomes = Vec::with_capacity(lights.len());
        for light in lights {
            outcomes.push(self.poll(&light.id).await);
        }
        outcomes
    }

    /// Flip one light on the backend.
    ///
    /// `shown` is the state the tile displayed before the tap. Whether it is
    /// used depends on `policy`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be delivered.
    async fn toggle(
        &self,
        id: &LightId,
        shown: LightState,
        policy: TogglePolicy,
    ) -> Result<Command> {
        let basis = match policy {
            TogglePolicy::TapIntent => shown,
            TogglePolicy::RemoteRead => match self.fetch_state(id).await {
                Ok(state) => state,
                Err(err) => {
                    tracing::warn!(entity_id = %id, error = %err, "Toggle pre-read failed, assuming unknown");
                    LightState::Unknown
                }
            },
        };

        let command = Command::toggling(basis);
        self.send_command(id, command).await?;
        tracing::info!(entity_id = %id, command = %command, policy = %policy, "Toggled light");
        Ok(command)
    }
}

// ============================================================================
// NoopRemoteClient
// ============================================================================

/// A client for when no backend is configured.
///
/// Every call fails with `NotConfigured`, which the state machine treats
/// like a connection failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRemoteClient;

impl NoopRemoteClient {
    /// Create a new no-op client.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RemoteLights for NoopRemoteClient {
    async fn fetch_state(&self, id: &LightId) -> Result<LightState> {
        tracing::debug!(entity_id = %id, "NoopRemoteClient: fetch_state called but no backend configured");
        Err(RemoteError::NotConfigured)
    }

    async fn send_command(&self, id: &LightId, command: Command) -> Result<()> {
        tracing::debug!(
            entity_id = %id,
            command = %command,
            "NoopRemoteClient: send_command called but no backend configured"
        );
        Err(RemoteError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_command() {
        assert_eq!(Command::toggling(LightState::On), Command::TurnOff);
        assert_eq!(Command::toggling(LightState::Off), Command::TurnOn);
        assert_eq!(Command::toggling(LightState::Unknown), Command::TurnOn);
        assert_eq!(Command::TurnOff.service(), "turn_off");
    }

    #[test]
    fn policy_parse_and_display() {
        assert_eq!("remote-read".parse::<TogglePolicy>(), Ok(TogglePolicy::RemoteRead));
        assert_eq!("tap-intent".parse::<TogglePolicy>(), Ok(TogglePolicy::TapIntent));
        assert!("sideways".parse::<TogglePolicy>().is_err());
        assert_eq!(TogglePolicy::default().to_string(), "remote-read");
    }

    #[test]
    fn classify_outcomes() {
        assert_eq!(
            PollOutcome::classify(&Ok(LightState::On)),
            PollOutcome::Reported(LightState::On)
        );
        assert_eq!(
            PollOutcome::classify(&Err(RemoteError::Timeout)),
            PollOutcome::Unreachable
        );
        assert_eq!(
            PollOutcome::classify(&Err(RemoteError::Status { status: 500 })),
            PollOutcome::Rejected
        );
        assert_eq!(
            PollOutcome::classify(&Err(RemoteError::Decode("x".into()))),
            PollOutcome::Rejected
        );
    }

    #[tokio::test]
    async fn noop_client_is_unreachable() {
        let client = NoopRemoteClient::new();
        let id = LightId::new("light.kitchen");
        assert_eq!(client.poll(&id).await, PollOutcome::Unreachable);
        assert!(client.toggle(&id, LightState::On, TogglePolicy::TapIntent).await.is_err());
    }
}
