//! Scriptable in-memory backend for tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use lightdeck_core::{LightId, LightState, RemoteSettings};
use parking_lot::Mutex;

use crate::client::{Command, RemoteLights};
use crate::connector::RemoteConnector;
use crate::error::{RemoteError, Result};

#[derive(Debug, Clone, Copy)]
enum Reply {
    State(LightState),
    Status(u16),
    Unreachable,
}

#[derive(Debug, Default)]
struct Inner {
    replies: HashMap<LightId, Reply>,
    fetches: Vec<LightId>,
    commands: Vec<(LightId, Command)>,
    fail_commands: bool,
}

/// A fake backend. Clones share the same script and recordings.
///
/// Lights without a scripted reply are unreachable.
#[derive(Debug, Clone, Default)]
pub struct FakeRemote {
    inner: Arc<Mutex<Inner>>,
}

impl FakeRemote {
    /// Create a fake with no scripted lights.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `state` for `id`.
    pub fn set_state(&self, id: &str, state: LightState) {
        self.inner.lock().replies.insert(LightId::new(id), Reply::State(state));
    }

    /// Answer reads of `id` with an HTTP error status.
    pub fn set_status(&self, id: &str, status: u16) {
        self.inner.lock().replies.insert(LightId::new(id), Reply::Status(status));
    }

    /// Make reads of `id` fail as if the backend were down.
    pub fn set_unreachable(&self, id: &str) {
        self.inner.lock().replies.insert(LightId::new(id), Reply::Unreachable);
    }

    /// Make every command fail with a connection error.
    pub fn fail_commands(&self, fail: bool) {
        self.inner.lock().fail_commands = fail;
    }

    /// Every light read so far, in order.
    #[must_use]
    pub fn fetches(&self) -> Vec<LightId> {
        self.inner.lock().fetches.clone()
    }

    /// Every command sent so far, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<(LightId, Command)> {
        self.inner.lock().commands.clone()
    }

    /// Forget recorded reads and commands.
    pub fn clear_history(&self) {
        let mut inner = self.inner.lock();
        inner.fetches.clear();
        inner.commands.clear();
    }
}

#[async_trait]
impl RemoteLights for FakeRemote {
    async fn fetch_state(&self, id: &LightId) -> Result<LightState> {
        let mut inner = self.inner.lock();
        inner.fetches.push(id.clone());
        match inner.replies.get(id).copied().unwrap_or(Reply::Unreachable) {
            Reply::State(state) => Ok(state),
            Reply::Status(status) => Err(RemoteError::Status { status }),
            Reply::Unreachable => Err(RemoteError::Transport("connection refused".into())),
        }
    }

    async fn send_command(&self, id: &LightId, command: Command) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.fail_commands {
            return Err(RemoteError::Transport("connection refused".into()));
        }
        inner.commands.push((id.clone(), command));
        Ok(())
    }
}

/// Connector that hands out a shared `FakeRemote` and records the settings
/// it was asked to connect with.
#[derive(Debug, Clone, Default)]
pub struct FakeConnector {
    remote: FakeRemote,
    connections: Arc<Mutex<Vec<RemoteSettings>>>,
}

impl FakeConnector {
    /// Create a connector handing out `remote`.
    #[must_use]
    pub fn new(remote: FakeRemote) -> Self {
        Self {
            remote,
            connections: Arc::default(),
        }
    }

    /// Settings passed to every `connect` call so far.
    #[must_use]
    pub fn connections(&self) -> Vec<RemoteSettings> {
        self.connections.lock().clone()
    }
}

impl RemoteConnector for FakeConnector {
    fn connect(&self, settings: &RemoteSettings) -> Arc<dyn RemoteLights> {
        self.connections.lock().push(settings.clone());
        Arc::new(self.remote.clone())
    }
}
