// Per-session state
//
// One shell process owns exactly one of these for its whole lifetime. The
// binary rebuilds it from exported shell variables on every hook invocation;
// teardown is implicit when the shell exits.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::client::HistoryService;
use crate::config::{ENV_HISTORY_ID, ENV_LAST_MTIME, ENV_SESSION};
use crate::error::Result;

/// Process-wide mutable state for one shell session
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    /// Opaque session id, generated once at shell start
    pub session_id: Option<String>,
    /// In-flight history record id, live only between preexec and postexec
    pub history_id: Option<String>,
    /// Last observed modification time of the history store
    pub last_seen_mtime: Option<SystemTime>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild state from the environment exported by the hook scripts
    pub fn from_env() -> Self {
        let session_id = std::env::var(ENV_SESSION).ok().filter(|s| !s.is_empty());
        let history_id = std::env::var(ENV_HISTORY_ID).ok().filter(|s| !s.is_empty());
        let last_seen_mtime = std::env::var(ENV_LAST_MTIME)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(|secs| UNIX_EPOCH + Duration::from_secs(secs));

        Self {
            session_id,
            history_id,
            last_seen_mtime,
        }
    }

    /// The freshness mark as unix seconds, for re-export to the shell
    pub fn mark_unix_seconds(&self) -> Option<u64> {
        self.last_seen_mtime
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
    }
}

/// Initialize the session: fresh id from the service, stale record id dropped.
///
/// A history id inherited from a parent shell's environment must not leak
/// into this session, so it is cleared even when the service call fails.
pub fn begin_session(state: &mut SessionState, service: &dyn HistoryService) -> Result<()> {
    state.history_id = None;
    let id = service.generate_session_id()?;
    state.session_id = Some(id);
    Ok(())
}
