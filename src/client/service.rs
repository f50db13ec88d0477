// The process-invocation contract with the external history service

use std::path::Path;

use crate::core::searcher::KeymapMode;
use crate::error::Result;

/// The narrow contract this layer relies on.
///
/// Every method maps to one invocation of the external service binary.
/// Implementations must never panic on service failure; errors are surfaced
/// as `HookError::Service` and treated by callers as "feature disabled for
/// this call".
pub trait HistoryService {
    /// Obtain a fresh opaque session id. Blocking, called once at shell start.
    fn generate_session_id(&self) -> Result<String>;

    /// Start a history record for `command`, returning its opaque id.
    /// Blocking; runs between the user hitting enter and the command starting.
    fn start_record(&self, command: &str) -> Result<String>;

    /// End a history record with the command's exit status.
    ///
    /// Fire-and-forget: implementations must not block on the service and the
    /// outcome is unobserved. A slow service must never delay the next prompt.
    fn end_record(&self, history_id: &str, exit_status: i32);

    /// Run the interactive search overlay, blocking until the user picks a
    /// result or cancels.
    ///
    /// The returned string is the raw result channel content: empty means no
    /// selection, and a reserved prefix marker means "select and execute".
    /// The overlay UI renders on stderr so it reaches the terminal even while
    /// the result channel is being captured.
    fn interactive_search(
        &self,
        query: &str,
        keymap: KeymapMode,
        extra_args: &[String],
    ) -> Result<String>;

    /// Ask whether startup sync is enabled by configuration. Read-only query.
    fn should_sync_on_startup(&self) -> Result<bool>;

    /// Launch the background sync as a detached process.
    ///
    /// The lock path is handed over; the service writes its own PID there and
    /// removes the file when done. We never manage the lock beyond this.
    fn launch_sync(&self, lock_path: &Path) -> Result<()>;
}
