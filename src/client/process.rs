// Subprocess implementation of the history service contract
//
// One external binary handles session ids, records, search and sync. We keep
// stdout as the result channel everywhere: the interactive search UI draws on
// stderr, so it renders into the terminal while we capture the selection.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::client::HistoryService;
use crate::config::{Config, ENV_SESSION, ENV_SYNC_LOCK};
use crate::core::searcher::KeymapMode;
use crate::error::{HookError, Result};

/// Invokes the external history service binary
pub struct ProcessClient {
    program: PathBuf,
    session_id: Option<String>,
}

impl ProcessClient {
    pub fn new(config: &Config, session_id: Option<String>) -> Self {
        Self {
            program: config.service_program.clone(),
            session_id,
        }
    }

    /// Base command with the session id exported for the child
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(session) = &self.session_id {
            cmd.env(ENV_SESSION, session);
        }
        cmd
    }

    /// Run a blocking invocation and return trimmed stdout
    fn capture(&self, mut cmd: Command) -> Result<String> {
        let output = cmd
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| HookError::Service(format!("{}: {}", self.program.display(), e)))?;

        if !output.status.success() {
            return Err(HookError::Service(format!(
                "{} exited with {}",
                self.program.display(),
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Spawn a child we deliberately never wait on.
    ///
    /// Hook invocations are short-lived processes, so the orphaned child is
    /// reparented to init almost immediately.
    fn detach(&self, mut cmd: Command) -> Result<()> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| HookError::Service(format!("{}: {}", self.program.display(), e)))?;
        Ok(())
    }

    /// Probe whether the service binary is runnable at all
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

impl HistoryService for ProcessClient {
    fn generate_session_id(&self) -> Result<String> {
        let mut cmd = self.command();
        cmd.arg("session");
        self.capture(cmd)
    }

    fn start_record(&self, command: &str) -> Result<String> {
        let mut cmd = self.command();
        cmd.args(["history", "start", "--"]).arg(command);
        self.capture(cmd)
    }

    fn end_record(&self, history_id: &str, exit_status: i32) {
        let mut cmd = self.command();
        cmd.args(["history", "end"])
            .arg(format!("--exit={}", exit_status))
            .arg("--")
            .arg(history_id);

        // Best-effort telemetry. Failure here is invisible on purpose.
        if let Err(e) = self.detach(cmd) {
            log::debug!("end_record dropped: {}", e);
        }
    }

    fn interactive_search(
        &self,
        query: &str,
        keymap: KeymapMode,
        extra_args: &[String],
    ) -> Result<String> {
        let mut cmd = self.command();
        cmd.args(["search", "--interactive"])
            .arg(format!("--keymap-mode={}", keymap.as_str()))
            .args(extra_args)
            .arg("--")
            .arg(query);

        // stdin and stderr go to the terminal so the overlay can draw and
        // take keystrokes; stdout is the dedicated result channel.
        let child = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| HookError::Service(format!("{}: {}", self.program.display(), e)))?;

        let output = child.wait_with_output()?;

        if !output.status.success() {
            // Cancelled inside the overlay, or the service fell over. Either
            // way the observable outcome is the same: no selection.
            log::debug!("interactive search exited with {}", output.status);
            return Ok(String::new());
        }

        let mut result = String::from_utf8_lossy(&output.stdout).into_owned();
        while result.ends_with('\n') || result.ends_with('\r') {
            result.pop();
        }
        Ok(result)
    }

    fn should_sync_on_startup(&self) -> Result<bool> {
        let status = self
            .command()
            .args(["sync", "--check-startup"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| HookError::Service(format!("{}: {}", self.program.display(), e)))?;
        Ok(status.success())
    }

    fn launch_sync(&self, lock_path: &Path) -> Result<()> {
        let mut cmd = self.command();
        cmd.arg("sync").env(ENV_SYNC_LOCK, lock_path);
        self.detach(cmd)
    }
}
