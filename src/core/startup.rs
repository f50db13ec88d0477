// Startup sync coordination
//
// Many shells can start within the same user session in quick succession
// (terminal tabs). Without the liveness-checked lock each would launch a
// redundant full sync. The lock itself is owned by the sync process: it
// writes its PID there and removes the file when done. We only read.

use std::fs;
use std::path::PathBuf;

use crate::client::HistoryService;
use crate::config::Config;
use crate::error::Result;

const LOCK_FILE_NAME: &str = "sync.lock";

/// What the coordinator decided to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncDecision {
    /// Background sync launched, lock path handed to the service
    Launched(PathBuf),
    /// Startup sync is disabled (or the query failed, which reads the same)
    Disabled,
    /// Another process holds a live lock; its PID
    AlreadyRunning(i32),
}

/// Run the startup-sync decision once, at shell start.
pub fn coordinate(service: &dyn HistoryService, config: &Config) -> Result<SyncDecision> {
    match service.should_sync_on_startup() {
        Ok(true) => {}
        Ok(false) => return Ok(SyncDecision::Disabled),
        Err(e) => {
            log::debug!("startup sync query failed: {}", e);
            return Ok(SyncDecision::Disabled);
        }
    }

    let lock_path = lock_file_path(config);

    if let Some(pid) = read_lock_pid(&lock_path) {
        if pid_alive(pid) {
            return Ok(SyncDecision::AlreadyRunning(pid));
        }
        // Stale lock from a dead process. Reclaim silently by moving on;
        // the new sync process overwrites the file with its own PID.
        log::debug!("reclaiming stale sync lock held by dead pid {}", pid);
    }

    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent)?;
        restrict_permissions(parent)?;
    }

    service.launch_sync(&lock_path)?;
    Ok(SyncDecision::Launched(lock_path))
}

/// Where the lock lives: the configured state dir when its parent exists,
/// otherwise a fixed default under the user's home.
fn lock_file_path(config: &Config) -> PathBuf {
    if let Some(state_dir) = &config.state_dir {
        let parent_exists = state_dir
            .parent()
            .map(|p| p.exists())
            .unwrap_or(false);
        if parent_exists {
            return state_dir.join(LOCK_FILE_NAME);
        }
    }
    Config::data_dir().join(LOCK_FILE_NAME)
}

/// Read the PID recorded in the lock file, if there is one to read
fn read_lock_pid(path: &std::path::Path) -> Option<i32> {
    let content = fs::read_to_string(path).ok()?;
    content.trim().parse::<i32>().ok()
}

/// Signal-zero liveness probe. EPERM still means the process exists.
fn pid_alive(pid: i32) -> bool {
    if pid <= 0 {
        return false;
    }
    if unsafe { libc::kill(pid, 0) } == 0 {
        return true;
    }
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

/// Owner-only permissions on the lock directory
fn restrict_permissions(dir: &std::path::Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(dir)?.permissions();
        perms.set_mode(0o700);
        fs::set_permissions(dir, perms)?;
    }
    Ok(())
}
