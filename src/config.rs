// Environment-derived configuration
//
// The hook scripts talk to us exclusively through environment variables and
// argv, so every knob lives in the environment. Names are centralized here
// because the embedded hook templates must use the exact same strings.

use std::env;
use std::path::PathBuf;

/// External service binary, e.g. an absolute path or a name on $PATH.
pub const ENV_SERVICE: &str = "HISTHOOK_SERVICE";
/// Directory for runtime state (the sync lock file lives here).
pub const ENV_STATE_DIR: &str = "HISTHOOK_STATE_DIR";
/// Path of the shared on-disk history store watched for freshness.
pub const ENV_HISTORY_FILE: &str = "HISTHOOK_HISTORY_FILE";
/// Non-empty means private/incognito mode: never record anything.
pub const ENV_PRIVATE: &str = "HISTHOOK_PRIVATE";
/// The shell's active key-binding scheme (e.g. "fish_vi_key_bindings", "viins").
pub const ENV_KEY_BINDINGS: &str = "HISTHOOK_KEY_BINDINGS";
/// Modal sub-state when vi bindings are active ("insert" or "default").
pub const ENV_BIND_MODE: &str = "HISTHOOK_BIND_MODE";
/// Session id, exported by the hook after `histhook session-start`.
pub const ENV_SESSION: &str = "HISTHOOK_SESSION";
/// In-flight history record id, exported between preexec and postexec.
pub const ENV_HISTORY_ID: &str = "HISTHOOK_HISTORY_ID";
/// Last observed history-store mtime, unix seconds.
pub const ENV_LAST_MTIME: &str = "HISTHOOK_LAST_MTIME";
/// Lock file path handed to the service's sync process.
pub const ENV_SYNC_LOCK: &str = "HISTHOOK_SYNC_LOCK";
/// Log filter for the histhook binary itself (env_logger syntax).
pub const ENV_LOG: &str = "HISTHOOK_LOG";

/// Default name of the external service binary
const DEFAULT_SERVICE: &str = "histd";

/// Runtime configuration, read once per invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// The external history service binary
    pub service_program: PathBuf,
    /// Configured state directory, if any
    pub state_dir: Option<PathBuf>,
    /// The on-disk history store whose mtime we watch
    pub history_file: PathBuf,
    /// Private/incognito mode: recording is disabled entirely
    pub private_mode: bool,
    /// Active key-binding scheme as reported by the shell
    pub key_bindings: String,
    /// Modal sub-state for vi-style bindings
    pub bind_mode: String,
}

impl Config {
    /// Build a configuration from the environment
    pub fn from_env() -> Self {
        let service_program = env::var_os(ENV_SERVICE)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SERVICE));

        let state_dir = env::var_os(ENV_STATE_DIR).map(PathBuf::from);

        let history_file = env::var_os(ENV_HISTORY_FILE)
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::data_dir().join("history.db"));

        let private_mode = env::var(ENV_PRIVATE)
            .map(|v| !v.is_empty())
            .unwrap_or(false);

        let key_bindings = env::var(ENV_KEY_BINDINGS).unwrap_or_default();
        let bind_mode = env::var(ENV_BIND_MODE).unwrap_or_default();

        Self {
            service_program,
            state_dir,
            history_file,
            private_mode,
            key_bindings,
            bind_mode,
        }
    }

    /// The default data/state directory under the user's home.
    ///
    /// Falls back to the current directory when no home can be determined,
    /// which only realistically happens in stripped-down CI environments.
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".histhook")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_program: PathBuf::from(DEFAULT_SERVICE),
            state_dir: None,
            history_file: Config::data_dir().join("history.db"),
            private_mode: false,
            key_bindings: String::new(),
            bind_mode: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_program, PathBuf::from("histd"));
        assert!(config.state_dir.is_none());
        assert!(!config.private_mode);
        assert!(config
            .history_file
            .to_string_lossy()
            .contains(".histhook"));
    }

    #[test]
    fn test_data_dir_under_home() {
        let dir = Config::data_dir();
        assert!(dir.ends_with(".histhook"));
    }
}
