// Error types for histhook
//
// Everything here is non-fatal from the shell's point of view: callers log
// and fall back, they never abort the prompt.

use thiserror::Error;

/// Main error type for histhook operations
#[derive(Error, Debug)]
pub enum HookError {
    /// I/O errors (file operations, process spawning, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The history service is unreachable or exited non-zero
    #[error("History service error: {0}")]
    Service(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for histhook operations
pub type Result<T> = std::result::Result<T, HookError>;

/// Convert HookError to a user-friendly error message
impl HookError {
    pub fn user_message(&self) -> String {
        match self {
            HookError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            HookError::Service(msg) => {
                format!("History service unavailable: {}", msg)
            }
            HookError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = HookError::Service("spawn failed".to_string());
        assert!(err.user_message().contains("spawn failed"));

        let err = HookError::Config("no home directory".to_string());
        assert!(err.user_message().contains("no home directory"));
    }

    #[test]
    fn test_error_display() {
        let err = HookError::Service("exit status 1".to_string());
        let display = format!("{}", err);
        assert!(display.contains("History service"));
    }
}
