// Shell detection
//
// Only shells we ship hooks for. Fish is the primary target (its event
// system maps 1:1 onto our lifecycle events); zsh gets the same treatment
// through add-zsh-hook and a zle widget.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{HookError, Result};

/// Shells with a hook implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Fish,
    Zsh,
}

impl Shell {
    pub const ALL: [Shell; 2] = [Shell::Fish, Shell::Zsh];

    pub fn name(&self) -> &str {
        match self {
            Shell::Fish => "fish",
            Shell::Zsh => "zsh",
        }
    }

    /// File name the rendered hook is written under
    pub fn hook_filename(&self) -> &str {
        match self {
            Shell::Fish => "histhook.fish",
            Shell::Zsh => "histhook.zsh",
        }
    }

    /// The RC file that should source the hook
    pub fn rc_file_path(&self) -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| HookError::Config("Could not determine home directory".to_string()))?;

        let path = match self {
            Shell::Fish => home.join(".config/fish/config.fish"),
            Shell::Zsh => home.join(".zshrc"),
        };

        Ok(path)
    }

    /// Line added to the RC file to load the hook
    pub fn source_command(&self, hook_path: &Path) -> String {
        match self {
            Shell::Fish => format!(
                "test -f \"{}\" && source \"{}\"",
                hook_path.display(),
                hook_path.display()
            ),
            Shell::Zsh => format!(
                "[ -f \"{}\" ] && source \"{}\"",
                hook_path.display(),
                hook_path.display()
            ),
        }
    }

    pub fn from_name(name: &str) -> Option<Shell> {
        match name {
            "fish" => Some(Shell::Fish),
            "zsh" => Some(Shell::Zsh),
            _ => None,
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Shell detector
pub struct ShellDetector;

impl ShellDetector {
    /// Detect the current shell from the environment
    pub fn detect() -> Result<Shell> {
        // Fish exports its version into every child process
        if env::var_os("FISH_VERSION").is_some() {
            return Ok(Shell::Fish);
        }

        if env::var_os("ZSH_VERSION").is_some() {
            return Ok(Shell::Zsh);
        }

        let shell_path = env::var("SHELL").map_err(|_| {
            HookError::Config(
                "Could not detect shell. Please set $SHELL or pass the shell name.".to_string(),
            )
        })?;

        let shell_name = shell_path.rsplit('/').next().unwrap_or("").to_lowercase();
        Shell::from_name(&shell_name).ok_or_else(|| {
            HookError::Config(format!("Unsupported shell: {}", shell_name))
        })
    }

    /// All shells whose configuration directory is present on this machine
    pub fn detect_all() -> Vec<Shell> {
        Shell::ALL
            .into_iter()
            .filter(|shell| {
                shell
                    .rc_file_path()
                    .ok()
                    .and_then(|rc| rc.parent().map(|p| p.exists()))
                    .unwrap_or(false)
            })
            .collect()
    }
}
