// Hook installer
//
// Renders the embedded hook templates (binary path substituted for the
// @HISTHOOK@ placeholder, so the hooks work without a PATH install), writes
// them under the hooks directory, and wires a source line into the RC file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HookError, Result};
use crate::shell::{Shell, ShellDetector};

const FISH_HOOK: &str = include_str!("../../hooks/fish.fish");
const ZSH_HOOK: &str = include_str!("../../hooks/zsh.sh");

/// Placeholder in the templates for the histhook binary path
const BINARY_PLACEHOLDER: &str = "@HISTHOOK@";

pub struct HookInstaller {
    hooks_dir: PathBuf,
    binary_path: String,
}

impl HookInstaller {
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| HookError::Config("Could not determine home directory".to_string()))?;

        // Resolve the running binary so the rendered hook keeps working even
        // when histhook is not on $PATH.
        let binary_path = env::current_exe()
            .ok()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "histhook".to_string());

        Ok(Self {
            hooks_dir: home.join(".histhook").join("hooks"),
            binary_path,
        })
    }

    /// Render the hook script for a shell with the binary path filled in
    pub fn render(&self, shell: Shell) -> String {
        let template = match shell {
            Shell::Fish => FISH_HOOK,
            Shell::Zsh => ZSH_HOOK,
        };
        template.replace(BINARY_PLACEHOLDER, &self.binary_path)
    }

    /// Install the hook for the detected shell
    pub fn install_auto(&self) -> Result<Shell> {
        let shell = ShellDetector::detect()?;
        self.install(shell)?;
        Ok(shell)
    }

    /// Install the hook for a specific shell
    pub fn install(&self, shell: Shell) -> Result<()> {
        fs::create_dir_all(&self.hooks_dir)?;

        let hook_path = self.hooks_dir.join(shell.hook_filename());
        fs::write(&hook_path, self.render(shell))?;

        self.update_rc_file(shell, &hook_path)?;

        Ok(())
    }

    /// Install hooks for every shell present on this machine
    pub fn install_all(&self) -> Result<Vec<Shell>> {
        let mut installed = Vec::new();

        for shell in ShellDetector::detect_all() {
            match self.install(shell) {
                Ok(()) => installed.push(shell),
                Err(e) => {
                    log::warn!("failed to install {} hook: {}", shell, e);
                }
            }
        }

        if installed.is_empty() {
            return Err(HookError::Config(
                "No shells could be configured".to_string(),
            ));
        }

        Ok(installed)
    }

    /// Remove the hook and its source line for a shell
    pub fn uninstall(&self, shell: Shell) -> Result<()> {
        let hook_path = self.hooks_dir.join(shell.hook_filename());
        let rc_path = shell.rc_file_path()?;

        if rc_path.exists() {
            let content = fs::read_to_string(&rc_path)?;
            let source_cmd = shell.source_command(&hook_path);

            let new_content: String = content
                .lines()
                .filter(|line| !line.contains(&source_cmd) && !line.contains("histhook hook"))
                .collect::<Vec<_>>()
                .join("\n");

            fs::write(&rc_path, new_content)?;
        }

        if hook_path.exists() {
            fs::remove_file(&hook_path)?;
        }

        Ok(())
    }

    /// Whether both the hook file and its source line are in place
    pub fn is_installed(&self, shell: Shell) -> bool {
        let hook_path = self.hooks_dir.join(shell.hook_filename());
        if !hook_path.exists() {
            return false;
        }

        if let Ok(rc_path) = shell.rc_file_path() {
            if let Ok(content) = fs::read_to_string(&rc_path) {
                return content.contains(&shell.source_command(&hook_path));
            }
        }

        false
    }

    fn update_rc_file(&self, shell: Shell, hook_path: &Path) -> Result<()> {
        let rc_path = shell.rc_file_path()?;

        if let Some(parent) = rc_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = if rc_path.exists() {
            fs::read_to_string(&rc_path)?
        } else {
            String::new()
        };

        let source_cmd = shell.source_command(hook_path);
        if content.contains(&source_cmd) {
            return Ok(()); // Already installed
        }

        if !content.ends_with('\n') && !content.is_empty() {
            content.push('\n');
        }

        content.push_str("\n# histhook (auto-generated)\n");
        content.push_str(&source_cmd);
        content.push('\n');

        fs::write(&rc_path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_installer() -> (HookInstaller, TempDir) {
        let temp = TempDir::new().unwrap();
        let installer = HookInstaller {
            hooks_dir: temp.path().join("hooks"),
            binary_path: "/opt/histhook/bin/histhook".to_string(),
        };
        (installer, temp)
    }

    #[test]
    fn test_render_substitutes_binary_path() {
        let (installer, _temp) = create_test_installer();

        let fish = installer.render(Shell::Fish);
        assert!(fish.contains("/opt/histhook/bin/histhook"));
        assert!(!fish.contains(BINARY_PLACEHOLDER));
        assert!(fish.contains("fish_preexec"));

        let zsh = installer.render(Shell::Zsh);
        assert!(zsh.contains("/opt/histhook/bin/histhook"));
        assert!(zsh.contains("add-zsh-hook"));
    }

    #[test]
    fn test_templates_use_shared_env_names() {
        let (installer, _temp) = create_test_installer();

        for shell in Shell::ALL {
            let rendered = installer.render(shell);
            assert!(rendered.contains(crate::config::ENV_SESSION));
            assert!(rendered.contains(crate::config::ENV_HISTORY_ID));
            assert!(rendered.contains(crate::config::ENV_LAST_MTIME));
        }
    }

    #[test]
    fn test_install_writes_hook_file() {
        let (installer, temp) = create_test_installer();
        fs::create_dir_all(temp.path().join("hooks")).unwrap();

        let hook_path = temp.path().join("hooks").join(Shell::Fish.hook_filename());
        fs::write(&hook_path, installer.render(Shell::Fish)).unwrap();

        let written = fs::read_to_string(&hook_path).unwrap();
        assert!(written.contains("session-start"));
    }

    #[test]
    fn test_is_installed_false_without_hook_file() {
        let (installer, _temp) = create_test_installer();
        assert!(!installer.is_installed(Shell::Fish));
        assert!(!installer.is_installed(Shell::Zsh));
    }
}
