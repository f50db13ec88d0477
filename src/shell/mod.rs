// Shell integration module
//
// Shell detection and hook installation. The hooks themselves are thin shims
// that forward events to the histhook binary and apply its directives.

pub mod hook_installer;
pub mod shell_detector;

pub use hook_installer::HookInstaller;
pub use shell_detector::{Shell, ShellDetector};
