// Event dispatch
//
// The hosting shell's own loop delivers these events one at a time; handlers
// mutate the session state and return effects for the host to apply. Nothing
// here knows whether the host is a fish hook, a zsh widget, or a test.

use crate::client::HistoryService;
use crate::config::Config;
use crate::core::keybinding::{self, UpKeyAction, UpKeyContext};
use crate::core::searcher::{self, KeymapMode};
use crate::core::session::{self, SessionState};
use crate::core::{freshness, recorder, startup};

/// A shell lifecycle event, as delivered by the host
#[derive(Debug, Clone)]
pub enum ShellEvent {
    /// Shell started: coordinate startup sync, then initialize the session
    SessionStart,
    /// The user submitted a command line, about to execute
    PreExec { command: String },
    /// A command finished with this exit status
    PostExec { exit_status: i32 },
    /// A prompt is about to be displayed
    Prompt,
    /// The up key was pressed with this buffer and context
    UpKey {
        buffer: String,
        context: UpKeyContext,
        /// Extra arguments forwarded verbatim to the search invocation
        extra_args: Vec<String>,
    },
}

/// A shell-side mutation the host must apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the editable command buffer
    SetBuffer(String),
    /// Submit the buffer for execution, as if the user pressed enter
    AcceptLine,
    /// Force a redraw of the command line
    Redraw,
    /// Merge history records written by other sessions into this shell
    MergeHistory,
    /// Fall back to the shell's built-in up-history behavior
    NativeUpHistory,
    /// Fall back to the shell's built-in up-line movement
    NativeUpLine,
}

/// Dispatch one event against the session state.
///
/// Handlers never fail the shell: service errors are logged inside and
/// degrade to "nothing happened this time".
pub fn dispatch(
    event: ShellEvent,
    state: &mut SessionState,
    service: &dyn HistoryService,
    config: &Config,
) -> Vec<Effect> {
    match event {
        ShellEvent::SessionStart => {
            match startup::coordinate(service, config) {
                Ok(decision) => log::debug!("startup sync: {:?}", decision),
                Err(e) => log::warn!("startup sync skipped: {}", e),
            }
            if let Err(e) = session::begin_session(state, service) {
                log::warn!("{}", e.user_message());
            }
            Vec::new()
        }
        ShellEvent::PreExec { command } => {
            recorder::handle_preexec(state, service, config, &command);
            Vec::new()
        }
        ShellEvent::PostExec { exit_status } => {
            recorder::handle_postexec(state, service, exit_status);
            Vec::new()
        }
        ShellEvent::Prompt => {
            if freshness::observe(state, &config.history_file) {
                vec![Effect::MergeHistory]
            } else {
                Vec::new()
            }
        }
        ShellEvent::UpKey {
            buffer,
            context,
            extra_args,
        } => match keybinding::dispatch_up_key(&context) {
            UpKeyAction::InteractiveSearch => {
                let keymap = KeymapMode::derive(&config.key_bindings, &config.bind_mode);
                searcher::run(service, &buffer, keymap, &extra_args)
            }
            UpKeyAction::NativeUpHistory => vec![Effect::NativeUpHistory],
            UpKeyAction::NativeUpLine => vec![Effect::NativeUpLine],
        },
    }
}
