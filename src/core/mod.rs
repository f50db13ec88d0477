// Core event layer
//
// Pure-ish handlers over an explicit session-state struct. The hosting shell
// delivers events through the binary; nothing in here knows how the events
// arrive or how the effects get applied.

pub mod events;
pub mod freshness;
pub mod keybinding;
pub mod recorder;
pub mod searcher;
pub mod session;
pub mod startup;

pub use events::{dispatch, Effect, ShellEvent};
pub use keybinding::{dispatch_up_key, UpKeyAction, UpKeyContext};
pub use searcher::{KeymapMode, SearchOutcome};
pub use session::SessionState;
pub use startup::SyncDecision;
