// History store freshness watcher
//
// The history store is written by other shell sessions and by the background
// sync process. Once per prompt we compare its mtime against the last one we
// saw; a strictly newer mtime means someone else wrote history and the shell
// should merge. Checking per prompt (not per keystroke) amortizes the stat.

use std::fs;
use std::path::Path;

use crate::core::session::SessionState;

/// Observe the history store once. Returns true when a merge is due.
///
/// A missing or unreadable store is treated as "nothing changed". The first
/// observation only establishes the baseline, so a freshly started session
/// never merges redundantly.
pub fn observe(state: &mut SessionState, history_file: &Path) -> bool {
    let modified = match fs::metadata(history_file).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return false,
    };

    match state.last_seen_mtime {
        None => {
            state.last_seen_mtime = Some(modified);
            false
        }
        Some(prev) if modified > prev => {
            state.last_seen_mtime = Some(modified);
            true
        }
        Some(_) => false,
    }
}
