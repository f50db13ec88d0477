// Command execution recorder
//
// Two states per session: Idle (no history_id) and Recording (history_id
// set). Preexec moves Idle -> Recording with a blocking start-record call;
// postexec moves back with a detached end-record. Commands are never
// recorded concurrently within one shell, so a plain Option is the whole
// state machine.

use crate::client::HistoryService;
use crate::config::Config;
use crate::core::session::SessionState;

/// Pre-execution: start a history record for `command`.
///
/// Hard privacy invariant: in private mode no record is ever created, the
/// service is not even consulted. A failed start call leaves the recorder
/// Idle so the matching postexec becomes a no-op.
pub fn handle_preexec(
    state: &mut SessionState,
    service: &dyn HistoryService,
    config: &Config,
    command: &str,
) {
    if config.private_mode {
        state.history_id = None;
        return;
    }

    // Shell hooks occasionally fire with an empty commandline. Ignore it.
    if command.trim().is_empty() {
        return;
    }

    match service.start_record(command) {
        Ok(id) => state.history_id = Some(id),
        Err(e) => {
            log::warn!("could not start history record: {}", e);
            state.history_id = None;
        }
    }
}

/// Post-execution: end the in-flight record with the command's exit status.
///
/// The end call is fire-and-forget; we do not observe its outcome. The
/// in-flight id is cleared unconditionally, even when there was nothing to
/// end.
pub fn handle_postexec(state: &mut SessionState, service: &dyn HistoryService, exit_status: i32) {
    if let Some(id) = state.history_id.take() {
        service.end_record(&id, exit_status);
    }
}
