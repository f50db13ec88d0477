// Interactive search controller
//
// Blocks the shell for the duration of the overlay (that's the point of a
// modal search UI), then translates the service's result channel into
// command-buffer mutations. The buffer is redrawn in every case so the
// overlay is guaranteed to be cleared.

use crate::client::HistoryService;
use crate::core::events::Effect;

/// Reserved prefix on the result channel meaning "select and run it now"
pub const ACCEPT_MARKER: &str = "__histhook_accept__:";

/// Keymap tag passed to the service so the overlay matches the shell's
/// edit-mode conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapMode {
    VimNormal,
    VimInsert,
    Emacs,
}

impl KeymapMode {
    pub fn as_str(self) -> &'static str {
        match self {
            KeymapMode::VimNormal => "vim-normal",
            KeymapMode::VimInsert => "vim-insert",
            KeymapMode::Emacs => "emacs",
        }
    }

    /// Derive the tag from the shell's binding scheme and, for vi bindings,
    /// its modal sub-state. Anything unrecognized is emacs.
    ///
    /// Understands both fish scheme names (`fish_vi_key_bindings`,
    /// `fish_hybrid_key_bindings` with `fish_bind_mode`) and zsh keymap
    /// names (`vicmd`, `viins`).
    pub fn derive(scheme: &str, modal_state: &str) -> Self {
        match scheme {
            "vicmd" => return KeymapMode::VimNormal,
            "viins" => return KeymapMode::VimInsert,
            "fish_vi_key_bindings" | "fish_hybrid_key_bindings" | "vi" => {}
            _ => return KeymapMode::Emacs,
        }

        if modal_state == "insert" {
            KeymapMode::VimInsert
        } else {
            KeymapMode::VimNormal
        }
    }
}

/// Outcome of one interactive search invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty result: the user cancelled or picked nothing
    NoSelection,
    /// Replace the buffer, leave the user editing
    SelectedText(String),
    /// Replace the buffer and submit it immediately
    SelectedAndExecute(String),
}

/// Parse the raw result-channel string
pub fn parse_result(raw: &str) -> SearchOutcome {
    if raw.is_empty() {
        SearchOutcome::NoSelection
    } else if let Some(rest) = raw.strip_prefix(ACCEPT_MARKER) {
        SearchOutcome::SelectedAndExecute(rest.to_string())
    } else {
        SearchOutcome::SelectedText(raw.to_string())
    }
}

/// Run one search against the service and turn the outcome into effects.
///
/// Service failure means "no search this time", not an error the shell sees;
/// the redraw still happens so a half-drawn overlay never lingers.
pub fn run(
    service: &dyn HistoryService,
    query: &str,
    keymap: KeymapMode,
    extra_args: &[String],
) -> Vec<Effect> {
    let raw = match service.interactive_search(query, keymap, extra_args) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("interactive search unavailable: {}", e);
            return vec![Effect::Redraw];
        }
    };

    let mut effects = match parse_result(&raw) {
        SearchOutcome::NoSelection => Vec::new(),
        SearchOutcome::SelectedText(text) => vec![Effect::SetBuffer(text)],
        SearchOutcome::SelectedAndExecute(text) => {
            vec![Effect::SetBuffer(text), Effect::AcceptLine]
        }
    };
    effects.push(Effect::Redraw);
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{Call, MockService};

    #[test]
    fn test_parse_empty_is_no_selection() {
        assert_eq!(parse_result(""), SearchOutcome::NoSelection);
    }

    #[test]
    fn test_parse_plain_text_is_selection() {
        assert_eq!(
            parse_result("foo"),
            SearchOutcome::SelectedText("foo".to_string())
        );
    }

    #[test]
    fn test_parse_marker_means_execute() {
        let raw = format!("{}foo", ACCEPT_MARKER);
        assert_eq!(
            parse_result(&raw),
            SearchOutcome::SelectedAndExecute("foo".to_string())
        );
    }

    #[test]
    fn test_no_selection_only_redraws() {
        let service = MockService::with_search_result("");
        let effects = run(&service, "git", KeymapMode::Emacs, &[]);
        assert_eq!(effects, vec![Effect::Redraw]);
    }

    #[test]
    fn test_selection_replaces_buffer_without_executing() {
        let service = MockService::with_search_result("foo");
        let effects = run(&service, "f", KeymapMode::Emacs, &[]);
        assert_eq!(
            effects,
            vec![Effect::SetBuffer("foo".to_string()), Effect::Redraw]
        );
    }

    #[test]
    fn test_accept_marker_replaces_and_executes() {
        let raw = format!("{}foo", ACCEPT_MARKER);
        let service = MockService::with_search_result(&raw);
        let effects = run(&service, "", KeymapMode::VimInsert, &[]);
        assert_eq!(
            effects,
            vec![
                Effect::SetBuffer("foo".to_string()),
                Effect::AcceptLine,
                Effect::Redraw,
            ]
        );
    }

    #[test]
    fn test_query_and_keymap_reach_the_service() {
        let service = MockService::with_search_result("");
        run(&service, "docker", KeymapMode::VimNormal, &[]);
        assert_eq!(
            service.calls(),
            vec![Call::InteractiveSearch("docker".to_string(), "vim-normal")]
        );
    }

    #[test]
    fn test_service_failure_still_redraws() {
        let service = MockService::failing();
        let effects = run(&service, "x", KeymapMode::Emacs, &[]);
        assert_eq!(effects, vec![Effect::Redraw]);
    }

    #[test]
    fn test_keymap_derivation() {
        assert_eq!(KeymapMode::derive("", ""), KeymapMode::Emacs);
        assert_eq!(KeymapMode::derive("emacs", ""), KeymapMode::Emacs);
        assert_eq!(KeymapMode::derive("something-new", ""), KeymapMode::Emacs);
        assert_eq!(KeymapMode::derive("vicmd", ""), KeymapMode::VimNormal);
        assert_eq!(KeymapMode::derive("viins", ""), KeymapMode::VimInsert);
        assert_eq!(
            KeymapMode::derive("fish_vi_key_bindings", "insert"),
            KeymapMode::VimInsert
        );
        assert_eq!(
            KeymapMode::derive("fish_vi_key_bindings", "default"),
            KeymapMode::VimNormal
        );
        assert_eq!(
            KeymapMode::derive("fish_hybrid_key_bindings", "insert"),
            KeymapMode::VimInsert
        );
    }
}
