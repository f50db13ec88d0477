// Up-key dispatch policy
//
// "Up" only becomes a search trigger when there is nothing above the cursor
// to navigate to and no native overlay is open. Native multi-line editing
// always wins.

/// What the shell reported about the keystroke's surroundings
#[derive(Debug, Clone, Default)]
pub struct UpKeyContext {
    /// 1-based line number of the cursor within the command buffer
    pub cursor_line: u32,
    /// The shell's own incremental-search overlay is open
    pub search_mode: bool,
    /// The shell's completion pager is open
    pub paging_mode: bool,
}

/// Where the keystroke should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpKeyAction {
    /// Open the interactive history search
    InteractiveSearch,
    /// Defer to the shell's built-in up-history behavior
    NativeUpHistory,
    /// Defer to the shell's built-in up-line movement
    NativeUpLine,
}

/// Decide what an up keystroke does, in policy order:
/// native overlays first, then in-buffer movement, then search.
pub fn dispatch_up_key(ctx: &UpKeyContext) -> UpKeyAction {
    if ctx.search_mode || ctx.paging_mode {
        return UpKeyAction::NativeUpHistory;
    }

    if ctx.cursor_line <= 1 {
        UpKeyAction::InteractiveSearch
    } else {
        UpKeyAction::NativeUpLine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_triggers_search() {
        let ctx = UpKeyContext {
            cursor_line: 1,
            ..Default::default()
        };
        assert_eq!(dispatch_up_key(&ctx), UpKeyAction::InteractiveSearch);
    }

    #[test]
    fn test_second_line_moves_cursor_natively() {
        let ctx = UpKeyContext {
            cursor_line: 2,
            ..Default::default()
        };
        assert_eq!(dispatch_up_key(&ctx), UpKeyAction::NativeUpLine);
    }

    #[test]
    fn test_paging_mode_defers_regardless_of_line() {
        let ctx = UpKeyContext {
            cursor_line: 1,
            paging_mode: true,
            ..Default::default()
        };
        assert_eq!(dispatch_up_key(&ctx), UpKeyAction::NativeUpHistory);
    }

    #[test]
    fn test_search_mode_defers() {
        let ctx = UpKeyContext {
            cursor_line: 1,
            search_mode: true,
            ..Default::default()
        };
        assert_eq!(dispatch_up_key(&ctx), UpKeyAction::NativeUpHistory);
    }
}
