// Call-recording test double for the history service
//
// Scripts results up front, remembers every call, so the core tests can
// assert on exactly which invocations happened.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::client::HistoryService;
use crate::core::searcher::KeymapMode;
use crate::error::{HookError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    GenerateSessionId,
    StartRecord(String),
    EndRecord(String, i32),
    InteractiveSearch(String, &'static str),
    ShouldSync,
    LaunchSync(PathBuf),
}

pub(crate) struct MockService {
    pub calls: RefCell<Vec<Call>>,
    pub session_id: Result<String>,
    pub record_id: Result<String>,
    pub search_result: Result<String>,
    pub sync_enabled: Result<bool>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            session_id: Ok("session-1".to_string()),
            record_id: Ok("record-1".to_string()),
            search_result: Ok(String::new()),
            sync_enabled: Ok(true),
        }
    }

    pub fn with_search_result(result: &str) -> Self {
        let mut mock = Self::new();
        mock.search_result = Ok(result.to_string());
        mock
    }

    pub fn failing() -> Self {
        let mut mock = Self::new();
        mock.session_id = Err(HookError::Service("down".into()));
        mock.record_id = Err(HookError::Service("down".into()));
        mock.search_result = Err(HookError::Service("down".into()));
        mock.sync_enabled = Err(HookError::Service("down".into()));
        mock
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn clone_result(result: &Result<String>) -> Result<String> {
        match result {
            Ok(s) => Ok(s.clone()),
            Err(HookError::Service(msg)) => Err(HookError::Service(msg.clone())),
            Err(_) => Err(HookError::Service("mock".into())),
        }
    }
}

impl HistoryService for MockService {
    fn generate_session_id(&self) -> Result<String> {
        self.calls.borrow_mut().push(Call::GenerateSessionId);
        Self::clone_result(&self.session_id)
    }

    fn start_record(&self, command: &str) -> Result<String> {
        self.calls
            .borrow_mut()
            .push(Call::StartRecord(command.to_string()));
        Self::clone_result(&self.record_id)
    }

    fn end_record(&self, history_id: &str, exit_status: i32) {
        self.calls
            .borrow_mut()
            .push(Call::EndRecord(history_id.to_string(), exit_status));
    }

    fn interactive_search(
        &self,
        query: &str,
        keymap: KeymapMode,
        _extra_args: &[String],
    ) -> Result<String> {
        self.calls
            .borrow_mut()
            .push(Call::InteractiveSearch(query.to_string(), keymap.as_str()));
        Self::clone_result(&self.search_result)
    }

    fn should_sync_on_startup(&self) -> Result<bool> {
        self.calls.borrow_mut().push(Call::ShouldSync);
        match &self.sync_enabled {
            Ok(b) => Ok(*b),
            Err(_) => Err(HookError::Service("down".into())),
        }
    }

    fn launch_sync(&self, lock_path: &Path) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(Call::LaunchSync(lock_path.to_path_buf()));
        Ok(())
    }
}
