// histhook library
//
// Shell-integration layer for an external history/search service: session
// lifecycle, command recording, history freshness, interactive search, and
// startup sync coordination.

pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod shell;

// Re-exports for convenience
pub use client::{HistoryService, ProcessClient};
pub use config::Config;
pub use crate::core::SessionState;
pub use error::{HookError, Result};
