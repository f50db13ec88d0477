// History service client
//
// The external search/sync/history service is a black box reached through a
// narrow process-invocation contract. `HistoryService` is the seam; the core
// event layer only ever sees the trait.

pub mod process;
pub mod service;

#[cfg(test)]
pub(crate) mod mock;

pub use process::ProcessClient;
pub use service::HistoryService;
