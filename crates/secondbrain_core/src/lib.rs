//! Core domain logic for the second brain note store.
//! This crate owns note identity, persistence and query semantics.

pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use model::note::{Note, NoteDecodeError, NoteId, NoteUpdate};
pub use repo::snapshot_store::{
    BrainDocument, JsonFileStore, NoteStore, StoreError, StoreResult, WriteStrategy,
};
pub use service::brain::{BrainError, BrainOptions, BrainResult, SecondBrain};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
