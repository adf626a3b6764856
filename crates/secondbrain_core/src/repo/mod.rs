//! Persistence layer abstractions and implementations.
//!
//! # Responsibility
//! - Define the whole-document store contract used by the brain service.
//! - Isolate file handling and JSON encoding from service orchestration.
//!
//! # Invariants
//! - Stores never decode individual note records; that belongs to the model.
//! - Store APIs distinguish read failures from write failures.

pub mod snapshot_store;
