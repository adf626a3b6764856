//! Note domain model.
//!
//! # Responsibility
//! - Define the note value object and its persisted mapping.
//! - Provide the monotonic clock behind identifiers and timestamps.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod clock;
pub mod note;
