//! Note query entry points.
//!
//! # Responsibility
//! - Expose search, tag filter and tag enumeration over in-memory notes.
//! - Keep result shaping (ordering) inside core.

pub mod scan;
