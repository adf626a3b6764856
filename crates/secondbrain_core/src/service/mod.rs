//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model and store calls into use-case level APIs.
//! - Keep CLI layers decoupled from storage details.

pub mod brain;
