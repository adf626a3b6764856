//! Monotonic timestamp source for note identity and audit stamps.
//!
//! # Responsibility
//! - Issue wall-clock instants at microsecond resolution.
//! - Render instants as ISO-8601 stamps and compact note identifiers.
//!
//! # Invariants
//! - Every instant issued within one process is strictly greater than the
//!   previous one, even when the wall clock stalls or steps backwards.
//! - Identifiers are rendered in UTC, so local DST shifts cannot map two
//!   instants to one id. Cross-process collisions after a clock step are
//!   still possible and are resolved by the brain on insert.
//! - Timestamps are rendered in local time without offset.

use chrono::{DateTime, Local, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// ISO-8601 layout used for `created_at` / `updated_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
/// Compact layout used for generated note identifiers.
pub const NOTE_ID_FORMAT: &str = "%Y%m%d%H%M%S%6f";

static LAST_ISSUED_MICROS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Returns the next instant, at least one microsecond after the last one.
pub fn next_instant() -> DateTime<Utc> {
    let now = Utc::now().timestamp_micros();
    let previous = LAST_ISSUED_MICROS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);
    let issued = now.max(previous.saturating_add(1));

    DateTime::<Utc>::from_timestamp_micros(issued).unwrap_or_else(Utc::now)
}

/// Formats an instant as a local note timestamp.
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Formats an instant as a UTC note identifier.
pub fn format_note_id(instant: &DateTime<Utc>) -> String {
    instant.format(NOTE_ID_FORMAT).to_string()
}

/// Shorthand for `format_timestamp(&next_instant())`.
pub fn now_timestamp() -> String {
    format_timestamp(&next_instant())
}
