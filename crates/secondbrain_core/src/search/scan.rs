//! Linear-scan note queries.
//!
//! # Responsibility
//! - Match notes by substring, tag and recency without any index.
//!
//! # Invariants
//! - Text and tag matching ignore case; tag enumeration preserves it.
//! - Result ordering is `created_at DESC`; ties keep input order.

use crate::model::note::Note;
use std::collections::BTreeSet;

/// Case-insensitive substring match against title, content or any tag.
pub fn search<'a>(notes: impl IntoIterator<Item = &'a Note>, query: &str) -> Vec<&'a Note> {
    let needle = query.to_lowercase();
    let matches = notes
        .into_iter()
        .filter(|note| matches_text(note, &needle))
        .collect();
    sort_recent_first(matches)
}

/// Case-insensitive exact match against any tag.
pub fn filter_by_tag<'a>(notes: impl IntoIterator<Item = &'a Note>, tag: &str) -> Vec<&'a Note> {
    let matches = notes.into_iter().filter(|note| note.has_tag(tag)).collect();
    sort_recent_first(matches)
}

/// Every distinct tag, sorted lexicographically, case preserved.
pub fn collect_tags<'a>(notes: impl IntoIterator<Item = &'a Note>) -> Vec<String> {
    notes
        .into_iter()
        .flat_map(|note| note.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorts by `created_at` descending. The sort is stable.
pub fn sort_recent_first(mut notes: Vec<&Note>) -> Vec<&Note> {
    notes.sort_by(|left, right| right.created_at.cmp(&left.created_at));
    notes
}

fn matches_text(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle)
        || note.content.to_lowercase().contains(needle)
        || note.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::{collect_tags, filter_by_tag, search, sort_recent_first};
    use crate::model::note::Note;

    fn note(id: &str, created_at: &str, title: &str, tags: &[&str]) -> Note {
        Note::with_id(
            id,
            title,
            "body",
            tags.iter().map(|tag| tag.to_string()).collect(),
            Some(created_at.to_string()),
        )
    }

    #[test]
    fn search_matches_tag_substrings() {
        let notes = [note("1", "2026-01-01T00:00:00", "a", &["rustacean"])];
        assert_eq!(search(&notes, "RUST").len(), 1);
    }

    #[test]
    fn tag_filter_requires_whole_tag() {
        let notes = [note("1", "2026-01-01T00:00:00", "a", &["rustacean"])];
        assert!(filter_by_tag(&notes, "rust").is_empty());
        assert_eq!(filter_by_tag(&notes, "RustAcean").len(), 1);
    }

    #[test]
    fn collect_tags_keeps_case_variants_apart() {
        let notes = [
            note("1", "2026-01-01T00:00:00", "a", &["Python", "web"]),
            note("2", "2026-01-02T00:00:00", "b", &["python", "web"]),
        ];
        assert_eq!(collect_tags(&notes), vec!["Python", "python", "web"]);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let notes = [
            note("1", "2026-01-01T00:00:00", "first", &[]),
            note("2", "2026-01-01T00:00:00", "second", &[]),
            note("3", "2026-01-03T00:00:00", "newest", &[]),
        ];
        let sorted = sort_recent_first(notes.iter().collect());
        let titles: Vec<&str> = sorted.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "first", "second"]);
    }
}
