use secondbrain_core::{
    BrainDocument, BrainError, NoteStore, NoteUpdate, SecondBrain, StoreError, StoreResult,
};
use std::cell::{Cell, RefCell};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn open_temp_brain() -> (TempDir, SecondBrain) {
    let dir = TempDir::new().unwrap();
    let brain = SecondBrain::open(dir.path().join("brain_data.json")).unwrap();
    (dir, brain)
}

/// In-memory store whose writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    path: PathBuf,
    fail_writes: Cell<bool>,
    written: RefCell<Option<BrainDocument>>,
}

impl NoteStore for FlakyStore {
    fn read_document(&self) -> StoreResult<Option<BrainDocument>> {
        Ok(self.written.borrow().clone())
    }

    fn write_document(&self, document: &BrainDocument) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::Write {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            });
        }
        *self.written.borrow_mut() = Some(document.clone());
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

#[test]
fn add_note_returns_stored_note() {
    let (_dir, mut brain) = open_temp_brain();

    let note = brain
        .add_note("Test Title", "Test content", tags(&["tag1"]))
        .unwrap();
    assert_eq!(note.title, "Test Title");
    assert_eq!(note.content, "Test content");
    assert_eq!(note.tags, tags(&["tag1"]));
    assert_eq!(brain.len(), 1);
    assert_eq!(brain.get_note(&note.id), Some(&note));
}

#[test]
fn get_unknown_note_is_none() {
    let (_dir, brain) = open_temp_brain();
    assert!(brain.get_note("nonexistent").is_none());
}

#[test]
fn update_overwrites_supplied_fields() {
    let (_dir, mut brain) = open_temp_brain();
    let note = brain.add_note("Original", "Original content", Vec::new()).unwrap();

    let updated = brain
        .update_note(
            &note.id,
            NoteUpdate {
                title: Some("Updated".to_string()),
                content: Some("Updated content".to_string()),
                tags: Some(tags(&["fresh"])),
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, note.id);
    assert_eq!(updated.title, "Updated");
    assert_eq!(updated.content, "Updated content");
    assert_eq!(updated.tags, tags(&["fresh"]));
    assert_eq!(updated.created_at, note.created_at);
    assert_eq!(brain.get_note(&note.id), Some(&updated));
}

#[test]
fn partial_update_keeps_other_fields() {
    let (_dir, mut brain) = open_temp_brain();
    let note = brain.add_note("Title", "Content", tags(&["tag1"])).unwrap();

    let updated = brain
        .update_note(
            &note.id,
            NoteUpdate {
                title: Some("New Title".to_string()),
                ..NoteUpdate::default()
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "New Title");
    assert_eq!(updated.content, "Content");
    assert_eq!(updated.tags, tags(&["tag1"]));
    assert!(updated.updated_at >= note.updated_at);
}

#[test]
fn update_unknown_note_is_none_and_does_not_write() {
    let (dir, mut brain) = open_temp_brain();
    let result = brain
        .update_note("missing", NoteUpdate::default())
        .unwrap();
    assert!(result.is_none());
    assert!(!dir.path().join("brain_data.json").exists());
}

#[test]
fn delete_known_note_returns_true() {
    let (_dir, mut brain) = open_temp_brain();
    let keep = brain.add_note("Keep", "Content", Vec::new()).unwrap();
    let gone = brain.add_note("Gone", "Content", Vec::new()).unwrap();

    assert!(brain.delete_note(&gone.id).unwrap());
    assert!(brain.get_note(&gone.id).is_none());
    let ids: Vec<&str> = brain.list_notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec![keep.id.as_str()]);
}

#[test]
fn delete_unknown_note_returns_false_and_keeps_map() {
    let (_dir, mut brain) = open_temp_brain();
    brain.add_note("Title", "Content", Vec::new()).unwrap();

    assert!(!brain.delete_note("nonexistent").unwrap());
    assert_eq!(brain.len(), 1);
}

#[test]
fn add_does_not_deduplicate() {
    let (_dir, mut brain) = open_temp_brain();
    let first = brain.add_note("Same", "Same", Vec::new()).unwrap();
    let second = brain.add_note("Same", "Same", Vec::new()).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(brain.len(), 2);
}

#[test]
fn failed_write_is_reported_and_rolled_back() {
    let store = FlakyStore::default();
    let mut brain = SecondBrain::with_store(store).unwrap();
    let kept = brain.add_note("Kept", "Content", tags(&["a"])).unwrap();

    brain.store().fail_writes.set(true);

    let err = brain.add_note("Lost", "Content", Vec::new()).unwrap_err();
    assert!(matches!(err, BrainError::StorageWrite(StoreError::Write { .. })));
    assert_eq!(brain.len(), 1);

    let err = brain
        .update_note(
            &kept.id,
            NoteUpdate {
                title: Some("Changed".to_string()),
                ..NoteUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, BrainError::StorageWrite(_)));
    assert_eq!(brain.get_note(&kept.id), Some(&kept));

    let err = brain.delete_note(&kept.id).unwrap_err();
    assert!(matches!(err, BrainError::StorageWrite(_)));
    assert_eq!(brain.get_note(&kept.id), Some(&kept));

    let persisted = brain.store().written.borrow().clone().unwrap();
    assert_eq!(persisted.notes.len(), 1);
    assert!(persisted.notes.contains_key(&kept.id));
}

#[test]
fn unwritable_location_surfaces_storage_write_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "file").unwrap();

    let mut brain = SecondBrain::open(blocker.join("brain_data.json")).unwrap();
    let err = brain.add_note("Title", "Content", Vec::new()).unwrap_err();

    assert!(matches!(err, BrainError::StorageWrite(_)));
    assert!(brain.is_empty());
}
