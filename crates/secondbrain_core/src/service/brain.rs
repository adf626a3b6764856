//! Second brain use-case service.
//!
//! # Responsibility
//! - Own the in-memory note map and keep it in sync with the store.
//! - Provide note CRUD and query entry points for front ends.
//!
//! # Invariants
//! - After every successful mutating call, memory and storage agree.
//! - A failed write reverts the in-memory mutation before returning.
//! - An unreadable storage file degrades to an empty brain with a warning.
//! - Map iteration is ordered by id, so tie ordering is deterministic.
//! - Every note's `id` equals the map key it is stored under.
//! - Adding a note never replaces an existing one.

use crate::model::note::{Note, NoteDecodeError, NoteId, NoteUpdate};
use crate::repo::snapshot_store::{
    BrainDocument, JsonFileStore, NoteStore, StoreError, WriteStrategy,
};
use crate::search::scan;
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type BrainResult<T> = Result<T, BrainError>;

/// Service error for brain operations.
#[derive(Debug)]
pub enum BrainError {
    /// Storage could not be read or parsed. Recovered at load time and only
    /// ever reported through [`SecondBrain::load_warning`].
    StorageRead(StoreError),
    /// Storage could not be written; the mutation was not applied.
    StorageWrite(StoreError),
    /// A stored note record could not be decoded.
    MalformedRecord {
        key: String,
        source: NoteDecodeError,
    },
}

impl Display for BrainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageRead(err) => write!(f, "could not load brain data: {err}"),
            Self::StorageWrite(err) => write!(f, "could not save brain data: {err}"),
            Self::MalformedRecord { key, source } => {
                write!(f, "malformed note record `{key}`: {source}")
            }
        }
    }
}

impl Error for BrainError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageRead(err) | Self::StorageWrite(err) => Some(err),
            Self::MalformedRecord { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for BrainError {
    fn from(value: StoreError) -> Self {
        if value.is_read_failure() {
            Self::StorageRead(value)
        } else {
            Self::StorageWrite(value)
        }
    }
}

/// Options for opening a file-backed brain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrainOptions {
    pub write_strategy: WriteStrategy,
}

/// In-memory note collection bound to one store.
pub struct SecondBrain<S: NoteStore = JsonFileStore> {
    store: S,
    notes: BTreeMap<NoteId, Note>,
    load_warning: Option<BrainError>,
}

impl SecondBrain<JsonFileStore> {
    /// Opens a brain stored at `storage_path` with default options.
    pub fn open(storage_path: impl Into<PathBuf>) -> BrainResult<Self> {
        Self::open_with(storage_path, BrainOptions::default())
    }

    /// Opens a brain stored at `storage_path`.
    pub fn open_with(storage_path: impl Into<PathBuf>, options: BrainOptions) -> BrainResult<Self> {
        Self::with_store(JsonFileStore::with_strategy(
            storage_path,
            options.write_strategy,
        ))
    }

    /// Storage location fixed at construction.
    pub fn storage_path(&self) -> &Path {
        self.store.location()
    }
}

impl<S: NoteStore> SecondBrain<S> {
    /// Binds a brain to `store` and loads it once.
    ///
    /// # Errors
    /// - `MalformedRecord` when a stored record lacks `title`/`content` or
    ///   has mistyped fields. The whole open fails in that case.
    pub fn with_store(store: S) -> BrainResult<Self> {
        let mut brain = Self {
            store,
            notes: BTreeMap::new(),
            load_warning: None,
        };
        brain.load()?;
        info!(
            "event=brain_open module=brain status=ok location={} notes={} recovered={}",
            brain.store.location().display(),
            brain.notes.len(),
            brain.load_warning.is_some()
        );
        Ok(brain)
    }

    /// Reloads the note map from the store, replacing in-memory state.
    ///
    /// Read and parse failures are recovered: the map is emptied, a warning
    /// is logged and kept in [`Self::load_warning`]. The next save
    /// overwrites the unreadable file.
    pub fn load(&mut self) -> BrainResult<()> {
        let started_at = Instant::now();
        self.load_warning = None;

        let document = match self.store.read_document() {
            Ok(Some(document)) => document,
            Ok(None) => {
                self.notes.clear();
                info!(
                    "event=brain_load module=brain status=ok source=empty location={}",
                    self.store.location().display()
                );
                return Ok(());
            }
            Err(err) => {
                warn!(
                    "event=brain_load module=brain status=recovered location={} error={}",
                    self.store.location().display(),
                    err
                );
                self.notes.clear();
                self.load_warning = Some(BrainError::StorageRead(err));
                return Ok(());
            }
        };

        let mut notes = BTreeMap::new();
        for (key, record) in &document.notes {
            let mut note =
                Note::from_value(record).map_err(|source| BrainError::MalformedRecord {
                    key: key.clone(),
                    source,
                })?;
            if note.id != *key {
                // Map key is the stored identity; lookups and saves go through it.
                note.id = key.clone();
            }
            notes.insert(key.clone(), note);
        }
        self.notes = notes;

        info!(
            "event=brain_load module=brain status=ok source=file notes={} duration_ms={}",
            self.notes.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Writes the full note map to the store.
    pub fn save(&self) -> BrainResult<()> {
        let document = BrainDocument {
            notes: self
                .notes
                .iter()
                .map(|(id, note)| (id.clone(), note.to_value()))
                .collect(),
        };
        if let Err(err) = self.store.write_document(&document) {
            warn!(
                "event=brain_save module=brain status=error notes={} error={}",
                document.notes.len(),
                err
            );
            return Err(err.into());
        }
        info!(
            "event=brain_save module=brain status=ok notes={}",
            document.notes.len()
        );
        Ok(())
    }

    /// Creates a note, persists the brain and returns the stored note.
    pub fn add_note(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> BrainResult<Note> {
        self.insert_new(Note::new(title, content, tags))
    }

    /// Inserts a freshly built note, suffixing its id when already taken.
    fn insert_new(&mut self, mut note: Note) -> BrainResult<Note> {
        if self.notes.contains_key(&note.id) {
            let base = note.id.clone();
            let mut suffix = 1u32;
            while self.notes.contains_key(&format!("{base}-{suffix}")) {
                suffix += 1;
            }
            note.id = format!("{base}-{suffix}");
            warn!(
                "event=note_add module=brain status=id_collision base_id={} note_id={}",
                base, note.id
            );
        }
        let id = note.id.clone();
        self.notes.insert(id.clone(), note.clone());

        if let Err(err) = self.save() {
            self.notes.remove(&id);
            return Err(err);
        }

        info!(
            "event=note_add module=brain status=ok note_id={} tags={}",
            note.id,
            note.tags.len()
        );
        Ok(note)
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    /// Applies a partial update and persists the brain.
    ///
    /// Returns `Ok(None)` without touching storage when `id` is unknown.
    pub fn update_note(&mut self, id: &str, update: NoteUpdate) -> BrainResult<Option<Note>> {
        let Some(note) = self.notes.get_mut(id) else {
            return Ok(None);
        };
        let previous = note.clone();
        note.apply(update);
        let updated = note.clone();

        if let Err(err) = self.save() {
            self.notes.insert(id.to_string(), previous);
            return Err(err);
        }

        info!("event=note_update module=brain status=ok note_id={id}");
        Ok(Some(updated))
    }

    /// Deletes one note and persists the brain.
    ///
    /// Returns `Ok(false)` without touching storage when `id` is unknown.
    pub fn delete_note(&mut self, id: &str) -> BrainResult<bool> {
        let Some(removed) = self.notes.remove(id) else {
            return Ok(false);
        };

        if let Err(err) = self.save() {
            self.notes.insert(id.to_string(), removed);
            return Err(err);
        }

        info!("event=note_delete module=brain status=ok note_id={id}");
        Ok(true)
    }

    /// Lists every note, most recently created first.
    pub fn list_notes(&self) -> Vec<&Note> {
        scan::sort_recent_first(self.notes.values().collect())
    }

    /// Finds notes whose title, content or tags contain `query`, ignoring case.
    pub fn search_notes(&self, query: &str) -> Vec<&Note> {
        scan::search(self.notes.values(), query)
    }

    /// Finds notes carrying `tag`, ignoring case.
    pub fn get_notes_by_tag(&self, tag: &str) -> Vec<&Note> {
        scan::filter_by_tag(self.notes.values(), tag)
    }

    /// Returns every distinct tag, sorted, case preserved.
    pub fn get_all_tags(&self) -> Vec<String> {
        scan::collect_tags(self.notes.values())
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Read failure recovered by the last load, if any.
    pub fn load_warning(&self) -> Option<&BrainError> {
        self.load_warning.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
