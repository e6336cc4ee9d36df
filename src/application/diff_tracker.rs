//! Tracks which rows of an editing session differ from the last sync.
//!
//! Three id sets are kept: `added` (rows that exist only locally), `edited`
//! (persisted rows with local changes) and `deleted` (persisted rows removed
//! locally). They stay pairwise disjoint. Each set remembers the order in
//! which ids entered it so a save replays changes in the order they were made.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdSet(Vec<String>);

impl IdSet {
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|x| x == id)
    }

    fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id.to_string());
        true
    }

    fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|x| x != id);
        self.0.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiffTracker {
    added: IdSet,
    edited: IdSet,
    deleted: IdSet,
    dirty: bool,
}

impl DiffTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_added(&mut self, id: &str) {
        self.edited.remove(id);
        self.deleted.remove(id);
        self.added.insert(id);
        self.dirty = true;
    }

    /// Rows in `added` carry their edits by being there.
    pub fn mark_edited(&mut self, id: &str) {
        if !self.added.contains(id) && !self.deleted.contains(id) {
            self.edited.insert(id);
        }
        self.dirty = true;
    }

    /// A locally added row disappears without trace; a persisted one is
    /// queued for deletion.
    pub fn mark_deleted(&mut self, id: &str) {
        if !self.added.remove(id) {
            self.deleted.insert(id);
        }
        self.edited.remove(id);
        self.dirty = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn added(&self) -> &IdSet {
        &self.added
    }

    pub fn edited(&self) -> &IdSet {
        &self.edited
    }

    pub fn deleted(&self) -> &IdSet {
        &self.deleted
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.edited.is_empty() && self.deleted.is_empty())
    }
}
