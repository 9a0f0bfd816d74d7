//! Focus index: interactive-node identity mapped to current boxes.
//!
//! Rebuilt every frame during paint, in structural order. Backs Tab
//! navigation (with wraparound) and mouse hit-testing.

use crate::layout::Rect;

/// Stable identity of an interactive node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FocusKey {
    /// An input field, identified by its binding id.
    Binding(&'static str),
    /// A click target, identified by its position in traversal order.
    Ordinal(u32),
}

/// What kind of node an entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interactive {
    /// An editable input field.
    Input,
    /// A click target.
    Clickable,
}

/// One interactive node's box for the current frame.
#[derive(Debug, Clone)]
pub struct FocusEntry {
    /// The node's stable identity.
    pub key: FocusKey,
    /// The node's box this frame.
    pub rect: Rect,
    pub(crate) kind: Interactive,
}

/// The per-frame mapping from interactive nodes to their boxes.
#[derive(Debug, Default)]
pub struct FocusIndex {
    entries: Vec<FocusEntry>,
}

impl FocusIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all entries at the start of a frame.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn push(&mut self, key: FocusKey, rect: Rect, kind: Interactive) {
        self.entries.push(FocusEntry { key, rect, kind });
    }

    /// All entries in structural order.
    pub fn entries(&self) -> &[FocusEntry] {
        &self.entries
    }

    /// Whether the index has no interactive nodes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a key is present this frame.
    pub fn contains(&self, key: &FocusKey) -> bool {
        self.entries.iter().any(|e| &e.key == key)
    }

    /// The entry after `current` in structural order, wrapping at the end.
    ///
    /// With no current focus, the first entry.
    pub fn next(&self, current: Option<&FocusKey>) -> Option<FocusKey> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = current.and_then(|key| self.entries.iter().position(|e| &e.key == key));
        let next = match idx {
            Some(i) => (i + 1) % self.entries.len(),
            None => 0,
        };
        Some(self.entries[next].key.clone())
    }

    /// The entry before `current`, wrapping at the start.
    ///
    /// With no current focus, the last entry.
    pub fn prev(&self, current: Option<&FocusKey>) -> Option<FocusKey> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = current.and_then(|key| self.entries.iter().position(|e| &e.key == key));
        let prev = match idx {
            Some(i) => (i + self.entries.len() - 1) % self.entries.len(),
            None => self.entries.len() - 1,
        };
        Some(self.entries[prev].key.clone())
    }

    /// The innermost interactive node containing a point.
    ///
    /// Entries are pushed in pre-order, so descendants follow ancestors;
    /// the last containing entry is the innermost.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<&FocusEntry> {
        self.entries.iter().rev().find(|e| e.rect.contains(x, y))
    }
}
