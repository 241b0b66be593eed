//! Undo history for the structure store.
//!
//! Each entry carries exactly what its inverse needs, so undo never has to
//! re-derive state. Entries are pushed only for transitions that succeeded.

use keystone_core::cube::Cube;
use keystone_core::types::{ActionTag, CubeId};

/// One recorded transition.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// A draft was placed with this id. The id counter stood at `id` before.
    Place { id: CubeId },
    /// A draft was deleted. Undo puts it back.
    DeleteDraft { cube: Cube },
    /// A confirmed cube was deleted. Not undoable.
    DeleteConfirmed { cube: Cube },
    /// All drafts were confirmed. `drafts` is the draft list as it was
    /// immediately before the confirm.
    ConfirmDraft { drafts: Vec<Cube> },
    /// Unstable cubes were removed by a collapse. Not undoable.
    Collapse { removed: Vec<Cube> },
}

impl HistoryEntry {
    pub fn tag(&self) -> ActionTag {
        match self {
            HistoryEntry::Place { .. } => ActionTag::Place,
            HistoryEntry::DeleteDraft { .. } => ActionTag::DeleteDraft,
            HistoryEntry::DeleteConfirmed { .. } => ActionTag::DeleteConfirmed,
            HistoryEntry::ConfirmDraft { .. } => ActionTag::ConfirmDraft,
            HistoryEntry::Collapse { .. } => ActionTag::Collapse,
        }
    }

    /// Whether undo can invert this entry. Deleting a confirmed cube and
    /// collapsing are permanent.
    pub fn is_undoable(&self) -> bool {
        !matches!(
            self,
            HistoryEntry::DeleteConfirmed { .. } | HistoryEntry::Collapse { .. }
        )
    }
}

/// LIFO stack of recorded transitions, oldest first.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Tags of all entries, oldest first.
    pub fn tags(&self) -> Vec<ActionTag> {
        self.entries.iter().map(HistoryEntry::tag).collect()
    }
}
