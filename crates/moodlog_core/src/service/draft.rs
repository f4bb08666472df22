//! Transient compose/edit form state.

use crate::model::entry::{EntryId, Mood};
use crate::model::habit::HabitSelection;

/// Entry being composed in the add form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeDraft {
    pub text: String,
    pub mood: Mood,
    pub selection: HabitSelection,
}

/// In-place edit of an existing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    /// Entry being edited.
    pub id: EntryId,
    pub text: String,
    pub mood: Mood,
    pub selection: HabitSelection,
}

/// Which form a habit toggle applies to. Each keeps its own selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionScope {
    Compose,
    Edit,
}
