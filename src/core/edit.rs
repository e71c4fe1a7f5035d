//! # Edit Session
//!
//! At most one task is being edited at a time. The session holds the
//! provisional text. The task itself is only touched on [`save_edit`].

use crate::core::model::ListId;
use crate::core::store::{ListStore, Outcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub list_id: ListId,
    pub task_index: usize,
    pub edit_text: String,
}

impl EditSession {
    pub fn targets(&self, list_id: ListId, task_index: usize) -> bool {
        self.list_id == list_id && self.task_index == task_index
    }
}

/// Begin editing a task. Any session already open is replaced and its
/// unsaved text is dropped.
pub fn start_editing(
    session: &mut Option<EditSession>,
    list_id: ListId,
    task_index: usize,
    current_text: &str,
) {
    *session = Some(EditSession {
        list_id,
        task_index,
        edit_text: current_text.to_string(),
    });
}

pub fn set_edit_text(session: &mut Option<EditSession>, text: &str) {
    if let Some(edit) = session.as_mut() {
        edit.edit_text = text.to_string();
    }
}

/// Commit the trimmed edit text and close the session.
///
/// Blank text is discarded and the task keeps its old text. The session is
/// closed either way.
pub fn save_edit(session: &mut Option<EditSession>, store: &mut ListStore) -> Outcome {
    let Some(edit) = session.take() else {
        return Outcome::Unchanged;
    };
    store.set_task_text(edit.list_id, edit.task_index, edit.edit_text.trim())
}

pub fn cancel_edit(session: &mut Option<EditSession>) {
    *session = None;
}
