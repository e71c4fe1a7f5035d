//! # Actions
//!
//! Everything that can happen in Tally becomes an `Action`.
//! User presses Enter on the new-list row? That's `Action::AddList(name)`.
//! A background save gives up? That's `Action::SaveFailed(reason)`.
//!
//! The `update()` function takes the current state and an action,
//! applies it, and reports what the caller has to do next as an `Effect`.
//! No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Any action that changes the list collection yields `Effect::Persist`.
//! The event loop answers that by queueing a snapshot for the save worker.

use log::debug;

use crate::core::edit;
use crate::core::model::ListId;
use crate::core::state::App;
use crate::core::store::Outcome;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddList(String),
    /// Add the list's input buffer as a new task.
    SubmitTask(ListId),
    SetNewTaskText { list_id: ListId, text: String },
    ToggleTask { list_id: ListId, task_index: usize },
    RemoveTask { list_id: ListId, task_index: usize },
    DeleteList(ListId),
    StartEditing { list_id: ListId, task_index: usize },
    SetEditText(String),
    SaveEdit,
    CancelEdit,
    /// The save worker exhausted its retries.
    SaveFailed(String),
    /// A write succeeded after an earlier `SaveFailed`.
    SaveRecovered,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The collection changed and should be written out.
    Persist,
    Quit,
}

impl From<Outcome> for Effect {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Changed => Effect::Persist,
            Outcome::Unchanged => Effect::None,
        }
    }
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::AddList(name) => match app.store.add_list(&name, app.ids.as_mut()) {
            Some(id) => {
                debug!("Created list {} ({})", id, name.trim());
                app.status_message = format!("Added list \"{}\"", name.trim());
                Effect::Persist
            }
            None => Effect::None,
        },
        Action::SubmitTask(list_id) => app.store.submit_task(list_id).into(),
        Action::SetNewTaskText { list_id, text } => {
            app.store.set_new_task_text(list_id, &text).into()
        }
        Action::ToggleTask {
            list_id,
            task_index,
        } => app.store.toggle_task(list_id, task_index).into(),
        Action::RemoveTask {
            list_id,
            task_index,
        } => {
            let list_survives = app
                .store
                .get(list_id)
                .is_some_and(|l| l.tasks.len() > 1);
            let outcome = app.store.remove_task(list_id, task_index);
            if outcome.changed() {
                drop_edit_in(app, list_id);
                if !list_survives {
                    app.status_message = "List emptied and removed".to_string();
                }
            }
            outcome.into()
        }
        Action::DeleteList(list_id) => {
            let name = app.store.get(list_id).map(|l| l.name.clone());
            let outcome = app.store.delete_list(list_id);
            if outcome.changed() {
                drop_edit_in(app, list_id);
                if let Some(name) = name {
                    app.status_message = format!("Deleted list \"{}\"", name);
                }
            }
            outcome.into()
        }
        Action::StartEditing {
            list_id,
            task_index,
        } => {
            // Only open a session on a task that exists
            if let Some(task) = app.store.task(list_id, task_index) {
                let current = task.text.clone();
                edit::start_editing(&mut app.edit, list_id, task_index, &current);
            }
            Effect::None
        }
        Action::SetEditText(text) => {
            edit::set_edit_text(&mut app.edit, &text);
            Effect::None
        }
        Action::SaveEdit => edit::save_edit(&mut app.edit, &mut app.store).into(),
        Action::CancelEdit => {
            edit::cancel_edit(&mut app.edit);
            Effect::None
        }
        Action::SaveFailed(reason) => {
            app.status_message = format!("Save failed: {}", reason);
            Effect::None
        }
        Action::SaveRecovered => {
            app.status_message = "All changes saved".to_string();
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// Task positions in `list_id` may have shifted, so an open edit there can no
/// longer be trusted to point at the right task.
fn drop_edit_in(app: &mut App, list_id: ListId) {
    if app.edit.as_ref().is_some_and(|e| e.list_id == list_id) {
        debug!("Dropping edit session in list {}", list_id);
        app.edit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Task;
    use crate::test_support::test_app;

    fn app_with_list(name: &str) -> (App, ListId) {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::AddList(name.to_string())), Effect::Persist);
        let id = app.store.lists()[0].id;
        (app, id)
    }

    fn add_task(app: &mut App, list_id: ListId, text: &str) {
        update(
            app,
            Action::SetNewTaskText {
                list_id,
                text: text.to_string(),
            },
        );
        assert_eq!(update(app, Action::SubmitTask(list_id)), Effect::Persist);
    }

    #[test]
    fn test_blank_list_name_has_no_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::AddList("   ".into())), Effect::None);
        assert!(app.store.lists().is_empty());
    }

    #[test]
    fn test_groceries_scenario() {
        let (mut app, id) = app_with_list("Groceries");
        add_task(&mut app, id, "Milk");
        assert_eq!(
            update(&mut app, Action::ToggleTask { list_id: id, task_index: 0 }),
            Effect::Persist
        );

        let lists = app.store.lists();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name, "Groceries");
        assert_eq!(
            lists[0].tasks,
            vec![Task {
                text: "Milk".into(),
                completed: true
            }]
        );
    }

    #[test]
    fn test_typing_into_buffer_persists() {
        let (mut app, id) = app_with_list("Groceries");
        let effect = update(
            &mut app,
            Action::SetNewTaskText {
                list_id: id,
                text: "Mi".into(),
            },
        );
        assert_eq!(effect, Effect::Persist);
    }

    #[test]
    fn test_invalid_targets_have_no_effect() {
        let (mut app, id) = app_with_list("Groceries");
        assert_eq!(update(&mut app, Action::SubmitTask(id)), Effect::None);
        assert_eq!(
            update(&mut app, Action::ToggleTask { list_id: id, task_index: 3 }),
            Effect::None
        );
        assert_eq!(
            update(&mut app, Action::RemoveTask { list_id: 77, task_index: 0 }),
            Effect::None
        );
        assert_eq!(update(&mut app, Action::DeleteList(77)), Effect::None);
    }

    #[test]
    fn test_removing_last_task_removes_list() {
        let (mut app, id) = app_with_list("Groceries");
        add_task(&mut app, id, "Milk");
        update(&mut app, Action::RemoveTask { list_id: id, task_index: 0 });
        assert!(app.store.get(id).is_none());
        assert_eq!(app.status_message, "List emptied and removed");
    }

    #[test]
    fn test_cancel_edit_scenario() {
        let (mut app, id) = app_with_list("Groceries");
        add_task(&mut app, id, "Milk");

        update(&mut app, Action::StartEditing { list_id: id, task_index: 0 });
        update(&mut app, Action::SetEditText("Bread".into()));
        assert_eq!(update(&mut app, Action::CancelEdit), Effect::None);

        assert_eq!(app.store.task(id, 0).unwrap().text, "Milk");
        assert!(app.edit.is_none());
    }

    #[test]
    fn test_save_edit_persists_only_real_changes() {
        let (mut app, id) = app_with_list("Groceries");
        add_task(&mut app, id, "Milk");

        update(&mut app, Action::StartEditing { list_id: id, task_index: 0 });
        assert_eq!(update(&mut app, Action::SaveEdit), Effect::None);

        update(&mut app, Action::StartEditing { list_id: id, task_index: 0 });
        update(&mut app, Action::SetEditText(" Bread ".into()));
        assert_eq!(update(&mut app, Action::SaveEdit), Effect::Persist);
        assert_eq!(app.store.task(id, 0).unwrap().text, "Bread");
    }

    #[test]
    fn test_start_editing_missing_task_opens_nothing() {
        let (mut app, id) = app_with_list("Groceries");
        update(&mut app, Action::StartEditing { list_id: id, task_index: 0 });
        assert!(app.edit.is_none());
    }

    #[test]
    fn test_removal_in_edited_list_drops_session() {
        let (mut app, id) = app_with_list("Groceries");
        add_task(&mut app, id, "Milk");
        add_task(&mut app, id, "Eggs");

        update(&mut app, Action::StartEditing { list_id: id, task_index: 1 });
        update(&mut app, Action::RemoveTask { list_id: id, task_index: 0 });
        assert!(app.edit.is_none());
    }

    #[test]
    fn test_delete_list_drops_session() {
        let (mut app, id) = app_with_list("Groceries");
        add_task(&mut app, id, "Milk");
        update(&mut app, Action::StartEditing { list_id: id, task_index: 0 });
        assert_eq!(update(&mut app, Action::DeleteList(id)), Effect::Persist);
        assert!(app.edit.is_none());
        assert_eq!(app.status_message, "Deleted list \"Groceries\"");
    }

    #[test]
    fn test_save_failed_sets_status() {
        let mut app = test_app();
        let effect = update(&mut app, Action::SaveFailed("disk full".into()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.status_message, "Save failed: disk full");
    }

    #[test]
    fn test_save_recovered_clears_failure() {
        let mut app = test_app();
        update(&mut app, Action::SaveFailed("disk full".into()));
        assert_eq!(update(&mut app, Action::SaveRecovered), Effect::None);
        assert_eq!(app.status_message, "All changes saved");
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
