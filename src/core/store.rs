//! # List Store
//!
//! The in-memory collection of lists and the only place it gets mutated.
//!
//! Every operation is total. An unknown list id, an out-of-range task index
//! or a blank submission leaves the collection untouched and reports
//! [`Outcome::Unchanged`] instead of failing. Callers use the outcome to
//! decide whether a persistence write is needed.

use crate::core::ids::IdSource;
use crate::core::model::{ListCollection, ListId, Task, TodoList};

/// Whether an operation touched the collection.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

impl Outcome {
    pub fn changed(self) -> bool {
        self == Outcome::Changed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListStore {
    lists: ListCollection,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lists(lists: ListCollection) -> Self {
        Self { lists }
    }

    pub fn lists(&self) -> &[TodoList] {
        &self.lists
    }

    pub fn get(&self, list_id: ListId) -> Option<&TodoList> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    pub fn task(&self, list_id: ListId, index: usize) -> Option<&Task> {
        self.get(list_id).and_then(|l| l.tasks.get(index))
    }

    /// Owned copy of the whole collection, for handing to the save queue.
    pub fn snapshot(&self) -> ListCollection {
        self.lists.clone()
    }

    fn get_mut(&mut self, list_id: ListId) -> Option<&mut TodoList> {
        self.lists.iter_mut().find(|l| l.id == list_id)
    }

    /// Append a new empty list. Returns the id it was given, or `None` if the
    /// name was blank.
    pub fn add_list(&mut self, name: &str, ids: &mut dyn IdSource) -> Option<ListId> {
        if name.trim().is_empty() {
            return None;
        }
        let mut id = ids.next_id();
        // An IdSource that was never told about loaded ids could collide.
        while self.get(id).is_some() {
            ids.reserve(id);
            id = ids.next_id();
        }
        self.lists.push(TodoList::new(id, name));
        Some(id)
    }

    /// Append `text` as an open task and clear the list's input buffer.
    pub fn add_task(&mut self, list_id: ListId, text: &str) -> Outcome {
        if text.trim().is_empty() {
            return Outcome::Unchanged;
        }
        let Some(list) = self.get_mut(list_id) else {
            return Outcome::Unchanged;
        };
        list.tasks.push(Task::new(text));
        list.new_task_text.clear();
        Outcome::Changed
    }

    /// Add whatever is currently in the list's input buffer.
    pub fn submit_task(&mut self, list_id: ListId) -> Outcome {
        let Some(text) = self.get(list_id).map(|l| l.new_task_text.clone()) else {
            return Outcome::Unchanged;
        };
        self.add_task(list_id, &text)
    }

    pub fn toggle_task(&mut self, list_id: ListId, index: usize) -> Outcome {
        match self.get_mut(list_id).and_then(|l| l.tasks.get_mut(index)) {
            Some(task) => {
                task.completed = !task.completed;
                Outcome::Changed
            }
            None => Outcome::Unchanged,
        }
    }

    /// Remove one task. A list left with no tasks is removed along with it.
    pub fn remove_task(&mut self, list_id: ListId, index: usize) -> Outcome {
        let Some(pos) = self.lists.iter().position(|l| l.id == list_id) else {
            return Outcome::Unchanged;
        };
        let list = &mut self.lists[pos];
        if index >= list.tasks.len() {
            return Outcome::Unchanged;
        }
        list.tasks.remove(index);
        if list.tasks.is_empty() {
            self.lists.remove(pos);
        }
        Outcome::Changed
    }

    /// Remove a list regardless of how many tasks it holds.
    pub fn delete_list(&mut self, list_id: ListId) -> Outcome {
        let before = self.lists.len();
        self.lists.retain(|l| l.id != list_id);
        if self.lists.len() == before {
            Outcome::Unchanged
        } else {
            Outcome::Changed
        }
    }

    /// Replace the list's input buffer verbatim.
    pub fn set_new_task_text(&mut self, list_id: ListId, text: &str) -> Outcome {
        match self.get_mut(list_id) {
            Some(list) if list.new_task_text != text => {
                list.new_task_text = text.to_string();
                Outcome::Changed
            }
            _ => Outcome::Unchanged,
        }
    }

    /// Overwrite a task's text. Rejects blank text so a task is never emptied.
    pub fn set_task_text(&mut self, list_id: ListId, index: usize, text: &str) -> Outcome {
        if text.trim().is_empty() {
            return Outcome::Unchanged;
        }
        match self.get_mut(list_id).and_then(|l| l.tasks.get_mut(index)) {
            Some(task) if task.text != text => {
                task.text = text.to_string();
                Outcome::Changed
            }
            _ => Outcome::Unchanged,
        }
    }
}
