//! # Data Model
//!
//! ```text
//! ListCollection = Vec<TodoList>
//! TodoList
//! ├── id: ListId             // unique within the collection
//! ├── name: String           // set once at creation
//! ├── tasks: Vec<Task>       // insertion order = display order
//! └── new_task_text: String  // add-task input buffer (persisted)
//! Task
//! ├── text: String
//! └── completed: bool
//! ```
//!
//! Tasks have no id of their own. They are addressed by position within
//! their owning list.
//!
//! The serde layout is the on-disk format: a JSON array of lists with a
//! camelCase `newTaskText` field. There is no schema version.

use serde::{Deserialize, Serialize};

/// List identifier. Issued by an [`IdSource`](crate::core::ids::IdSource).
pub type ListId = i64;

/// All lists, in creation order.
pub type ListCollection = Vec<TodoList>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub new_task_text: String,
}

impl TodoList {
    pub fn new(id: ListId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tasks: Vec::new(),
            new_task_text: String::new(),
        }
    }

    /// Number of completed tasks, for the card header.
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}
