//! # Application State
//!
//! Core business state for Tally. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── store: ListStore              // every list and task
//! ├── edit: Option<EditSession>     // task being edited, if any
//! ├── ids: Box<dyn IdSource>        // issues list ids
//! └── status_message: String        // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::edit::EditSession;
use crate::core::ids::{ClockIds, IdSource};
use crate::core::model::ListCollection;
use crate::core::store::ListStore;

pub struct App {
    pub store: ListStore,
    pub edit: Option<EditSession>,
    pub ids: Box<dyn IdSource>,
    pub status_message: String,
}

impl App {
    pub fn new(ids: Box<dyn IdSource>) -> Self {
        Self {
            store: ListStore::new(),
            edit: None,
            ids,
            status_message: String::from("Welcome to Tally!"),
        }
    }

    /// Build the app around a collection restored from storage, using
    /// clock-based ids.
    pub fn restored(lists: ListCollection) -> Self {
        let mut app = Self::new(Box::new(ClockIds::new()));
        app.replace_lists(lists);
        app
    }

    /// Swap in a whole collection. Id generation is moved past every loaded
    /// id and any open edit is dropped.
    pub fn replace_lists(&mut self, lists: ListCollection) {
        for list in &lists {
            self.ids.reserve(list.id);
        }
        self.store = ListStore::from_lists(lists);
        self.edit = None;
    }
}
