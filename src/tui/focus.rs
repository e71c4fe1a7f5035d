//! # Focus
//!
//! The screen is a vertical sequence of focusable rows:
//!
//! ```text
//! NewList                  "New list: ____"
//! ListHeader(a)            ┌ Groceries ─────┐
//! Task(a, 0)               │ [ ] Milk       │
//! Task(a, 1)               │ [x] Bread      │
//! TaskInput(a)             │ + ____         │
//! ListHeader(b)            ┌ Work ──────────┐
//! ...
//! ```
//!
//! Focus is kept as a [`Row`] rather than a position, so adding a task above
//! the cursor does not move it. When the focused row disappears (its list was
//! removed), focus falls back to whatever now sits at the old position.

use crate::core::model::{ListId, TodoList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    NewList,
    ListHeader(ListId),
    Task(ListId, usize),
    TaskInput(ListId),
}

impl Row {
    pub fn list_id(self) -> Option<ListId> {
        match self {
            Row::NewList => None,
            Row::ListHeader(id) | Row::Task(id, _) | Row::TaskInput(id) => Some(id),
        }
    }
}

/// Every focusable row, top to bottom.
pub fn rows(lists: &[TodoList]) -> Vec<Row> {
    let task_count: usize = lists.iter().map(|l| l.tasks.len()).sum();
    let mut rows = Vec::with_capacity(1 + lists.len() * 2 + task_count);
    rows.push(Row::NewList);
    for list in lists {
        rows.push(Row::ListHeader(list.id));
        rows.extend((0..list.tasks.len()).map(|i| Row::Task(list.id, i)));
        rows.push(Row::TaskInput(list.id));
    }
    rows
}

#[derive(Debug, Clone)]
pub struct FocusState {
    current: Row,
    /// Position of `current` the last time it was resolved.
    last_index: usize,
}

impl Default for FocusState {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusState {
    pub fn new() -> Self {
        Self {
            current: Row::NewList,
            last_index: 0,
        }
    }

    pub fn current(&self) -> Row {
        self.current
    }

    #[cfg(test)]
    pub fn set(&mut self, row: Row) {
        self.current = row;
    }

    /// Re-anchor focus against the current row set. Returns the focused row.
    pub fn resolve(&mut self, rows: &[Row]) -> Row {
        match rows.iter().position(|r| *r == self.current) {
            Some(index) => self.last_index = index,
            None => {
                let index = self.last_index.min(rows.len().saturating_sub(1));
                self.current = rows.get(index).copied().unwrap_or(Row::NewList);
                self.last_index = index;
            }
        }
        self.current
    }

    /// Move by `delta` rows, clamped to the ends. Returns the new row.
    pub fn step(&mut self, rows: &[Row], delta: isize) -> Row {
        self.resolve(rows);
        let max = rows.len().saturating_sub(1) as isize;
        let index = (self.last_index as isize + delta).clamp(0, max) as usize;
        self.last_index = index;
        self.current = rows.get(index).copied().unwrap_or(Row::NewList);
        self.current
    }
}
