//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::core::ids::SequentialIds;
use crate::core::model::{ListCollection, Task, TodoList};
use crate::core::state::App;
use crate::storage::kv::{KeyValueStore, MemoryStore};

/// Creates a test App with predictable list ids (1, 2, 3, ...).
pub fn test_app() -> App {
    App::new(Box::new(SequentialIds::new()))
}

/// A small collection exercising every persisted field.
pub fn sample_lists() -> ListCollection {
    let mut groceries = TodoList::new(1, "Groceries");
    groceries.tasks.push(Task::new("Milk"));
    groceries.tasks.push(Task {
        text: "Bread".to_string(),
        completed: true,
    });
    groceries.new_task_text = "Egg".to_string();

    let mut work = TodoList::new(2, "Work");
    work.tasks.push(Task::new("Write report"));

    vec![groceries, work]
}

/// A store whose first `n` writes fail, for exercising save retries.
pub struct FlakyStore {
    inner: MemoryStore,
    failures_left: AtomicU32,
    attempts: AtomicU32,
}

impl FlakyStore {
    pub fn failing_first(n: u32) -> Self {
        Self {
            inner: MemoryStore::new(),
            failures_left: AtomicU32::new(n),
            attempts: AtomicU32::new(0),
        }
    }

    pub fn write_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(io::Error::other("disk unavailable"));
        }
        self.inner.set(key, value).await
    }
}
