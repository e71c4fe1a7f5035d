//! # List Id Generation
//!
//! Ids are issued by an injected [`IdSource`] so creation stays deterministic
//! under test. The default [`ClockIds`] uses wall-clock milliseconds but never
//! repeats or goes backwards, even when two lists are created within the same
//! millisecond or the clock is adjusted.
//!
//! Once a reserved id leaves no room above it (a loaded list at `i64::MAX`),
//! both sources hand out small ids counting up from 1 instead.
//! `ListStore::add_list` skips any of those already taken.

use chrono::Utc;
use log::warn;

use crate::core::model::ListId;

/// A source of list ids that are unique for the life of the process.
pub trait IdSource: Send {
    /// Issue the next id.
    fn next_id(&mut self) -> ListId;

    /// Make sure future ids are strictly greater than `id`.
    /// Called for every list loaded from storage.
    fn reserve(&mut self, id: ListId);
}

/// Ids issued after the space above the largest reserved id ran out.
#[derive(Debug, Default)]
struct Fallback {
    last: ListId,
}

impl Fallback {
    fn next_id(&mut self) -> ListId {
        self.last = self.last.saturating_add(1);
        self.last
    }
}

/// Millisecond timestamps, bumped past the last issued value on collision.
#[derive(Debug, Default)]
pub struct ClockIds {
    last: ListId,
    fallback: Option<Fallback>,
}

impl ClockIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for ClockIds {
    fn next_id(&mut self) -> ListId {
        if self.fallback.is_none() {
            match self.last.checked_add(1) {
                Some(bumped) => {
                    self.last = Utc::now().timestamp_millis().max(bumped);
                    return self.last;
                }
                None => {
                    warn!("List ids exhausted above {}; reusing low ids", self.last);
                    self.fallback = Some(Fallback::default());
                }
            }
        }
        self.fallback.get_or_insert_default().next_id()
    }

    fn reserve(&mut self, id: ListId) {
        self.last = self.last.max(id);
    }
}

/// Counter starting at 1. Used in tests and anywhere ids must be predictable.
#[derive(Debug)]
pub struct SequentialIds {
    /// `None` once `ListId::MAX` has been issued or reserved.
    next: Option<ListId>,
    fallback: Fallback,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self {
            next: Some(1),
            fallback: Fallback::default(),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> ListId {
        match self.next {
            Some(id) => {
                self.next = id.checked_add(1);
                id
            }
            None => self.fallback.next_id(),
        }
    }

    fn reserve(&mut self, id: ListId) {
        self.next = match (self.next, id.checked_add(1)) {
            (Some(next), Some(above)) => Some(next.max(above)),
            _ => None,
        };
    }
}
