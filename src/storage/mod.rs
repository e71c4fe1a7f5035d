//! # Storage
//!
//! Local persistence for the list collection.
//!
//! - [`kv`]: async key-value backends (files on disk, or memory)
//! - [`persistence`]: JSON encoding of the collection under one key
//! - [`save_queue`]: background worker that performs writes off the event loop

pub mod kv;
pub mod persistence;
pub mod save_queue;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use persistence::{Persistence, StorageError};
pub use save_queue::{RetryPolicy, SaveQueue};
