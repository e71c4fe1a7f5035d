//! # List Persistence
//!
//! Reads and writes the whole list collection as one JSON value under a
//! single key. Every save is a full snapshot that replaces the previous one.
//!
//! A load that finds garbage does not try to salvage part of it. Bad JSON,
//! the wrong shape or duplicate list ids all fail with a [`StorageError`].
//! [`Persistence::load_or_empty`] then turns that failure into an empty
//! collection.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::core::model::ListCollection;
use crate::storage::kv::KeyValueStore;

#[derive(Debug)]
pub enum StorageError {
    /// The backing store could not be read or written.
    Io(io::Error),
    /// The collection could not be encoded.
    Serialize(serde_json::Error),
    /// The stored value is not a list collection.
    Deserialize(serde_json::Error),
    /// The stored value parsed but breaks a collection invariant.
    Invalid(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "storage I/O error: {e}"),
            StorageError::Serialize(e) => write!(f, "could not encode lists: {e}"),
            StorageError::Deserialize(e) => write!(f, "saved lists are unreadable: {e}"),
            StorageError::Invalid(msg) => write!(f, "saved lists are invalid: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialize(e) | StorageError::Deserialize(e) => Some(e),
            StorageError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Load the saved collection. `Ok(None)` means nothing was ever saved.
    pub async fn load(&self) -> Result<Option<ListCollection>, StorageError> {
        let Some(json) = self.store.get(&self.key).await? else {
            debug!("No saved lists under '{}'", self.key);
            return Ok(None);
        };
        let lists: ListCollection =
            serde_json::from_str(&json).map_err(StorageError::Deserialize)?;
        validate(&lists)?;
        info!("Loaded {} list(s) from '{}'", lists.len(), self.key);
        Ok(Some(lists))
    }

    /// Load, treating any failure the same as "nothing saved".
    pub async fn load_or_empty(&self) -> ListCollection {
        match self.load().await {
            Ok(lists) => lists.unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring saved lists under '{}': {}", self.key, e);
                ListCollection::new()
            }
        }
    }

    /// Overwrite the stored collection with `lists`.
    pub async fn save(&self, lists: &ListCollection) -> Result<(), StorageError> {
        let json = serde_json::to_string(lists).map_err(StorageError::Serialize)?;
        self.store.set(&self.key, &json).await?;
        debug!("Saved {} list(s) to '{}'", lists.len(), self.key);
        Ok(())
    }
}

fn validate(lists: &ListCollection) -> Result<(), StorageError> {
    let mut seen = HashSet::new();
    for list in lists {
        if !seen.insert(list.id) {
            return Err(StorageError::Invalid(format!("duplicate list id {}", list.id)));
        }
    }
    Ok(())
}
