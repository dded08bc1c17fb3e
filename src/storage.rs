//! Session-scoped key/value storage.
//!
//! The browser build backs this with `window.sessionStorage`
//! (see `platform`); native builds and tests use [`MemoryStorage`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("storage unavailable: {0}")]
pub struct StorageError(pub String);

pub trait SessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process store. Clones share the same map, so a test can keep a handle
/// and inspect what the controller wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        for (k, v) in items {
            store.items.borrow_mut().insert(k.to_string(), v.to_string());
        }
        store
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.items.borrow().clone()
    }
}

impl SessionStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store that always fails, standing in for disabled storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStorage;

impl SessionStore for UnavailableStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError("session storage disabled".into()))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError("session storage disabled".into()))
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError("session storage disabled".into()))
    }
}
