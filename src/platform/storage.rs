//! Key/value storage
//!
//! The browser build persists to LocalStorage; native builds and tests use
//! an in-memory map with the same string-in, string-out contract.

use std::collections::HashMap;

use crate::error::GameError;

/// String key/value store in the shape of the Web Storage API
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, GameError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), GameError>;
}

/// Volatile storage, lost when the process exits
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, GameError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, GameError> {
        let inner = web_sys::window()
            .ok_or_else(|| GameError::Storage("no window".to_string()))?
            .local_storage()
            .map_err(|e| GameError::Storage(format!("{e:?}")))?
            .ok_or_else(|| GameError::Storage("LocalStorage disabled".to_string()))?;
        Ok(Self { inner })
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, GameError> {
        self.inner
            .get_item(key)
            .map_err(|e| GameError::Storage(format!("{e:?}")))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        self.inner
            .set_item(key, value)
            .map_err(|e| GameError::Storage(format!("{e:?}")))
    }
}
