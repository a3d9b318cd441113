//! Key-value persistence for per-episode progress.
//!
//! One entry per (show, episode): the zero-based line index as decimal text.
//! Writes are plain overwrites; two tabs on the same episode simply race.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub trait ProgressStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: ProgressStore + ?Sized> ProgressStore for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// `"<namespace>_<show>_ep<episode>"`
pub fn progress_key(namespace: &str, show_id: &str, episode: u32) -> String {
    format!("{namespace}_{show_id}_ep{episode}")
}

/// In-memory store. Used natively and whenever the browser store is missing.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every access fails, as a blocked `localStorage` would.
    pub fn failing() -> Self {
        Self {
            entries: HashMap::new(),
            failing: true,
        }
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl ProgressStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.failing {
            return Err(StorageError::Unavailable("memory store disabled".into()));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing {
            return Err(StorageError::Unavailable("memory store disabled".into()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// `window.localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let win = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        let storage = win
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage missing".into()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl ProgressStore for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }
}
