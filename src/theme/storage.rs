#[cfg(test)]
use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Durable key-value slot for user preferences.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`, read and written as raw strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

impl PreferenceStore for BrowserStorage {
    #[cfg(target_arch = "wasm32")]
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        local_storage()?
            .get_item(key)
            .map_err(|_| StorageError::Unavailable)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    #[cfg(target_arch = "wasm32")]
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Write(format!("{err:?}")))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self { values }
    }
}

#[cfg(test)]
impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One persisted preference. Once the backing store fails, the slot keeps the
/// value in memory for the rest of the session.
pub struct PreferenceSlot {
    key: String,
    store: Option<Box<dyn PreferenceStore>>,
    session_value: Option<String>,
}

impl PreferenceSlot {
    pub fn new(key: impl Into<String>, store: Box<dyn PreferenceStore>) -> Self {
        Self {
            key: key.into(),
            store: Some(store),
            session_value: None,
        }
    }

    #[cfg(test)]
    pub fn is_degraded(&self) -> bool {
        self.store.is_none()
    }

    pub fn read(&mut self) -> Option<String> {
        let Some(store) = self.store.as_ref() else {
            return self.session_value.clone();
        };
        match store.load(&self.key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("theme: preference read failed, using session memory: {err}");
                self.store = None;
                self.session_value.clone()
            }
        }
    }

    pub fn write(&mut self, value: &str) {
        self.session_value = Some(value.to_string());
        let Some(store) = self.store.as_mut() else {
            return;
        };
        if let Err(err) = store.save(&self.key, value) {
            tracing::warn!("theme: preference write failed, using session memory: {err}");
            self.store = None;
        }
    }

    pub fn is_set(&mut self) -> bool {
        self.read().is_some()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn save(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write("quota exceeded".to_string()))
        }
    }
}
