// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Keyed JSON settings on top of a pluggable blob store.
//!
//! Keys double as file names in the filesystem store, so they are limited
//! to lowercase ASCII letters, digits, `_` and `-`.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Raw blob storage addressed by key.
pub trait ConfigStore {
    /// Read the blob stored under `key`; [`ConfigError::NotFound`] when absent.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replace the blob stored under `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Config failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing stored under the key.
    #[error("not found")]
    NotFound,
    /// The key contains characters a store cannot address.
    #[error("invalid config key {0:?}")]
    InvalidKey(String),
    /// The platform has no per-user config directory.
    #[error("no config directory for this user")]
    NoConfigDir,
    /// Reading or writing the backing storage failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The stored blob is not valid JSON for the requested type.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    let ok = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidKey(key.to_owned()))
    }
}

/// Typed access to a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Read `key`. A missing or empty blob is `Ok(None)`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        check_key(key)?;
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound) => return Ok(None),
            Err(err) => return Err(err),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Write `value` under `key` as pretty-printed JSON.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        check_key(key)?;
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemStore(RefCell<HashMap<String, Vec<u8>>>);

    impl ConfigStore for MemStore {
        fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
            self.0.borrow().get(key).cloned().ok_or(ConfigError::NotFound)
        }

        fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
            self.0.borrow_mut().insert(key.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn missing_and_blank_keys_load_as_none() {
        let store = MemStore::default();
        store.save_raw("blank", b" \n").unwrap();
        let svc = ConfigService::new(store);
        assert!(svc.load::<u32>("absent").unwrap().is_none());
        assert!(svc.load::<u32>("blank").unwrap().is_none());
    }

    #[test]
    fn values_are_stored_as_json() {
        let svc = ConfigService::new(MemStore::default());
        svc.save("answer", &42u32).unwrap();
        assert_eq!(svc.load::<u32>("answer").unwrap(), Some(42));
        assert_eq!(svc.store().load_raw("answer").unwrap(), b"42");
    }

    #[test]
    fn corrupt_blob_surfaces_serde_error() {
        let store = MemStore::default();
        store.save_raw("bad", b"{not json").unwrap();
        let svc = ConfigService::new(store);
        assert!(matches!(svc.load::<u32>("bad"), Err(ConfigError::Serde(_))));
    }

    #[test]
    fn keys_that_are_not_file_safe_are_rejected() {
        let svc = ConfigService::new(MemStore::default());
        for key in ["", "../prefs", "Client", "a b"] {
            assert!(matches!(
                svc.save(key, &1u8),
                Err(ConfigError::InvalidKey(_))
            ));
            assert!(matches!(svc.load::<u8>(key), Err(ConfigError::InvalidKey(_))));
        }
    }
}
