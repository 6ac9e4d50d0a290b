//! Local key/value store
//!
//! A flat string-to-string map persisted as a single JSON file, playing the
//! role browser local storage plays for a web dashboard. Every write is
//! flushed to disk immediately. Nothing is encrypted.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{CallDeskError, Result};

/// Well-known storage keys
pub mod keys {
    pub const TWILIO_CONFIG: &str = "twilioConfig";
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    pub const USER: &str = "user";
}

const STORE_FILE: &str = "storage.json";
const HOME_DIR: &str = ".calldesk";

/// Default data directory, `~/.calldesk`
pub fn default_home() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CallDeskError::config("Cannot find home directory"))?;
    Ok(home.join(HOME_DIR))
}

#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl LocalStore {
    /// Open the store file; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        debug!("Opened local store {} ({} keys)", path.display(), items.len());
        Ok(Self { path, items })
    }

    /// Open `storage.json` inside `home`
    pub fn open_in(home: &Path) -> Result<Self> {
        Self::open(home.join(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.items.insert(key.to_string(), value.into());
        self.flush()
    }

    pub fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    /// Decode a JSON value stored under `key`
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_item(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, raw)
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.items)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        level: u8,
    }

    #[test]
    fn test_items_persist_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalStore::open_in(dir.path()).unwrap();
        assert!(store.get_item("missing").is_none());

        store.set_item(keys::IS_AUTHENTICATED, "true").unwrap();
        store.set_json("sample", &Sample { name: "x".into(), level: 3 }).unwrap();

        let reopened = LocalStore::open_in(dir.path()).unwrap();
        assert_eq!(reopened.get_item(keys::IS_AUTHENTICATED), Some("true"));
        let sample: Sample = reopened.get_json("sample").unwrap().unwrap();
        assert_eq!(sample, Sample { name: "x".into(), level: 3 });
    }

    #[test]
    fn test_remove_item() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalStore::open_in(dir.path()).unwrap();
        store.set_item("k", "v").unwrap();
        store.remove_item("k").unwrap();
        store.remove_item("never-set").unwrap();

        let reopened = LocalStore::open_in(dir.path()).unwrap();
        assert!(reopened.get_item("k").is_none());
    }

    #[test]
    fn test_bad_json_value_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalStore::open_in(dir.path()).unwrap();
        store.set_item("sample", "{not json").unwrap();

        let decoded: Result<Option<Sample>> = store.get_json("sample");
        assert!(matches!(decoded, Err(CallDeskError::Serialization(_))));
    }

    #[test]
    fn test_nested_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut store = LocalStore::open_in(&nested).unwrap();
        store.set_item("k", "v").unwrap();
        assert!(nested.join("storage.json").exists());
    }
}
