//! Persistence of the last connected wallet, keyed by HD path.

use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::wallet::chain::DEFAULT_HDPATH;
use crate::wallet::types::ConnectedWallet;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Key → JSON record storage.
pub trait WalletStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl WalletStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.inner.get(key).map(|r| r.value().clone()))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.inner.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key);
        Ok(())
    }
}

/// JSON file holding every record; rewritten on each change.
///
/// The in-memory view only changes once the file has been replaced, so a failed
/// write leaves both untouched.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, Value>>,
}

impl FileStore {
    /// Open `path`, loading existing records if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let map: HashMap<String, Value> = serde_json::from_reader(reader)?;
            tracing::debug!(path = %path.display(), records = map.len(), "wallet store loaded");
            map
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write `entries` to a sibling temp file, then rename it over the store.
    fn save(&self, entries: &HashMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        let written = File::create(&temp).map_err(StoreError::from).and_then(|file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, entries)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(())
        });
        if let Err(e) = written.and_then(|()| Ok(std::fs::rename(&temp, &self.path)?)) {
            let _ = std::fs::remove_file(&temp);
            return Err(e);
        }
        Ok(())
    }
}

impl WalletStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);
        self.save(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.save(&updated)?;
        *entries = updated;
        Ok(())
    }
}

fn store_key(hd_path: Option<&str>) -> &str {
    hd_path.filter(|p| !p.is_empty()).unwrap_or(DEFAULT_HDPATH)
}

/// Last wallet connected under `hd_path`; the empty record when none is
/// stored or the stored value cannot be read.
pub fn read_wallet(store: &dyn WalletStore, hd_path: Option<&str>) -> ConnectedWallet {
    let key = store_key(hd_path);
    match store.get(key) {
        Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "ignoring malformed wallet record");
            ConnectedWallet::default()
        }),
        Ok(None) => ConnectedWallet::default(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "wallet store read failed");
            ConnectedWallet::default()
        }
    }
}

pub fn write_wallet(
    store: &dyn WalletStore,
    connected: &ConnectedWallet,
    hd_path: Option<&str>,
) -> Result<(), StoreError> {
    store.set(store_key(hd_path), serde_json::to_value(connected)?)
}

pub fn remove_wallet(store: &dyn WalletStore, hd_path: Option<&str>) -> Result<(), StoreError> {
    store.remove(store_key(hd_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::types::WalletName;

    fn keplr() -> ConnectedWallet {
        ConnectedWallet {
            wallet: Some(WalletName::Keplr),
            cosmos_address: "cosmos1keplr".to_string(),
            hd_path: None,
        }
    }

    #[test]
    fn test_absent_record_is_default() {
        let store = MemoryStore::new();
        assert!(read_wallet(&store, None).is_empty());
    }

    #[test]
    fn test_default_key_is_default_hd_path() {
        let store = MemoryStore::new();
        write_wallet(&store, &keplr(), None).unwrap();
        assert_eq!(read_wallet(&store, Some(DEFAULT_HDPATH)), keplr());
        assert!(read_wallet(&store, Some("m/44'/60'/0'/0/0")).is_empty());

        remove_wallet(&store, None).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_record_reads_as_default() {
        let store = MemoryStore::new();
        store.set(DEFAULT_HDPATH, Value::from(42)).unwrap();
        assert!(read_wallet(&store, None).is_empty());
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallets.json");

        let store = FileStore::open(&path).unwrap();
        write_wallet(&store, &keplr(), Some("m/44'/118'/0'/0/1")).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(read_wallet(&reopened, Some("m/44'/118'/0'/0/1")), keplr());
        remove_wallet(&reopened, Some("m/44'/118'/0'/0/1")).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert!(read_wallet(&reopened, Some("m/44'/118'/0'/0/1")).is_empty());
    }

    #[test]
    fn test_file_store_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallets.json");

        let store = FileStore::open(&path).unwrap();
        write_wallet(&store, &keplr(), None).unwrap();
        write_wallet(&store, &keplr(), Some("m/44'/118'/0'/0/1")).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("wallets.json")]);
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let store = FileStore::open(blocker.join("wallets.json")).unwrap();
        assert!(write_wallet(&store, &keplr(), None).is_err());
        assert!(read_wallet(&store, None).is_empty());
    }
}
