//! Document store — versioned JSON documents, one collection per entity.
//!
//! Every read returns the document together with a version token; every
//! read-modify-write hands the token back. A mismatch means another round
//! got there first (`StoreError::VersionConflict`) and the caller re-reads
//! and retries, so concurrent sessions cannot silently lose updates.
//!
//! Two backends: an in-memory map for tests and benches, and a directory of
//! pretty-printed JSON files written atomically via temp-file rename.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use thiserror::Error;

/// Errors from store round trips.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("version conflict on {collection}/{key}: expected {expected}, found {found}")]
    VersionConflict {
        collection: String,
        key: String,
        expected: u64,
        found: u64,
    },
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store (de)serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A document plus its optimistic-concurrency token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedDoc {
    pub version: u64,
    pub data: Value,
}

/// Expectation attached to a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// Unconditional write (used by initialize, which replaces the session).
    Any,
    /// Compare-and-swap against the version returned by the preceding read.
    Version(u64),
}

/// Document-oriented store with per-document versions.
pub trait Store: Send + Sync {
    fn get(&self, collection: &str, key: &str) -> Result<Option<VersionedDoc>, StoreError>;

    /// Write a document, returning its new version. With `Expected::Version`
    /// the write only succeeds when the current version matches (a missing
    /// document counts as version 0).
    fn put(
        &self,
        collection: &str,
        key: &str,
        data: Value,
        expected: Expected,
    ) -> Result<u64, StoreError>;

    fn list_keys(&self, collection: &str) -> Result<Vec<String>, StoreError>;
}

/// Typed read: deserialize the document body, keeping the version alongside.
pub fn load<T: DeserializeOwned>(
    store: &dyn Store,
    collection: &str,
    key: &str,
) -> Result<Option<(u64, T)>, StoreError> {
    match store.get(collection, key)? {
        Some(doc) => {
            let value: T = serde_json::from_value(doc.data)?;
            Ok(Some((doc.version, value)))
        }
        None => Ok(None),
    }
}

/// Typed write.
pub fn save<T: Serialize>(
    store: &dyn Store,
    collection: &str,
    key: &str,
    value: &T,
    expected: Expected,
) -> Result<u64, StoreError> {
    store.put(collection, key, serde_json::to_value(value)?, expected)
}

fn check_expected(
    collection: &str,
    key: &str,
    current: u64,
    expected: Expected,
) -> Result<(), StoreError> {
    match expected {
        Expected::Any => Ok(()),
        Expected::Version(v) if v == current => Ok(()),
        Expected::Version(v) => Err(StoreError::VersionConflict {
            collection: collection.to_string(),
            key: key.to_string(),
            expected: v,
            found: current,
        }),
    }
}

// ─── In-memory backend ───────────────────────────────────────────────

/// Map-backed store for tests and benches.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<(String, String), VersionedDoc>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, collection: &str, key: &str) -> Result<Option<VersionedDoc>, StoreError> {
        let docs = self.docs.read().unwrap();
        Ok(docs
            .get(&(collection.to_string(), key.to_string()))
            .cloned())
    }

    fn put(
        &self,
        collection: &str,
        key: &str,
        data: Value,
        expected: Expected,
    ) -> Result<u64, StoreError> {
        let mut docs = self.docs.write().unwrap();
        let entry_key = (collection.to_string(), key.to_string());
        let current = docs.get(&entry_key).map_or(0, |doc| doc.version);
        check_expected(collection, key, current, expected)?;
        let version = current + 1;
        docs.insert(entry_key, VersionedDoc { version, data });
        Ok(version)
    }

    fn list_keys(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let docs = self.docs.read().unwrap();
        let mut keys: Vec<String> = docs
            .keys()
            .filter(|(c, _)| c == collection)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

// ─── JSON-file backend ───────────────────────────────────────────────

/// One directory per collection, one JSON file per document.
///
/// The version lives inside the envelope. Writes go through a temp file and
/// an atomic rename; a process-wide mutex serializes the read-check-write
/// window against other threads of this process.
pub struct JsonFileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    fn doc_path(&self, collection: &str, key: &str) -> PathBuf {
        self.root.join(collection).join(format!("{key}.json"))
    }

    fn read_doc(&self, path: &Path) -> Result<Option<VersionedDoc>, StoreError> {
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }
}

impl Store for JsonFileStore {
    fn get(&self, collection: &str, key: &str) -> Result<Option<VersionedDoc>, StoreError> {
        self.read_doc(&self.doc_path(collection, key))
    }

    fn put(
        &self,
        collection: &str,
        key: &str,
        data: Value,
        expected: Expected,
    ) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().unwrap();

        let path = self.doc_path(collection, key);
        let current = self.read_doc(&path)?.map_or(0, |doc| doc.version);
        check_expected(collection, key, current, expected)?;

        let doc = VersionedDoc {
            version: current + 1,
            data,
        };
        let dir = path.parent().expect("doc path always has a parent");
        std::fs::create_dir_all(dir)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&doc)?)?;
        std::fs::rename(&tmp, &path)?;
        Ok(doc.version)
    }

    fn list_keys(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.root.join(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roundtrip(store: &dyn Store) {
        let v1 = store
            .put("things", "a", json!({"n": 1}), Expected::Any)
            .unwrap();
        assert_eq!(v1, 1);

        let doc = store.get("things", "a").unwrap().unwrap();
        assert_eq!(doc.version, 1);
        assert_eq!(doc.data, json!({"n": 1}));

        // CAS succeeds with the right token, bumps the version.
        let v2 = store
            .put("things", "a", json!({"n": 2}), Expected::Version(1))
            .unwrap();
        assert_eq!(v2, 2);

        // Stale token is rejected and the document is untouched.
        let err = store
            .put("things", "a", json!({"n": 99}), Expected::Version(1))
            .unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { found: 2, .. }));
        let doc = store.get("things", "a").unwrap().unwrap();
        assert_eq!(doc.data, json!({"n": 2}));
    }

    #[test]
    fn memory_store_versioned_roundtrip() {
        roundtrip(&MemoryStore::new());
    }

    #[test]
    fn memory_store_create_requires_version_zero() {
        let store = MemoryStore::new();
        // Version(0) means "create only if absent".
        assert!(store
            .put("things", "fresh", json!(1), Expected::Version(0))
            .is_ok());
        assert!(store
            .put("things", "fresh", json!(2), Expected::Version(0))
            .is_err());
    }

    #[test]
    fn memory_store_lists_only_its_collection() {
        let store = MemoryStore::new();
        store.put("a", "k1", json!(1), Expected::Any).unwrap();
        store.put("a", "k2", json!(1), Expected::Any).unwrap();
        store.put("b", "k3", json!(1), Expected::Any).unwrap();
        assert_eq!(store.list_keys("a").unwrap(), vec!["k1", "k2"]);
        assert_eq!(store.list_keys("b").unwrap(), vec!["k3"]);
        assert!(store.list_keys("c").unwrap().is_empty());
    }

    #[test]
    fn missing_document_reads_as_none() {
        let store = MemoryStore::new();
        assert!(store.get("things", "nope").unwrap().is_none());
        assert!(load::<i32>(&store, "things", "nope").unwrap().is_none());
    }

    #[test]
    fn typed_load_save_roundtrip() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Doc {
            label: String,
            count: u32,
        }

        let store = MemoryStore::new();
        let doc = Doc {
            label: "x".into(),
            count: 3,
        };
        save(&store, "docs", "d", &doc, Expected::Any).unwrap();
        let (version, back): (u64, Doc) = load(&store, "docs", "d").unwrap().unwrap();
        assert_eq!(version, 1);
        assert_eq!(back, doc);
    }
}
