//! Embedded file-backed store.
//!
//! Each key lives in its own file inside one directory. File names are the
//! URL-safe base64 encoding of the key, so any key string maps to a valid
//! file name. Writes land in a temporary file first and are renamed over the
//! target, so readers never observe a half-written value.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;

use crate::{KvBackend, StoreError};

const VALUE_EXTENSION: &str = "kv";
const TEMP_EXTENSION: &str = "tmp";

/// Key-value store persisted as a directory of files.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .map_err(|e| StoreError::OpenError(format!("{}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    /// Directory holding the store's files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name = URL_SAFE_NO_PAD.encode(key.as_bytes());
        self.root.join(format!("{}.{}", name, VALUE_EXTENSION))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        let name = URL_SAFE_NO_PAD.encode(key.as_bytes());
        let suffix: u64 = rand::thread_rng().gen();
        self.root
            .join(format!(".{}.{:016x}.{}", name, suffix, TEMP_EXTENSION))
    }
}

impl KvBackend for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let temp = self.temp_path_for(key);
        if let Err(e) = fs::write(&temp, value) {
            let _ = fs::remove_file(&temp);
            return Err(StoreError::io(key, e));
        }
        fs::rename(&temp, self.path_for(key)).map_err(|e| {
            let _ = fs::remove_file(&temp);
            StoreError::io(key, e)
        })
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io("*", e))?;

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io("*", e))?.path();
            if path.extension().map_or(true, |ext| ext != VALUE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match URL_SAFE_NO_PAD
                .decode(stem)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
            {
                Some(key) => keys.push(key),
                None => tracing::debug!(file = %path.display(), "Skipping foreign file in store"),
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.path_for(key).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("shoppingCart", b"[]").unwrap();
        assert_eq!(store.get("shoppingCart").unwrap(), Some(b"[]".to_vec()));
        assert!(store.exists("shoppingCart").unwrap());
    }

    #[test]
    fn test_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("nope").unwrap(), None);
        assert!(!store.exists("nope").unwrap());
        assert!(store.delete("nope").is_ok());
    }

    #[test]
    fn test_keys_with_separators() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("shoppingCart:guest/1", b"x").unwrap();
        store.set("shoppingCart", b"y").unwrap();
        fs::write(dir.path().join("README"), b"not a value").unwrap();

        assert_eq!(
            store.keys().unwrap(),
            vec!["shoppingCart".to_string(), "shoppingCart:guest/1".to_string()]
        );
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("k", b"first").unwrap();
        store.set("k", b"second").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"second".to_vec()));

        let files = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn test_two_handles_share_directory() {
        let dir = tempfile::tempdir().unwrap();
        let a = FileStore::open(dir.path()).unwrap();
        let b = FileStore::open(dir.path()).unwrap();

        a.set("k", b"from a").unwrap();
        assert_eq!(b.get("k").unwrap(), Some(b"from a".to_vec()));

        b.delete("k").unwrap();
        assert!(!a.exists("k").unwrap());
    }
}
