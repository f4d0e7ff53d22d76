//! File-backed storage: one JSON file per key inside a data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::{KeyValueStore, StorageError};

const EXTENSION: &str = "json";

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash mid-write leaves either the old value or the new one.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Directory holding the key files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_owned(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;
        fs::write(&tmp, value).map_err(|e| io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(key, e))?;

        debug!(key, path = %path.display(), bytes = value.len(), "Wrote key");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // A crash between write and rename can leave the temp file behind
        for target in [&path, &tmp] {
            match fs::remove_file(target) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(io_error(key, e)),
            }
        }

        debug!(key, path = %path.display(), "Removed key");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> FileStore {
        FileStore::new(std::env::temp_dir().join(format!("ph-store-{}", uuid::Uuid::new_v4())))
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = temp_store();
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn test_set_creates_directory_and_file() {
        let store = temp_store();
        store.set("cart", r#"{"version":1,"items":[]}"#).unwrap();

        assert!(store.dir().join("cart.json").exists());
        assert!(!store.dir().join("cart.json.tmp").exists());
        assert_eq!(
            store.get("cart").unwrap().as_deref(),
            Some(r#"{"version":1,"items":[]}"#)
        );

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = temp_store();
        store.set("cart", "[]").unwrap();

        store.remove("cart").unwrap();
        store.remove("cart").unwrap();
        assert_eq!(store.get("cart").unwrap(), None);

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_remove_only_touches_its_key() {
        let store = temp_store();
        store.set("cart", "[]").unwrap();
        fs::write(store.dir().join("catalog.json"), "[]").unwrap();
        fs::write(store.dir().join("cart.json.tmp"), "partial").unwrap();

        store.remove("cart").unwrap();

        assert!(!store.dir().join("cart.json").exists());
        assert!(!store.dir().join("cart.json.tmp").exists());
        assert!(store.dir().join("catalog.json").exists());

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let store = temp_store();
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
    }
}
