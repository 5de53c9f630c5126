use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::ClientError;

/// Key-value string store persisted as one JSON object on disk, the
/// command-line stand-in for a browser's local storage.
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.read()?.remove(key))
    }

    pub fn set(&self, key: &str, value: String) -> Result<(), ClientError> {
        let mut entries = self.read()?;
        entries.insert(key.to_string(), value);
        self.write(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut entries = self.read()?;
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }

    fn read(&self) -> Result<BTreeMap<String, String>, ClientError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state.json");
        let storage = LocalStorage::new(&path);
        assert_eq!(storage.get("currentUser").unwrap(), None);
        storage.remove("currentUser").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested/state.json"));

        storage.set("currentUser", "{\"a\":1}".into()).unwrap();
        storage.set("theme", "dark".into()).unwrap();
        assert_eq!(storage.get("currentUser").unwrap().as_deref(), Some("{\"a\":1}"));

        storage.remove("currentUser").unwrap();
        assert_eq!(storage.get("currentUser").unwrap(), None);
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();
        let err = LocalStorage::new(path).get("currentUser").unwrap_err();
        assert!(matches!(err, ClientError::Json(_)));
    }
}
