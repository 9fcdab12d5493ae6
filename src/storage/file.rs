//! JSON file preference store.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PreferenceStore, StorageError};

/// A preference store persisted as a flat JSON object of strings.
///
/// The file is read on every access and rewritten on every write, so several
/// processes sharing one file see each other's choices. A missing file reads
/// as "nothing stored"; other keys in the file are preserved on write.
///
/// ```json
/// { "saferoute-theme": "dark" }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl PreferenceStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write to a sibling then rename so readers never see a partial file.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_string_pretty(&entries)?)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.read("theme").unwrap(), None);
    }

    #[test]
    fn test_write_creates_file_and_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        let mut store = FileStore::new(&path);

        store.write("theme", "dark").unwrap();

        assert!(path.exists());
        assert_eq!(store.read("theme").unwrap().as_deref(), Some("dark"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_write_preserves_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"font-size": "large"}"#).unwrap();

        let mut store = FileStore::new(&path);
        store.write("theme", "light").unwrap();

        assert_eq!(store.read("font-size").unwrap().as_deref(), Some("large"));
        assert_eq!(store.read("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_second_handle_sees_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let mut writer = FileStore::new(&path);
        let reader = FileStore::new(&path);

        writer.write("theme", "dark").unwrap();
        assert_eq!(reader.read("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_empty_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "  \n").unwrap();

        assert_eq!(FileStore::new(&path).read("theme").unwrap(), None);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();

        let mut store = FileStore::new(&path);
        assert!(matches!(store.read("theme"), Err(StorageError::Malformed(_))));
        assert!(matches!(
            store.write("theme", "dark"),
            Err(StorageError::Malformed(_))
        ));
    }

    #[test]
    fn test_directory_in_place_of_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.read("theme"), Err(StorageError::Io(_))));
    }
}
