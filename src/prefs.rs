use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

pub const PREFERRED_SPEAKER_KEY: &str = "preferredSpeaker";
pub const PREFERRED_MUSIC_KEY: &str = "preferredMusic";

/// Durable key -> string storage for remembered choices
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
    /// Removing an absent key is not an error
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        (**self).remove(key)
    }
}

/// Preferences kept as a flat JSON object on disk
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::prefs_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        fs::read(&self.path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }

    fn write_all(&self, map: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(map).map_err(io::Error::other)?;
        fs::write(&self.path, data)
    }
}

impl Default for FilePreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        let mut map = self.read_all();
        map.insert(key.to_string(), value.to_string());
        self.write_all(&map)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        let mut map = self.read_all();
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&map)
    }
}

/// Process-local preferences, forgotten on exit
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    entries: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = FilePreferenceStore::with_path(dir.path().join("nope.json"));
        assert_eq!(store.get(PREFERRED_SPEAKER_KEY), None);
    }

    #[test]
    fn set_get_and_remove_persist_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut store = FilePreferenceStore::with_path(&path);
        store.set(PREFERRED_SPEAKER_KEY, "Calm Voice").unwrap();
        store.set(PREFERRED_MUSIC_KEY, "Soft Piano").unwrap();

        let mut reopened = FilePreferenceStore::with_path(&path);
        assert_eq!(
            reopened.get(PREFERRED_SPEAKER_KEY).as_deref(),
            Some("Calm Voice")
        );

        reopened.remove(PREFERRED_SPEAKER_KEY).unwrap();
        let again = FilePreferenceStore::with_path(&path);
        assert_eq!(again.get(PREFERRED_SPEAKER_KEY), None);
        assert_eq!(again.get(PREFERRED_MUSIC_KEY).as_deref(), Some("Soft Piano"));
    }

    #[test]
    fn removing_absent_key_is_ok() {
        let dir = tempdir().unwrap();
        let mut store = FilePreferenceStore::with_path(dir.path().join("p.json"));
        store.remove(PREFERRED_MUSIC_KEY).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.json");
        fs::write(&path, b"{not json").unwrap();
        let mut store = FilePreferenceStore::with_path(&path);
        assert_eq!(store.get(PREFERRED_SPEAKER_KEY), None);

        store.set(PREFERRED_SPEAKER_KEY, "Gentle Guide").unwrap();
        assert_eq!(
            store.get(PREFERRED_SPEAKER_KEY).as_deref(),
            Some("Gentle Guide")
        );
    }

    #[test]
    fn boxed_store_delegates() {
        let mut store: Box<dyn PreferenceStore> = Box::new(MemoryPreferenceStore::new());
        store.set(PREFERRED_SPEAKER_KEY, "Calm Voice").unwrap();
        assert_eq!(store.get(PREFERRED_SPEAKER_KEY).as_deref(), Some("Calm Voice"));
    }

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryPreferenceStore::new();
        store.set(PREFERRED_MUSIC_KEY, "Ocean Waves").unwrap();
        assert_eq!(store.get(PREFERRED_MUSIC_KEY).as_deref(), Some("Ocean Waves"));
        store.remove(PREFERRED_MUSIC_KEY).unwrap();
        assert_eq!(store.get(PREFERRED_MUSIC_KEY), None);
    }
}
