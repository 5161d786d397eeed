//! Persisted last-notified state.
//!
//! A flat JSON object mapping flight designator to change key, loaded
//! once per run and rewritten when the run changed anything. Missing,
//! empty and malformed files all load as an empty store: a damaged state
//! file costs one duplicate notification per flight, never a crash.

use crate::types::{ChangeKey, FlightId};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Last-notified change key per flight, backed by a JSON file.
#[derive(Debug)]
pub struct StatusStore {
    path: PathBuf,
    entries: HashMap<FlightId, ChangeKey>,
}

impl StatusStore {
    /// Load the store at `path`.
    ///
    /// Absent, empty and unparsable files all behave as an empty store;
    /// the run proceeds and every monitored flight counts as first-seen.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        "Ignoring malformed state file {}: {}",
                        path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read state file {}: {}", path.display(), e);
                HashMap::new()
            }
        };

        tracing::debug!(
            "Loaded {} entries from {}",
            entries.len(),
            path.display()
        );

        Self { path, entries }
    }

    /// Last notified key for a flight, if any.
    pub fn get(&self, id: &FlightId) -> Option<&ChangeKey> {
        self.entries.get(id)
    }

    /// Record the key just notified for a flight.
    pub fn insert(&mut self, id: FlightId, key: ChangeKey) {
        self.entries.insert(id, key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FlightId, &ChangeKey)> {
        self.entries.iter()
    }

    /// Persist the full map, overwriting the previous contents.
    ///
    /// The write goes to a sibling temp file and is renamed into place,
    /// so a crash mid-write leaves the previous state intact.
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&self.entries)?;
        let tmp = tmp_path(&self.path);

        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = StatusStore::load(dir.path().join("absent.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"").unwrap();
        assert!(StatusStore::load(&path).is_empty());
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"{not json at all").unwrap();
        assert!(StatusStore::load(&path).is_empty());
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = StatusStore::load(&path);
        store.insert(FlightId::from("AB123"), ChangeKey::new("active|T1|"));
        store.insert(FlightId::from("CD456"), ChangeKey::new("scheduled||"));
        store.save().unwrap();

        let reloaded = StatusStore::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.get(&FlightId::from("AB123")).unwrap().as_str(),
            "active|T1|"
        );
    }

    #[test]
    fn test_save_overwrites_not_merges() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = StatusStore::load(&path);
        store.insert(FlightId::from("AB123"), ChangeKey::new("scheduled||"));
        store.save().unwrap();

        let mut second = StatusStore::load(&path);
        second.insert(FlightId::from("AB123"), ChangeKey::new("active|T1|"));
        second.save().unwrap();

        let reloaded = StatusStore::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(
            reloaded.get(&FlightId::from("AB123")).unwrap().as_str(),
            "active|T1|"
        );
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = StatusStore::load(&path);
        store.insert(FlightId::from("AB123"), ChangeKey::new("active|T1|"));
        store.save().unwrap();

        assert!(path.exists());
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_persisted_form_is_flat_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = StatusStore::load(&path);
        store.insert(FlightId::from("AB123"), ChangeKey::new("active|T1|"));
        store.save().unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["AB123"], "active|T1|");
    }
}
