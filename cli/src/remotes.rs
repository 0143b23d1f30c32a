//! YAML-backed list of named remotes used by the `remote` verbs.

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    pub url: String,
    /// Fetch right after adding.
    #[serde(default)]
    pub fetch: bool,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStore {
    #[serde(default)]
    pub remotes: BTreeMap<String, Remote>,
}

impl RemoteStore {
    /// Loads the store; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_yaml::from_reader(BufReader::new(file))?)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Returns `false` if a remote with that name already exists.
    pub fn add(&mut self, name: &str, remote: Remote) -> bool {
        if self.remotes.contains_key(name) {
            return false;
        }
        self.remotes.insert(name.to_string(), remote);
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<Remote> {
        self.remotes.remove(name)
    }

    /// Aligned `name  url` lines.
    pub fn to_table(&self) -> String {
        let width = self.remotes.keys().map(String::len).max().unwrap_or(0);
        self.remotes
            .iter()
            .map(|(name, remote)| format!("{name:<width$}  {}\n", remote.url))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(url: &str) -> Remote {
        Remote {
            url: url.to_string(),
            fetch: false,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RemoteStore::load(&dir.path().join("remotes.yml")).unwrap();
        assert!(store.remotes.is_empty());
    }

    #[test]
    fn test_add_refuses_duplicates() {
        let mut store = RemoteStore::default();
        assert!(store.add("origin", remote("https://example.com/a.git")));
        assert!(!store.add("origin", remote("https://example.com/b.git")));
        assert_eq!(store.remotes["origin"].url, "https://example.com/a.git");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remotes.yml");

        let mut store = RemoteStore::default();
        store.add("origin", remote("https://example.com/a.git"));
        store.add("upstream", remote("https://example.com/up.git"));
        store.save(&path).unwrap();

        let loaded = RemoteStore::load(&path).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(
            loaded.to_table(),
            "origin    https://example.com/a.git\nupstream  https://example.com/up.git\n"
        );
    }
}
