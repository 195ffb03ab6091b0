use std::{collections::BTreeMap, io::ErrorKind, path::PathBuf};

use anyhow::Context;
use tracing::warn;

pub const ROLE_KEY: &str = "careConnectUserRole";

/// A small string key/value file that outlives the process.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> LocalStorage {
        LocalStorage { path: path.into() }
    }

    fn load(&self) -> anyhow::Result<BTreeMap<String, String>> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e).with_context(|| format!("could not read {}", self.path.display())),
        };
        match serde_json::from_str(&json) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!("ignoring unreadable storage {}: {e}", self.path.display());
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, items: &BTreeMap<String, String>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, json).with_context(|| format!("could not write {}", self.path.display()))?;
        Ok(())
    }

    pub fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    pub fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    pub fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.save(&items)?;
        }
        Ok(())
    }
}
