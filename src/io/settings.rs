// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Local key-value settings.
//!
//! A flat JSON object on disk holding the admin password hash and UI
//! preference flags. Every write is flushed immediately.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const ADMIN_PASSWORD_HASH: &str = "admin_password_hash";
pub const DARK_MODE: &str = "ui.dark_mode";
pub const ROADMAP_DATA: &str = "roadmap.data";
pub const ROADMAP_STATUS: &str = "roadmap.status";
pub const ROADMAP_LINKS: &str = "roadmap.links";

pub struct SettingsStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, Value>,
}

impl SettingsStore {
    /// `<config_dir>/folio/settings.json`, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join("settings.json"))
    }

    /// Open the file at `path`. A missing or unreadable file starts empty.
    pub fn open(path: &Path) -> Self {
        let values = match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt settings file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Cannot read settings file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self {
            path: Some(path.to_path_buf()),
            values,
        }
    }

    /// Settings that live only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), Value::String(value.to_string()));
        self.save()
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    /// Boolean preference, `false` when unset.
    pub fn flag(&self, key: &str) -> bool {
        self.values.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn set_flag(&mut self, key: &str, value: bool) -> Result<()> {
        self.values.insert(key.to_string(), Value::Bool(value));
        self.save()
    }

    /// Structured value stored under `key`. A value of the wrong shape is
    /// logged and treated as missing.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?.clone();
        serde_json::from_value(value)
            .map_err(|e| log::warn!("Ignoring malformed setting {}: {}", key, e))
            .ok()
    }

    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).with_context(|| format!("cannot encode {}", key))?;
        self.values.insert(key.to_string(), value);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = SettingsStore::open(&path);
        settings.set(ADMIN_PASSWORD_HASH, "abc123").unwrap();
        settings.set_flag(DARK_MODE, true).unwrap();

        let reopened = SettingsStore::open(&path);
        assert_eq!(reopened.get(ADMIN_PASSWORD_HASH), Some("abc123"));
        assert!(reopened.flag(DARK_MODE));
    }

    #[test]
    fn test_remove_and_defaults() {
        let mut settings = SettingsStore::in_memory();
        assert!(!settings.flag(DARK_MODE));
        settings.set(ADMIN_PASSWORD_HASH, "abc").unwrap();
        settings.remove(ADMIN_PASSWORD_HASH).unwrap();
        assert_eq!(settings.get(ADMIN_PASSWORD_HASH), None);
    }

    #[test]
    fn test_json_values() {
        let mut settings = SettingsStore::in_memory();
        settings.set_json("numbers", &vec![1, 2, 3]).unwrap();
        assert_eq!(settings.get_json::<Vec<i32>>("numbers"), Some(vec![1, 2, 3]));
        assert_eq!(settings.get_json::<Vec<String>>("numbers"), None);
        assert_eq!(settings.get_json::<Vec<i32>>("missing"), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(SettingsStore::open(&path).get(ADMIN_PASSWORD_HASH), None);
    }
}
