//! Flat `key:value` operator settings file.
//!
//! The format is fixed by the persistence contract: one `key:value` pair per
//! line, no sections, no quoting. Values may contain further `:` characters;
//! only the first colon splits. Unknown lines are preserved on save so a file
//! shared with other tools round-trips losslessly.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, RoverError};

/// In-memory view of a flat settings file.
#[derive(Debug, Clone, Default)]
pub struct SettingsFile {
    path: PathBuf,
    /// Parsed pairs in file order. `None` key marks a passthrough line
    /// (comment, blank, or malformed) kept verbatim.
    lines: Vec<(Option<String>, String)>,
}

impl SettingsFile {
    /// Open a settings file, returning an empty store when it does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        let mut store = Self {
            path: path.to_path_buf(),
            lines: Vec::new(),
        };
        if !path.exists() {
            return Ok(store);
        }
        let raw = fs::read_to_string(path).map_err(|e| RoverError::io(path, e))?;
        for line in raw.lines() {
            match line.split_once(':') {
                Some((key, value)) if !key.trim().is_empty() => {
                    store
                        .lines
                        .push((Some(key.trim().to_string()), value.trim().to_string()));
                }
                _ => store.lines.push((None, line.to_string())),
            }
        }
        Ok(store)
    }

    /// Look up a named value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .find(|(k, _)| k.as_deref() == Some(key))
            .map(|(_, v)| v.as_str())
    }

    /// Set a named value, replacing an existing entry or appending a new one.
    /// With duplicate keys the last occurrence is updated, matching `get`.
    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(entry) = self
            .lines
            .iter_mut()
            .rev()
            .find(|(k, _)| k.as_deref() == Some(key))
        {
            entry.1 = value.to_string();
        } else {
            self.lines
                .push((Some(key.to_string()), value.to_string()));
        }
    }

    /// Write the settings back to disk.
    pub fn save(&self) -> Result<()> {
        let mut out = String::new();
        for (key, value) in &self.lines {
            match key {
                Some(k) => {
                    out.push_str(k);
                    out.push(':');
                    out.push_str(value);
                }
                None => out.push_str(value),
            }
            out.push('\n');
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| RoverError::io(parent, e))?;
        }
        fs::write(&self.path, out).map_err(|e| RoverError::io(&self.path, e))
    }

    /// Path the store was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsFile::open(&dir.path().join("nope.settings")).unwrap();
        assert_eq!(store.get("robotName"), None);
    }

    #[test]
    fn get_set_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rover.settings");
        let mut store = SettingsFile::open(&path).unwrap();
        store.set("robotName", "Beep");
        store.set("lastSensor", "light");
        store.save().unwrap();

        let reloaded = SettingsFile::open(&path).unwrap();
        assert_eq!(reloaded.get("robotName"), Some("Beep"));
        assert_eq!(reloaded.get("lastSensor"), Some("light"));
    }

    #[test]
    fn set_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rover.settings");
        let mut store = SettingsFile::open(&path).unwrap();
        store.set("robotName", "Beep");
        store.set("robotName", "Boop");
        store.save().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.matches("robotName").count(), 1);
        assert!(raw.contains("robotName:Boop"));
    }

    #[test]
    fn value_may_contain_colons() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rover.settings");
        std::fs::write(&path, "greeting:hello: world\n").unwrap();
        let store = SettingsFile::open(&path).unwrap();
        assert_eq!(store.get("greeting"), Some("hello: world"));
    }

    #[test]
    fn unknown_lines_survive_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rover.settings");
        std::fs::write(&path, "# managed by hand\nrobotName:Beep\n").unwrap();
        let mut store = SettingsFile::open(&path).unwrap();
        store.set("robotName", "Boop");
        store.save().unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("# managed by hand\n"));
    }
}
