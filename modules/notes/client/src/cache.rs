//! Best-effort durable key-value storage on disk.
//!
//! One file per key under the cache directory. Every read failure is
//! logged and reported as "no saved value"; every write failure is logged
//! and reported as `false`. Nothing here returns an error to the caller.

use crate::theme::Theme;
use notes_types::Note;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Serialized note list (offline fallback)
pub const NOTES_KEY: &str = "notes-app-data";
/// Last selected theme name
pub const THEME_KEY: &str = "notes-app-theme";

pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Raw value for `key`, `None` when missing or unreadable
    pub fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::error!("[CACHE] Failed to read {}: {}", key, e);
                None
            }
        }
    }

    /// Write `value` under `key`. The old value stays intact until the
    /// new one is fully on disk.
    pub fn set(&self, key: &str, value: &str) -> bool {
        match self.write_atomic(key, value) {
            Ok(()) => true,
            Err(e) => {
                log::error!("[CACHE] Failed to write {}: {}", key, e);
                false
            }
        }
    }

    fn write_atomic(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!(".{}.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.key_path(key))
    }

    pub fn remove(&self, key: &str) -> bool {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => {
                log::error!("[CACHE] Failed to remove {}: {}", key, e);
                false
            }
        }
    }

    pub fn save_notes(&self, notes: &[Note]) -> bool {
        match serde_json::to_string(notes) {
            Ok(json) => self.set(NOTES_KEY, &json),
            Err(e) => {
                log::error!("[CACHE] Failed to serialize notes: {}", e);
                false
            }
        }
    }

    /// Cached note list; empty when nothing usable is stored
    pub fn load_notes(&self) -> Vec<Note> {
        let Some(raw) = self.get(NOTES_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::error!("[CACHE] Discarding unreadable note cache: {}", e);
            Vec::new()
        })
    }

    pub fn clear_notes(&self) -> bool {
        self.remove(NOTES_KEY)
    }

    pub fn save_theme(&self, theme: Theme) -> bool {
        self.set(THEME_KEY, theme.as_str())
    }

    /// Saved theme, `Light` if none or unrecognised
    pub fn load_theme(&self) -> Theme {
        self.get(THEME_KEY)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_default()
    }
}
