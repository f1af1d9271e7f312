//! JSON key-value store under the platform cache dir.
//!
//! Each key is one pretty-printed JSON file. Reads of missing or malformed
//! files come back as `None`; write failures are the caller's to log. The
//! session never depends on this layer succeeding.

use std::io;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::kernel::services::ports::persistence::{Preferences, ProjectSnapshot, ProjectStore};

use super::archive::{write_archive, ARCHIVE_NAME};

const STORE_DIR: &str = ".webpad";
const LOG_DIR: &str = "logs";

pub const PROJECT_KEY: &str = "code-editor-project";
pub const PREFERENCES_KEY: &str = "editor-preferences";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    export_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf, export_dir: PathBuf) -> Self {
        Self { dir, export_dir }
    }

    /// Store rooted in the platform cache dir, exporting archives to the
    /// current working directory.
    pub fn in_cache_dir() -> Option<Self> {
        let dir = get_cache_dir()?.join(STORE_DIR);
        let export_dir = std::env::current_dir().unwrap_or_else(|_| dir.clone());
        Some(Self::new(dir, export_dir))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let data = std::fs::read_to_string(self.key_path(key)).ok()?;
        match serde_json::from_str(&data) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, %err, "stored value is malformed, ignoring");
                None
            }
        }
    }

    fn write_key<T: Serialize>(&self, key: &str, value: &T) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        std::fs::write(self.key_path(key), data)
    }
}

impl ProjectStore for JsonFileStore {
    fn save_snapshot(&self, snapshot: &ProjectSnapshot) -> io::Result<()> {
        self.write_key(PROJECT_KEY, snapshot)
    }

    fn load_snapshot(&self) -> Option<ProjectSnapshot> {
        self.read_key(PROJECT_KEY)
    }

    fn save_preferences(&self, prefs: &Preferences) -> io::Result<()> {
        self.write_key(PREFERENCES_KEY, prefs)
    }

    fn load_preferences(&self) -> Option<Preferences> {
        self.read_key(PREFERENCES_KEY)
    }

    fn export_archive(&self, snapshot: &ProjectSnapshot) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.export_dir)?;
        let path = self.export_dir.join(ARCHIVE_NAME);
        let file = std::fs::File::create(&path)?;
        write_archive(snapshot, file)?;
        Ok(path)
    }
}

pub fn ensure_log_dir() -> io::Result<PathBuf> {
    let dir = get_cache_dir()
        .map(|d| d.join(STORE_DIR).join(LOG_DIR))
        .unwrap_or_else(|| std::env::temp_dir().join(STORE_DIR).join(LOG_DIR));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn get_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Caches"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".cache"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return Some(PathBuf::from(local));
        }
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}
