//! Persistence contracts: the flat snapshot saved under the project key,
//! the user preference blob, and the gateway trait the shell hands to the
//! store's effects.

use std::io;

use serde::{Deserialize, Serialize};

/// Flat reduction of the project used only at the persistence boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub html: String,
    pub css: String,
    pub js: String,
    #[serde(rename = "lastModified")]
    pub last_modified: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub editor_font_size: u16,
    pub editor_tab_size: u8,
    pub editor_word_wrap: bool,
    pub terminal_font_family: String,
    pub panel_split_ratio: u16,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            editor_font_size: 14,
            editor_tab_size: 2,
            editor_word_wrap: false,
            terminal_font_family: "Consolas".to_string(),
            panel_split_ratio: 500,
        }
    }
}

/// Best-effort persistence gateway. Loads return `None` for missing or
/// malformed data; saves surface IO errors so the caller can log them.
pub trait ProjectStore {
    fn save_snapshot(&self, snapshot: &ProjectSnapshot) -> io::Result<()>;
    fn load_snapshot(&self) -> Option<ProjectSnapshot>;
    fn save_preferences(&self, prefs: &Preferences) -> io::Result<()>;
    fn load_preferences(&self) -> Option<Preferences>;
    fn export_archive(&self, snapshot: &ProjectSnapshot) -> io::Result<std::path::PathBuf>;
}
