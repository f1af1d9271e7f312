//! Open-file (tab) registry.
//!
//! An ordered list of open files with at most one entry per path and a
//! single active pointer. The registry never outruns the tree: the store
//! calls the `reconcile_*` pair after every tree rename/delete, so every
//! registry path always names a live tree file.

use std::fmt;

use super::file_tree::{FileKind, FileNode};

#[derive(Debug)]
pub enum RegistryError {
    NotAFile(String),
    UnsupportedKind(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NotAFile(path) => write!(f, "`{path}` is a folder"),
            RegistryError::UnsupportedKind(path) => {
                write!(f, "`{path}` has no editor support")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFileEntry {
    pub path: String,
    pub kind: FileKind,
    pub content: String,
    pub is_dirty: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OpenFilesRegistry {
    entries: Vec<OpenFileEntry>,
    active: Option<usize>,
}

impl OpenFilesRegistry {
    pub fn entries(&self) -> &[OpenFileEntry] {
        &self.entries
    }

    pub fn active(&self) -> Option<&OpenFileEntry> {
        self.entries.get(self.active?)
    }

    pub fn active_path(&self) -> Option<&str> {
        self.active().map(|e| e.path.as_str())
    }

    pub fn get(&self, path: &str) -> Option<&OpenFileEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_of(&self, path: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.path == path)
    }

    /// Opens `node` and makes it active. A second open of the same path only
    /// moves the active pointer. Returns whether anything changed.
    pub fn open(&mut self, node: &FileNode) -> Result<bool, RegistryError> {
        let Some(kind) = node.file_kind() else {
            return Err(RegistryError::NotAFile(node.path.clone()));
        };
        if !kind.is_openable() {
            return Err(RegistryError::UnsupportedKind(node.path.clone()));
        }

        if let Some(idx) = self.index_of(&node.path) {
            if self.active == Some(idx) {
                return Ok(false);
            }
            self.active = Some(idx);
            return Ok(true);
        }

        self.entries.push(OpenFileEntry {
            path: node.path.clone(),
            kind,
            content: node.content().unwrap_or_default().to_string(),
            is_dirty: node.is_dirty(),
        });
        self.active = Some(self.entries.len() - 1);
        Ok(true)
    }

    pub fn set_active(&mut self, path: &str) -> bool {
        match self.index_of(path) {
            Some(idx) if self.active != Some(idx) => {
                self.active = Some(idx);
                true
            }
            _ => false,
        }
    }

    /// Closes the entry at `path`. When the active tab goes away the first
    /// remaining entry becomes active.
    pub fn close(&mut self, path: &str) -> bool {
        let Some(idx) = self.index_of(path) else {
            return false;
        };
        let prev_active = self.active_path().map(str::to_string);
        self.entries.remove(idx);
        self.restore_active(prev_active.as_deref());
        true
    }

    pub fn edit(&mut self, path: &str, text: &str) -> bool {
        let Some(idx) = self.index_of(path) else {
            return false;
        };
        let entry = &mut self.entries[idx];
        if entry.content == text && entry.is_dirty {
            return false;
        }
        entry.content = text.to_string();
        entry.is_dirty = true;
        true
    }

    pub fn mark_all_saved(&mut self) -> bool {
        let mut changed = false;
        for entry in &mut self.entries {
            if entry.is_dirty {
                entry.is_dirty = false;
                changed = true;
            }
        }
        changed
    }

    pub fn any_dirty(&self) -> bool {
        self.entries.iter().any(|e| e.is_dirty)
    }

    pub fn is_dirty(&self, path: &str) -> bool {
        self.get(path).is_some_and(|e| e.is_dirty)
    }

    /// First open entry of the given kind, in tab order. Snapshot extraction
    /// reads the three web kinds through this.
    pub fn first_of_kind(&self, kind: FileKind) -> Option<&OpenFileEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Rewrites entries after a tree rename of `old_path` to `new_path`.
    /// The exact entry takes the new path and kind, unless the new kind has
    /// no editor support, in which case it is evicted. Entries under a
    /// renamed folder get their path prefix rewritten.
    pub fn reconcile_rename(
        &mut self,
        old_path: &str,
        new_path: &str,
        new_kind: Option<FileKind>,
    ) -> bool {
        let prev_active = self.active_path().map(str::to_string);
        let mut changed = false;

        if let Some(idx) = self.index_of(old_path) {
            match new_kind {
                Some(kind) if kind.is_openable() => {
                    let entry = &mut self.entries[idx];
                    entry.path = new_path.to_string();
                    entry.kind = kind;
                }
                _ => {
                    self.entries.remove(idx);
                }
            }
            changed = true;
        }

        let prefix = format!("{old_path}/");
        for entry in &mut self.entries {
            if let Some(rest) = entry.path.strip_prefix(&prefix) {
                entry.path = format!("{new_path}/{rest}");
                changed = true;
            }
        }

        if changed {
            let renamed_active = prev_active.as_deref().map(|p| {
                if p == old_path {
                    new_path.to_string()
                } else if let Some(rest) = p.strip_prefix(&prefix) {
                    format!("{new_path}/{rest}")
                } else {
                    p.to_string()
                }
            });
            self.restore_active(renamed_active.as_deref());
        }
        changed
    }

    /// Evicts the entry at `path` and every entry beneath it after a tree
    /// delete.
    pub fn reconcile_delete(&mut self, path: &str) -> bool {
        let prev_active = self.active_path().map(str::to_string);
        let prefix = format!("{path}/");
        let before = self.entries.len();
        self.entries
            .retain(|e| e.path != path && !e.path.starts_with(&prefix));
        if self.entries.len() == before {
            return false;
        }
        self.restore_active(prev_active.as_deref());
        true
    }

    fn restore_active(&mut self, prev: Option<&str>) {
        self.active = match prev.and_then(|p| self.index_of(p)) {
            Some(idx) => Some(idx),
            None if self.entries.is_empty() => None,
            None => Some(0),
        };
    }
}
