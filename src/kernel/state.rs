//! Application state: one struct per concern, all owned by `AppState`.

use std::time::{SystemTime, UNIX_EPOCH};

use rustc_hash::FxHashMap;

use crate::kernel::preview::{PreviewSources, PreviewState};
use crate::kernel::services::ports::editor::CursorPosition;
use crate::kernel::services::ports::persistence::{Preferences, ProjectSnapshot};
use crate::kernel::terminal::TerminalState;
use crate::models::{FileKind, FileTree, OpenFilesRegistry, TreeRow};

/// A close waiting on the user's answer to the unsaved-changes dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClose {
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmDialogState {
    pub visible: bool,
    pub message: String,
    pub pending: Option<PendingClose>,
}

impl ConfirmDialogState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub sidebar_visible: bool,
    pub terminal_visible: bool,
    pub confirm_dialog: ConfirmDialogState,
    pub cursor: CursorPosition,
    pub notification: Option<String>,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_visible: true,
            terminal_visible: false,
            confirm_dialog: ConfirmDialogState::default(),
            cursor: CursorPosition::default(),
            notification: None,
            should_quit: false,
        }
    }
}

/// Explorer view over the file tree: flattened rows, a path-keyed selection
/// and a scroll window.
pub struct ExplorerState {
    tree: FileTree,
    pub rows: Vec<TreeRow>,
    pub selected_path: Option<String>,
    pub view_height: usize,
    pub scroll_offset: usize,
    index_by_path: FxHashMap<String, usize>,
}

impl std::fmt::Debug for ExplorerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerState")
            .field("rows_len", &self.rows.len())
            .field("selected_path", &self.selected_path)
            .field("scroll_offset", &self.scroll_offset)
            .finish()
    }
}

impl ExplorerState {
    pub fn new(tree: FileTree) -> Self {
        let mut state = Self {
            tree,
            rows: Vec::new(),
            selected_path: None,
            view_height: 10,
            scroll_offset: 0,
            index_by_path: FxHashMap::default(),
        };
        state.refresh_rows();
        state
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    /// Swaps in a new tree snapshot, refreshing rows and dropping a
    /// selection that no longer resolves.
    pub fn set_tree(&mut self, tree: FileTree) {
        self.tree = tree;
        self.refresh_rows();
        if let Some(selected) = &self.selected_path {
            if !self.index_by_path.contains_key(selected.as_str()) {
                self.selected_path = None;
            }
        }
    }

    pub fn selected_row(&self) -> Option<&TreeRow> {
        let idx = self.index_by_path.get(self.selected_path.as_deref()?)?;
        self.rows.get(*idx)
    }

    pub fn set_view_height(&mut self, height: usize) -> bool {
        let height = height.max(1);
        if self.view_height == height {
            return false;
        }
        self.view_height = height;
        match self.selected_index() {
            Some(index) => self.keep_row_visible(index),
            None => self.clamp_scroll(),
        }
        true
    }

    pub fn move_selection(&mut self, delta: isize) -> bool {
        if self.rows.is_empty() || delta == 0 {
            return false;
        }

        let current = match self.selected_index() {
            Some(index) => index,
            None => {
                let index = if delta < 0 { self.rows.len() - 1 } else { 0 };
                self.select_index(index);
                return true;
            }
        };

        let next = if delta < 0 {
            current.saturating_sub((-delta) as usize)
        } else {
            (current + delta as usize).min(self.rows.len() - 1)
        };
        if next == current {
            return false;
        }
        self.select_index(next);
        true
    }

    pub fn scroll(&mut self, delta: isize) -> bool {
        if self.rows.is_empty() || delta == 0 {
            return false;
        }
        let max_scroll = self.rows.len().saturating_sub(self.view_height.max(1));
        let prev = self.scroll_offset;
        if delta > 0 {
            self.scroll_offset = (self.scroll_offset + delta as usize).min(max_scroll);
        } else {
            self.scroll_offset = self.scroll_offset.saturating_sub((-delta) as usize);
        }
        self.scroll_offset != prev
    }

    fn selected_index(&self) -> Option<usize> {
        self.index_by_path
            .get(self.selected_path.as_deref()?)
            .copied()
    }

    fn select_index(&mut self, index: usize) {
        self.selected_path = Some(self.rows[index].path.clone());
        self.keep_row_visible(index);
    }

    fn refresh_rows(&mut self) {
        self.rows = self.tree.flatten_rows();

        self.index_by_path.clear();
        self.index_by_path.reserve(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            self.index_by_path.insert(row.path.clone(), i);
        }

        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let view_height = self.view_height.max(1);
        let max_scroll = self.rows.len().saturating_sub(view_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);
    }

    fn keep_row_visible(&mut self, row_index: usize) {
        let view_height = self.view_height.max(1);

        if row_index < self.scroll_offset {
            self.scroll_offset = row_index;
            self.clamp_scroll();
            return;
        }

        if row_index >= self.scroll_offset + view_height {
            self.scroll_offset = row_index.saturating_sub(view_height - 1);
        }

        self.clamp_scroll();
    }
}

#[derive(Debug)]
pub struct AppState {
    pub explorer: ExplorerState,
    pub open_files: OpenFilesRegistry,
    pub preview: PreviewState,
    pub terminal: TerminalState,
    pub ui: UiState,
    pub prefs: Preferences,
    pub last_saved: Option<u64>,
}

impl AppState {
    pub fn new(tree: FileTree, prefs: Preferences) -> Self {
        Self {
            explorer: ExplorerState::new(tree),
            open_files: OpenFilesRegistry::default(),
            preview: PreviewState::default(),
            terminal: TerminalState::default(),
            ui: UiState::default(),
            prefs,
            last_saved: None,
        }
    }

    /// Flat reduction for persistence: per kind, the first open tab of that
    /// kind wins; absent kinds serialize empty.
    pub fn snapshot(&self) -> ProjectSnapshot {
        let pick = |kind| {
            self.open_files
                .first_of_kind(kind)
                .map(|e| e.content.clone())
                .unwrap_or_default()
        };
        ProjectSnapshot {
            html: pick(FileKind::Html),
            css: pick(FileKind::Css),
            js: pick(FileKind::Js),
            last_modified: now_millis(),
        }
    }

    pub fn preview_sources(&self) -> PreviewSources {
        let snapshot = self.snapshot();
        PreviewSources {
            html: snapshot.html,
            css: snapshot.css,
            js: snapshot.js,
        }
    }

    pub fn any_dirty(&self) -> bool {
        self.open_files.any_dirty() || self.explorer.tree().any_dirty()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
