//! Workbench: owns the store, the collaborator adapters and the event loop
//! glue. Input is translated into actions, effects are run here, async
//! channels (surface reports, log tee) are drained on tick.

use std::sync::mpsc::Receiver;
use std::time::Instant;

use tracing::warn;

use crate::kernel::services::adapters::{ChannelSurface, JsonFileStore};
use crate::kernel::services::ports::editor::{
    CursorPosition, EditorCommand, EditorHost, EditorLanguage,
};
use crate::kernel::services::ports::persistence::ProjectStore;
use crate::kernel::services::ports::surface::{DocumentHandle, RenderSurface, SurfaceEvent};
use crate::kernel::{Action, AppState, Command, Effect, Store};
use crate::models::templates;

mod input;
mod render;

pub use input::LoopControl;

const MAX_LOG_DRAIN_PER_TICK: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    NewFile,
    NewFolder,
    Rename,
}

/// Shell-local input prompt for create/rename. Target is the parent path
/// for creates and the node path for renames.
#[derive(Debug, Default)]
struct PromptState {
    kind: Option<PromptKind>,
    title: &'static str,
    value: String,
    error: Option<String>,
    target: String,
}

impl PromptState {
    fn visible(&self) -> bool {
        self.kind.is_some()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Which pane keystrokes go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Explorer,
    Editor,
    Terminal,
}

/// Minimal text pane standing in as the editor host: plain line buffer,
/// cursor, and the two imperative commands.
#[derive(Debug, Default)]
struct TextPane {
    path: Option<String>,
    language: Option<EditorLanguage>,
    lines: Vec<String>,
    cursor_line: usize,
    cursor_col: usize,
    find_prompt: Option<String>,
}

impl TextPane {
    fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn clamp_cursor(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor_line = self.cursor_line.min(self.lines.len() - 1);
        self.cursor_col = self.cursor_col.min(self.lines[self.cursor_line].chars().count());
    }

    fn insert_char(&mut self, ch: char) {
        self.clamp_cursor();
        let line = &mut self.lines[self.cursor_line];
        let byte = char_to_byte(line, self.cursor_col);
        line.insert(byte, ch);
        self.cursor_col += 1;
    }

    fn insert_newline(&mut self) {
        self.clamp_cursor();
        let line = &mut self.lines[self.cursor_line];
        let byte = char_to_byte(line, self.cursor_col);
        let rest = line.split_off(byte);
        self.lines.insert(self.cursor_line + 1, rest);
        self.cursor_line += 1;
        self.cursor_col = 0;
    }

    fn backspace(&mut self) {
        self.clamp_cursor();
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_line];
            let byte = char_to_byte(line, self.cursor_col - 1);
            line.remove(byte);
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            let removed = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.lines[self.cursor_line].chars().count();
            self.lines[self.cursor_line].push_str(&removed);
        }
    }

    fn move_cursor(&mut self, d_line: isize, d_col: isize) {
        self.clamp_cursor();
        if d_line < 0 {
            self.cursor_line = self.cursor_line.saturating_sub((-d_line) as usize);
        } else {
            self.cursor_line =
                (self.cursor_line + d_line as usize).min(self.lines.len() - 1);
        }
        if d_col < 0 {
            self.cursor_col = self.cursor_col.saturating_sub((-d_col) as usize);
        } else {
            self.cursor_col += d_col as usize;
        }
        self.clamp_cursor();
    }

    /// Jumps to the first occurrence of `query` at or after the cursor,
    /// wrapping to the top.
    fn jump_to(&mut self, query: &str) -> bool {
        if query.is_empty() || self.lines.is_empty() {
            return false;
        }
        let total = self.lines.len();
        for offset in 0..=total {
            let idx = (self.cursor_line + offset) % total;
            let from = if offset == 0 {
                char_to_byte(&self.lines[idx], self.cursor_col)
            } else {
                0
            };
            if let Some(found) = self.lines[idx][from..].find(query) {
                self.cursor_line = idx;
                self.cursor_col = self.lines[idx][..from + found].chars().count();
                return true;
            }
        }
        false
    }

    fn cursor_position(&self) -> CursorPosition {
        CursorPosition {
            line: self.cursor_line as u32 + 1,
            column: self.cursor_col as u32 + 1,
        }
    }
}

impl EditorHost for TextPane {
    fn set_model(&mut self, text: &str, language: EditorLanguage) {
        self.lines = text.split('\n').map(str::to_string).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.language = Some(language);
        self.cursor_line = 0;
        self.cursor_col = 0;
    }

    fn run_command(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::Format => {
                for line in &mut self.lines {
                    let trimmed = line.trim_end().len();
                    line.truncate(trimmed);
                }
                self.clamp_cursor();
            }
            EditorCommand::Find => {
                self.find_prompt = Some(String::new());
            }
        }
    }
}

fn char_to_byte(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

pub struct Workbench {
    store: Store,
    storage: Option<JsonFileStore>,
    surface: ChannelSurface,
    surface_rx: Receiver<SurfaceEvent>,
    document: Option<DocumentHandle>,
    log_rx: Option<Receiver<String>>,
    editor: TextPane,
    focus: Focus,
    prompt: PromptState,
    terminal_input: String,
}

impl Workbench {
    pub fn new(storage: Option<JsonFileStore>, log_rx: Option<Receiver<String>>) -> Self {
        let snapshot = storage.as_ref().and_then(|s| s.load_snapshot());
        let prefs = storage
            .as_ref()
            .and_then(|s| s.load_preferences())
            .unwrap_or_default();

        let tree = templates::starter_tree(snapshot.as_ref());
        let state = AppState::new(tree, prefs);
        let store = Store::new(state, Instant::now());

        let (surface, surface_rx) = ChannelSurface::new();

        let mut workbench = Self {
            store,
            storage,
            surface,
            surface_rx,
            document: None,
            log_rx,
            editor: TextPane::default(),
            focus: Focus::Explorer,
            prompt: PromptState::default(),
            terminal_input: String::new(),
        };

        // the starter tabs, html active, and a first preview build
        for path in ["src/script.js", "src/style.css", "src/index.html"] {
            let result = workbench.store.dispatch(Action::OpenPath(path.to_string()));
            workbench.run_effects(result.effects);
        }
        let result = workbench
            .store
            .dispatch(Action::RunCommand(Command::RefreshPreview));
        workbench.run_effects(result.effects);
        workbench.focus = Focus::Editor;

        workbench
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn should_quit(&self) -> bool {
        self.store.state().ui.should_quit
    }

    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = self.store.dispatch(action);
        self.run_effects(result.effects);
        result.state_changed
    }

    /// Drains async inputs and runs the store's debounce/auto-save tick.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;

        loop {
            match self.surface_rx.try_recv() {
                Ok(event) => changed |= self.dispatch(Action::SurfaceReport(event)),
                Err(_) => break,
            }
        }

        if let Some(rx) = &self.log_rx {
            let mut drained = 0;
            let mut lines = Vec::new();
            while drained < MAX_LOG_DRAIN_PER_TICK {
                match rx.try_recv() {
                    Ok(line) => {
                        lines.push(line);
                        drained += 1;
                    }
                    Err(_) => break,
                }
            }
            for line in lines {
                changed |= self.dispatch(Action::LogLine(line));
            }
        }

        let effects = self.store.tick(Instant::now());
        if !effects.is_empty() {
            changed = true;
            self.run_effects(effects);
        }

        changed
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SaveSnapshot(snapshot) => {
                    let Some(storage) = &self.storage else {
                        continue;
                    };
                    if let Err(err) = storage.save_snapshot(&snapshot) {
                        warn!(%err, "failed to save project snapshot");
                    }
                }
                Effect::ExportProject(snapshot) => {
                    let Some(storage) = &self.storage else {
                        continue;
                    };
                    match storage.export_archive(&snapshot) {
                        Ok(path) => {
                            self.dispatch(Action::LogLine(format!(
                                "Exported {}",
                                path.display()
                            )));
                        }
                        Err(err) => {
                            warn!(%err, "failed to export project");
                            self.dispatch(Action::LogLine(format!("Export failed: {err}")));
                        }
                    }
                }
                Effect::InjectPreview(build) => {
                    self.document = Some(self.surface.inject(&build));
                }
                Effect::EditorSetModel {
                    path,
                    language,
                    text,
                } => {
                    self.editor.set_model(&text, language);
                    self.editor.path = Some(path);
                }
                Effect::EditorCommand(cmd) => {
                    self.editor.run_command(cmd);
                    if cmd == EditorCommand::Format {
                        self.sync_editor_text();
                    }
                }
            }
        }
    }

    /// Pushes the pane's buffer back through the store as an edit.
    fn sync_editor_text(&mut self) {
        let Some(path) = self.editor.path.clone() else {
            return;
        };
        let text = self.editor.text();
        self.dispatch(Action::EditorChanged { path, text });
        let cursor = self.editor.cursor_position();
        self.dispatch(Action::CursorMoved(cursor));
    }
}
