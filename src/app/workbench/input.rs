//! Keyboard handling: dialogs first, then global chords, then the focused
//! pane.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::kernel::{Action, Command};
use crate::models::NodeKind;

use super::{Focus, PromptKind, Workbench};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

impl Workbench {
    pub fn handle_key(&mut self, key: KeyEvent) -> LoopControl {
        let handled = self.handle_confirm_dialog(key)
            || self.handle_prompt(key)
            || self.handle_find_prompt(key)
            || self.handle_global_chord(key);

        if !handled {
            match self.focus {
                Focus::Explorer => self.handle_explorer_key(key),
                Focus::Editor => self.handle_editor_key(key),
                Focus::Terminal => self.handle_terminal_key(key),
            }
        }

        if self.should_quit() {
            LoopControl::Quit
        } else {
            LoopControl::Continue
        }
    }

    fn handle_global_chord(&mut self, key: KeyEvent) -> bool {
        if !key.modifiers.contains(KeyModifiers::CONTROL) {
            // Tab cycles focus across visible panes
            if key.code == KeyCode::Tab {
                self.focus = match self.focus {
                    Focus::Explorer => Focus::Editor,
                    Focus::Editor => {
                        if self.store.state().ui.terminal_visible {
                            Focus::Terminal
                        } else {
                            Focus::Explorer
                        }
                    }
                    Focus::Terminal => Focus::Explorer,
                };
                return true;
            }
            return false;
        }

        let command = match key.code {
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('s') => Some(Command::Save),
            KeyCode::Char('e') => Some(Command::ExportProject),
            KeyCode::Char('b') => Some(Command::ToggleSidebar),
            KeyCode::Char('j') => Some(Command::ToggleTerminal),
            KeyCode::Char('f') => Some(Command::Find),
            KeyCode::Char('n') => Some(Command::NewFile),
            KeyCode::Char('r') => Some(Command::RefreshPreview),
            KeyCode::Char('l') => Some(Command::FormatDocument),
            KeyCode::Left => Some(Command::PrevTab),
            KeyCode::Right => Some(Command::NextTab),
            _ => None,
        };

        let Some(command) = command else {
            return false;
        };
        self.dispatch(Action::RunCommand(command));
        if command == Command::ToggleTerminal && self.store.state().ui.terminal_visible {
            self.focus = Focus::Terminal;
        }
        true
    }

    fn handle_confirm_dialog(&mut self, key: KeyEvent) -> bool {
        if !self.store.state().ui.confirm_dialog.visible {
            return false;
        }
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.dispatch(Action::ConfirmClose { accept: true });
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.dispatch(Action::ConfirmClose { accept: false });
            }
            _ => {}
        }
        true
    }

    fn handle_prompt(&mut self, key: KeyEvent) -> bool {
        if !self.prompt.visible() {
            return false;
        }
        match key.code {
            KeyCode::Esc => self.prompt.reset(),
            KeyCode::Enter => self.submit_prompt(),
            KeyCode::Backspace => {
                self.prompt.value.pop();
            }
            KeyCode::Char(ch) => self.prompt.value.push(ch),
            _ => {}
        }
        true
    }

    fn handle_find_prompt(&mut self, key: KeyEvent) -> bool {
        let Some(prompt) = &mut self.editor.find_prompt else {
            return false;
        };
        match key.code {
            KeyCode::Esc => {
                self.editor.find_prompt = None;
            }
            KeyCode::Enter => {
                let query = prompt.clone();
                self.editor.find_prompt = None;
                if self.editor.jump_to(&query) {
                    let cursor = self.editor.cursor_position();
                    self.dispatch(Action::CursorMoved(cursor));
                }
            }
            KeyCode::Backspace => {
                prompt.pop();
            }
            KeyCode::Char(ch) => prompt.push(ch),
            _ => {}
        }
        true
    }

    fn handle_explorer_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.dispatch(Action::ExplorerMoveSelection { delta: -1 });
            }
            KeyCode::Down => {
                self.dispatch(Action::ExplorerMoveSelection { delta: 1 });
            }
            KeyCode::PageUp => {
                self.dispatch(Action::ExplorerScroll { delta: -10 });
            }
            KeyCode::PageDown => {
                self.dispatch(Action::ExplorerScroll { delta: 10 });
            }
            KeyCode::Enter => {
                self.dispatch(Action::ExplorerActivate);
            }
            KeyCode::Char('n') => self.open_create_prompt(PromptKind::NewFile),
            KeyCode::Char('N') => self.open_create_prompt(PromptKind::NewFolder),
            KeyCode::Char('r') => self.open_rename_prompt(),
            KeyCode::Char('d') => {
                if let Some(row) = self.store.state().explorer.selected_row() {
                    let path = row.path.clone();
                    self.dispatch(Action::DeletePath(path));
                }
            }
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.editor.move_cursor(-1, 0),
            KeyCode::Down => self.editor.move_cursor(1, 0),
            KeyCode::Left => self.editor.move_cursor(0, -1),
            KeyCode::Right => self.editor.move_cursor(0, 1),
            KeyCode::Enter => {
                self.editor.insert_newline();
                self.sync_editor_text();
                return;
            }
            KeyCode::Backspace => {
                self.editor.backspace();
                self.sync_editor_text();
                return;
            }
            KeyCode::Char(ch) => {
                self.editor.insert_char(ch);
                self.sync_editor_text();
                return;
            }
            _ => return,
        }
        let cursor = self.editor.cursor_position();
        self.dispatch(Action::CursorMoved(cursor));
    }

    fn handle_terminal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.terminal_input);
                self.dispatch(Action::TerminalInput(line));
            }
            KeyCode::Backspace => {
                self.terminal_input.pop();
            }
            KeyCode::Char(ch) => self.terminal_input.push(ch),
            _ => {}
        }
    }

    fn open_create_prompt(&mut self, kind: PromptKind) {
        let parent = match self.store.state().explorer.selected_row() {
            Some(row) if row.is_folder => row.path.clone(),
            Some(row) => match row.path.rfind('/') {
                Some(idx) => row.path[..idx].to_string(),
                None => String::new(),
            },
            None => String::new(),
        };
        self.prompt.reset();
        self.prompt.kind = Some(kind);
        self.prompt.title = match kind {
            PromptKind::NewFile => "New file",
            PromptKind::NewFolder => "New folder",
            PromptKind::Rename => "Rename",
        };
        self.prompt.target = parent;
    }

    fn open_rename_prompt(&mut self) {
        let Some(row) = self.store.state().explorer.selected_row() else {
            return;
        };
        let (path, name) = (row.path.clone(), row.name.to_string());
        self.prompt.reset();
        self.prompt.kind = Some(PromptKind::Rename);
        self.prompt.title = "Rename";
        self.prompt.value = name;
        self.prompt.target = path;
    }

    fn submit_prompt(&mut self) {
        let Some(kind) = self.prompt.kind else {
            return;
        };
        if self.prompt.value.trim().is_empty() {
            self.prompt.error = Some("Name cannot be empty".to_string());
            return;
        }
        let name = self.prompt.value.trim().to_string();
        let target = std::mem::take(&mut self.prompt.target);
        self.prompt.reset();

        match kind {
            PromptKind::NewFile => {
                self.dispatch(Action::CreateNode {
                    parent_path: target,
                    name,
                    kind: NodeKind::File,
                });
            }
            PromptKind::NewFolder => {
                self.dispatch(Action::CreateNode {
                    parent_path: target,
                    name,
                    kind: NodeKind::Folder,
                });
            }
            PromptKind::Rename => {
                self.dispatch(Action::RenamePath {
                    path: target,
                    new_name: name,
                });
            }
        }
    }
}
