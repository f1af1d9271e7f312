//! Single-writer store: every intent flows through `dispatch`, which is the
//! only place the tree and the open-files registry change together. That is
//! what keeps registry paths a subset of tree paths at all times.

use std::time::Instant;

use tracing::{info, warn};

use crate::kernel::action::Action;
use crate::kernel::autosave::AutoSaveTimer;
use crate::kernel::command::Command;
use crate::kernel::effect::Effect;
use crate::kernel::services::ports::editor::{EditorCommand, EditorLanguage};
use crate::kernel::services::ports::surface::{parse_error_report, SurfaceEvent};
use crate::kernel::state::{AppState, PendingClose};
use crate::models::{FileKind, NodeKind};

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn none() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn changed() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: true,
        }
    }

    fn with(effects: Vec<Effect>, state_changed: bool) -> Self {
        Self {
            effects,
            state_changed,
        }
    }
}

pub struct Store {
    state: AppState,
    autosave: AutoSaveTimer,
}

impl Store {
    pub fn new(state: AppState, now: Instant) -> Self {
        Self {
            state,
            autosave: AutoSaveTimer::new(now),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::RunCommand(cmd) => self.dispatch_command(cmd),

            Action::CreateNode {
                parent_path,
                name,
                kind,
            } => self.create_node(&parent_path, &name, kind),

            Action::DeletePath(path) => self.delete_path(&path),

            Action::RenamePath { path, new_name } => self.rename_path(&path, &new_name),

            Action::ToggleFolder(path) => {
                match self.state.explorer.tree().toggle(&path) {
                    Some(tree) => {
                        self.state.explorer.set_tree(tree);
                        DispatchResult::changed()
                    }
                    None => DispatchResult::none(),
                }
            }

            Action::OpenPath(path) => self.open_path(&path),

            Action::SelectTab(path) => {
                if !self.state.open_files.set_active(&path) {
                    return DispatchResult::none();
                }
                DispatchResult::with(self.active_model_effects(), true)
            }

            Action::CloseFile(path) => self.close_file(&path),

            Action::ConfirmClose { accept } => self.resolve_confirm(accept),

            Action::EditorChanged { path, text } => self.editor_changed(&path, &text),

            Action::CursorMoved(cursor) => {
                if self.state.ui.cursor == cursor {
                    return DispatchResult::none();
                }
                self.state.ui.cursor = cursor;
                DispatchResult::changed()
            }

            Action::SurfaceReport(event) => self.surface_report(event),

            Action::TerminalInput(line) => self.terminal_input(&line),

            Action::ExplorerSetViewHeight { height } => DispatchResult::with(
                Vec::new(),
                self.state.explorer.set_view_height(height),
            ),
            Action::ExplorerMoveSelection { delta } => {
                DispatchResult::with(Vec::new(), self.state.explorer.move_selection(delta))
            }
            Action::ExplorerScroll { delta } => {
                DispatchResult::with(Vec::new(), self.state.explorer.scroll(delta))
            }
            Action::ExplorerActivate => self.explorer_activate(),

            Action::LogLine(line) => {
                self.state.terminal.push_line(line);
                DispatchResult::changed()
            }

            Action::Tick { now } => DispatchResult::with(self.tick(now), false),
        }
    }

    /// Debounced preview rebuild plus the auto-save timer. Runs off the
    /// shell's tick cadence.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Some(build) = self.state.preview.take_due_rebuild(now) {
            effects.push(Effect::InjectPreview(build));
        }

        if self.autosave.should_fire(now, self.state.any_dirty()) {
            info!("auto-saving project");
            effects.extend(self.do_save("Auto-saved"));
        }

        effects
    }

    fn dispatch_command(&mut self, cmd: Command) -> DispatchResult {
        match cmd {
            Command::Save => DispatchResult::with(self.do_save("Saved"), true),

            Command::ExportProject => {
                let snapshot = self.state.snapshot();
                self.state.terminal.push_line("Exporting project...");
                DispatchResult::with(vec![Effect::ExportProject(snapshot)], true)
            }

            Command::NewFile => self.dispatch(Action::CreateNode {
                parent_path: "src".to_string(),
                name: "new-file.js".to_string(),
                kind: NodeKind::File,
            }),

            Command::ToggleSidebar => {
                self.state.ui.sidebar_visible = !self.state.ui.sidebar_visible;
                DispatchResult::changed()
            }

            Command::ToggleTerminal => {
                self.state.ui.terminal_visible = !self.state.ui.terminal_visible;
                DispatchResult::changed()
            }

            Command::RefreshPreview => {
                let sources = self.state.preview_sources();
                let now = Instant::now();
                self.state.preview.mark_dirty(sources, now);
                let build = self.state.preview.rebuild();
                DispatchResult::with(vec![Effect::InjectPreview(build)], true)
            }

            Command::Find => {
                DispatchResult::with(vec![Effect::EditorCommand(EditorCommand::Find)], false)
            }

            Command::FormatDocument => DispatchResult::with(
                vec![Effect::EditorCommand(EditorCommand::Format)],
                false,
            ),

            Command::NextTab => self.cycle_tab(1),
            Command::PrevTab => self.cycle_tab(-1),

            Command::Quit => {
                self.state.ui.should_quit = true;
                DispatchResult::changed()
            }
        }
    }

    fn create_node(&mut self, parent_path: &str, name: &str, kind: NodeKind) -> DispatchResult {
        let tree = match self.state.explorer.tree().create(parent_path, name, kind) {
            Ok(tree) => tree,
            Err(err) => return self.report_error(err.to_string()),
        };
        self.state.explorer.set_tree(tree);

        let path = if parent_path.is_empty() {
            name.to_string()
        } else {
            format!("{parent_path}/{name}")
        };
        self.state.explorer.selected_path = Some(path.clone());
        info!(%path, "created node");

        // new supported files open straight into a tab
        let openable = kind == NodeKind::File
            && self
                .state
                .explorer
                .tree()
                .find(&path)
                .and_then(|n| n.file_kind())
                .is_some_and(FileKind::is_openable);
        if openable {
            let mut result = self.open_path(&path);
            result.state_changed = true;
            return result;
        }
        DispatchResult::changed()
    }

    fn delete_path(&mut self, path: &str) -> DispatchResult {
        let tree = match self.state.explorer.tree().delete(path) {
            Ok(tree) => tree,
            Err(err) => return self.report_error(err.to_string()),
        };
        self.state.explorer.set_tree(tree);
        self.state.open_files.reconcile_delete(path);
        info!(%path, "deleted node");

        let mut result = DispatchResult::changed();
        result.effects = self.active_model_effects();
        self.touch_preview();
        result
    }

    fn rename_path(&mut self, path: &str, new_name: &str) -> DispatchResult {
        let tree = match self.state.explorer.tree().rename(path, new_name) {
            Ok(tree) => tree,
            Err(err) => return self.report_error(err.to_string()),
        };

        let new_path = match path.rfind('/') {
            Some(idx) => format!("{}/{new_name}", &path[..idx]),
            None => new_name.to_string(),
        };
        let new_kind = tree.find(&new_path).and_then(|n| n.file_kind());

        self.state.explorer.set_tree(tree);
        self.state
            .open_files
            .reconcile_rename(path, &new_path, new_kind);
        self.state.explorer.selected_path = Some(new_path.clone());
        info!(from = %path, to = %new_path, "renamed node");

        let mut result = DispatchResult::changed();
        result.effects = self.active_model_effects();
        self.touch_preview();
        result
    }

    fn open_path(&mut self, path: &str) -> DispatchResult {
        let Some(node) = self.state.explorer.tree().find(path) else {
            return self.report_error(format!("no node at `{path}`"));
        };
        match self.state.open_files.open(node) {
            Ok(changed) => {
                if !changed {
                    return DispatchResult::none();
                }
                DispatchResult::with(self.active_model_effects(), true)
            }
            Err(err) => self.report_error(err.to_string()),
        }
    }

    fn close_file(&mut self, path: &str) -> DispatchResult {
        if self.state.open_files.get(path).is_none() {
            return DispatchResult::none();
        }
        if self.state.open_files.is_dirty(path) {
            let dialog = &mut self.state.ui.confirm_dialog;
            dialog.visible = true;
            dialog.message = format!("`{path}` has unsaved changes. Close anyway?");
            dialog.pending = Some(PendingClose {
                path: path.to_string(),
            });
            return DispatchResult::changed();
        }
        self.state.open_files.close(path);
        DispatchResult::with(self.active_model_effects(), true)
    }

    fn resolve_confirm(&mut self, accept: bool) -> DispatchResult {
        let pending = self.state.ui.confirm_dialog.pending.take();
        let was_visible = self.state.ui.confirm_dialog.visible;
        self.state.ui.confirm_dialog.reset();

        match pending {
            Some(close) if accept => {
                self.state.open_files.close(&close.path);
                DispatchResult::with(self.active_model_effects(), true)
            }
            _ => DispatchResult::with(Vec::new(), was_visible),
        }
    }

    fn editor_changed(&mut self, path: &str, text: &str) -> DispatchResult {
        // only open tabs accept edits; a stale editor model (for example
        // after its tab was closed) must not write through to the tree
        if !self.state.open_files.edit(path, text) {
            return DispatchResult::none();
        }
        if let Some(tree) = self.state.explorer.tree().update_content(path, text) {
            self.state.explorer.set_tree(tree);
        }
        self.touch_preview();
        DispatchResult::changed()
    }

    fn surface_report(&mut self, event: SurfaceEvent) -> DispatchResult {
        let Some(error) = parse_error_report(&event.payload) else {
            return DispatchResult::none();
        };
        if !self.state.preview.apply_report(event.generation, error.clone()) {
            info!(generation = event.generation, "dropping stale preview report");
            return DispatchResult::none();
        }
        self.state.terminal.push_line(error.to_string());
        DispatchResult::changed()
    }

    fn terminal_input(&mut self, line: &str) -> DispatchResult {
        if self.state.terminal.run_builtin(line) {
            return DispatchResult::changed();
        }
        // commands needing project state land here
        match line.trim() {
            "ls" => {
                let listing: Vec<String> = self
                    .state
                    .explorer
                    .tree()
                    .flatten_rows()
                    .into_iter()
                    .map(|row| row.path)
                    .collect();
                if listing.is_empty() {
                    self.state.terminal.push_line("(empty project)");
                } else {
                    for path in listing {
                        self.state.terminal.push_line(path);
                    }
                }
                DispatchResult::changed()
            }
            _ => DispatchResult::changed(),
        }
    }

    fn explorer_activate(&mut self) -> DispatchResult {
        let Some(row) = self.state.explorer.selected_row() else {
            return DispatchResult::none();
        };
        let path = row.path.clone();
        if row.is_folder {
            self.dispatch(Action::ToggleFolder(path))
        } else {
            self.dispatch(Action::OpenPath(path))
        }
    }

    fn cycle_tab(&mut self, delta: isize) -> DispatchResult {
        let entries = self.state.open_files.entries();
        if entries.len() < 2 {
            return DispatchResult::none();
        }
        let current = self
            .state
            .open_files
            .active_path()
            .and_then(|p| entries.iter().position(|e| e.path == p))
            .unwrap_or(0);
        let len = entries.len() as isize;
        let next = (current as isize + delta).rem_euclid(len) as usize;
        let path = entries[next].path.clone();
        self.dispatch(Action::SelectTab(path))
    }

    fn do_save(&mut self, label: &str) -> Vec<Effect> {
        let snapshot = self.state.snapshot();
        self.state.open_files.mark_all_saved();
        let saved_tree = self.state.explorer.tree().mark_all_saved();
        self.state.explorer.set_tree(saved_tree);
        self.state.last_saved = Some(snapshot.last_modified);
        self.state.ui.notification = Some(format!("{label} project"));
        self.state.terminal.push_line(format!("{label} project"));
        vec![Effect::SaveSnapshot(snapshot)]
    }

    /// Re-arms the debounce window with the current sources.
    fn touch_preview(&mut self) {
        let sources = self.state.preview_sources();
        self.state.preview.mark_dirty(sources, Instant::now());
    }

    /// Effects that point the editor host at the active tab's model.
    fn active_model_effects(&self) -> Vec<Effect> {
        let Some(entry) = self.state.open_files.active() else {
            return Vec::new();
        };
        let Some(language) = EditorLanguage::from_kind(entry.kind) else {
            return Vec::new();
        };
        vec![Effect::EditorSetModel {
            path: entry.path.clone(),
            language,
            text: entry.content.clone(),
        }]
    }

    fn report_error(&mut self, message: String) -> DispatchResult {
        warn!(%message, "operation rejected");
        self.state.terminal.push_line(format!("Error: {message}"));
        self.state.ui.notification = Some(message);
        DispatchResult::changed()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
