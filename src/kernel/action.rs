use std::time::Instant;

use crate::kernel::command::Command;
use crate::kernel::services::ports::editor::CursorPosition;
use crate::kernel::services::ports::surface::SurfaceEvent;
use crate::models::NodeKind;

#[derive(Debug, Clone)]
pub enum Action {
    RunCommand(Command),
    CreateNode {
        parent_path: String,
        name: String,
        kind: NodeKind,
    },
    DeletePath(String),
    RenamePath {
        path: String,
        new_name: String,
    },
    ToggleFolder(String),
    OpenPath(String),
    SelectTab(String),
    CloseFile(String),
    ConfirmClose {
        accept: bool,
    },
    EditorChanged {
        path: String,
        text: String,
    },
    CursorMoved(CursorPosition),
    SurfaceReport(SurfaceEvent),
    TerminalInput(String),
    ExplorerSetViewHeight {
        height: usize,
    },
    ExplorerMoveSelection {
        delta: isize,
    },
    ExplorerScroll {
        delta: isize,
    },
    ExplorerActivate,
    LogLine(String),
    Tick {
        now: Instant,
    },
}
