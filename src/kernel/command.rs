//! Semantic commands: what a menu item or keybinding means, independent of
//! the key that triggered it.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // ==================== Project ====================
    Save,
    ExportProject,
    NewFile,

    // ==================== View ====================
    ToggleSidebar,
    ToggleTerminal,
    RefreshPreview,

    // ==================== Editor ====================
    Find,
    FormatDocument,

    // ==================== Tabs ====================
    NextTab,
    PrevTab,

    // ==================== System ====================
    Quit,
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Command::Save => "save",
            Command::ExportProject => "exportProject",
            Command::NewFile => "newFile",
            Command::ToggleSidebar => "toggleSidebar",
            Command::ToggleTerminal => "toggleTerminal",
            Command::RefreshPreview => "refreshPreview",
            Command::Find => "find",
            Command::FormatDocument => "formatDocument",
            Command::NextTab => "nextTab",
            Command::PrevTab => "prevTab",
            Command::Quit => "quit",
        }
    }

    pub fn from_name(name: &str) -> Option<Command> {
        let cmd = match name {
            "save" => Command::Save,
            "exportProject" => Command::ExportProject,
            "newFile" => Command::NewFile,
            "toggleSidebar" => Command::ToggleSidebar,
            "toggleTerminal" => Command::ToggleTerminal,
            "refreshPreview" => Command::RefreshPreview,
            "find" => Command::Find,
            "formatDocument" => Command::FormatDocument,
            "nextTab" => Command::NextTab,
            "prevTab" => Command::PrevTab,
            "quit" => Command::Quit,
            _ => return None,
        };
        Some(cmd)
    }
}
