//! Contract with the text-editing widget. The kernel pushes a model (text +
//! language) and imperative commands; edits and cursor moves flow back in as
//! actions.

use crate::models::FileKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorLanguage {
    Html,
    Css,
    JavaScript,
}

impl EditorLanguage {
    pub fn id(self) -> &'static str {
        match self {
            EditorLanguage::Html => "html",
            EditorLanguage::Css => "css",
            EditorLanguage::JavaScript => "javascript",
        }
    }

    pub fn from_kind(kind: FileKind) -> Option<Self> {
        match kind {
            FileKind::Html => Some(EditorLanguage::Html),
            FileKind::Css => Some(EditorLanguage::Css),
            FileKind::Js => Some(EditorLanguage::JavaScript),
            FileKind::Plain => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Format,
    Find,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: u32,
    pub column: u32,
}

pub trait EditorHost {
    fn set_model(&mut self, text: &str, language: EditorLanguage);
    fn run_command(&mut self, command: EditorCommand);
}
