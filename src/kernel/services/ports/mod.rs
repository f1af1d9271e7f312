//! Service ports: traits + data contracts.

pub mod editor;
pub mod persistence;
pub mod surface;

pub use editor::{CursorPosition, EditorCommand, EditorHost, EditorLanguage};
pub use persistence::{Preferences, ProjectSnapshot, ProjectStore};
pub use surface::{parse_error_report, DocumentHandle, RenderSurface, SurfaceEvent};
