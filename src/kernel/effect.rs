use crate::kernel::preview::PreviewBuild;
use crate::kernel::services::ports::editor::{EditorCommand, EditorLanguage};
use crate::kernel::services::ports::persistence::ProjectSnapshot;

/// Side effects the store asks the shell to perform. The store itself never
/// touches IO or collaborator handles.
#[derive(Debug, Clone)]
pub enum Effect {
    SaveSnapshot(ProjectSnapshot),
    ExportProject(ProjectSnapshot),
    InjectPreview(PreviewBuild),
    EditorSetModel {
        path: String,
        language: EditorLanguage,
        text: String,
    },
    EditorCommand(EditorCommand),
}
