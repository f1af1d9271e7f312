//! Data model layer.

pub mod file_tree;
pub mod open_files;
pub mod templates;

pub use file_tree::{
    FileKind, FileNode, FileTree, FileTreeError, NodeBody, NodeId, NodeKind, TreeRow,
};
pub use open_files::{OpenFileEntry, OpenFilesRegistry, RegistryError};
