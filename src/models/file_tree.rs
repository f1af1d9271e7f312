//! Project file-tree model.
//!
//! The tree is a persistent data structure: every mutation returns a new
//! `FileTree` that shares all untouched subtrees with its predecessor via
//! `Arc`. Rewrites only allocate along the spine from the root collection to
//! the target node, so view layers can diff snapshots by pointer identity.

use compact_str::CompactString;
use std::fmt;
use std::sync::Arc;

use super::templates;

/// Opaque node identifier, assigned at creation and stable across rewrites.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// What a file node holds. Folders are structural and carry no kind; files
/// with an extension the editor does not understand are `Plain` and may live
/// in the tree but can never be opened as a tab.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    Html,
    Css,
    Js,
    Plain,
}

impl FileKind {
    /// Derives the kind from the leaf name. Only applied at create and
    /// rename time; the stored kind is never re-derived elsewhere.
    pub fn from_name(name: &str) -> Self {
        let ext = name.rsplit('.').next().unwrap_or(name);
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Self::Html,
            "css" => Self::Css,
            "js" | "javascript" => Self::Js,
            _ => Self::Plain,
        }
    }

    pub fn is_openable(self) -> bool {
        !matches!(self, Self::Plain)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::Js => "js",
            Self::Plain => "file",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Folder,
}

#[derive(Debug)]
pub enum FileTreeError {
    ParentNotFound(String),
    ParentNotFolder(String),
    NameExists(String),
    NotFound(String),
    InvalidName(String),
}

impl fmt::Display for FileTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTreeError::ParentNotFound(path) => {
                write!(f, "parent folder `{path}` does not exist")
            }
            FileTreeError::ParentNotFolder(path) => write!(f, "`{path}` is not a folder"),
            FileTreeError::NameExists(name) => {
                write!(f, "a sibling named `{name}` already exists")
            }
            FileTreeError::NotFound(path) => write!(f, "no node at `{path}`"),
            FileTreeError::InvalidName(name) => write!(f, "invalid name `{name}`"),
        }
    }
}

impl std::error::Error for FileTreeError {}

/// Payload split by node shape: folders always have children (possibly
/// empty), files never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeBody {
    Folder {
        children: Vec<Arc<FileNode>>,
        is_open: bool,
    },
    File {
        kind: FileKind,
        content: String,
        is_dirty: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub id: NodeId,
    pub name: CompactString,
    /// Slash-joined ancestor names; unique within the tree and kept in sync
    /// with `name` and the parent chain by every mutation.
    pub path: String,
    pub body: NodeBody,
}

impl FileNode {
    pub fn is_folder(&self) -> bool {
        matches!(self.body, NodeBody::Folder { .. })
    }

    pub fn is_open(&self) -> bool {
        matches!(self.body, NodeBody::Folder { is_open: true, .. })
    }

    pub fn file_kind(&self) -> Option<FileKind> {
        match self.body {
            NodeBody::File { kind, .. } => Some(kind),
            NodeBody::Folder { .. } => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.body {
            NodeBody::File { content, .. } => Some(content),
            NodeBody::Folder { .. } => None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self.body, NodeBody::File { is_dirty: true, .. })
    }

    pub fn children(&self) -> &[Arc<FileNode>] {
        match &self.body {
            NodeBody::Folder { children, .. } => children,
            NodeBody::File { .. } => &[],
        }
    }
}

/// One flattened explorer row; only open folders contribute their children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub path: String,
    pub name: CompactString,
    pub depth: u16,
    pub is_folder: bool,
    pub is_open: bool,
    pub kind: Option<FileKind>,
    pub is_dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTree {
    roots: Vec<Arc<FileNode>>,
    next_id: u64,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            next_id: 1,
        }
    }

    pub fn roots(&self) -> &[Arc<FileNode>] {
        &self.roots
    }

    /// Exact-path depth-first lookup.
    pub fn find(&self, path: &str) -> Option<&FileNode> {
        find_in(&self.roots, path)
    }

    /// Creates a file or folder under `parent_path` (empty string = root
    /// collection). Files get their kind from the extension and default
    /// content seeded from the extension template; the parent folder is
    /// forced open so the new node is visible.
    pub fn create(
        &self,
        parent_path: &str,
        name: &str,
        kind: NodeKind,
    ) -> Result<FileTree, FileTreeError> {
        if name.is_empty() || name.contains('/') {
            return Err(FileTreeError::InvalidName(name.to_string()));
        }

        let id = NodeId(self.next_id);

        if parent_path.is_empty() {
            if self.roots.iter().any(|n| n.name == name) {
                return Err(FileTreeError::NameExists(name.to_string()));
            }
            let mut roots = self.roots.clone();
            roots.push(Arc::new(new_node(id, name, "", kind)));
            return Ok(FileTree {
                roots,
                next_id: self.next_id + 1,
            });
        }

        let rewritten = rewrite_at(&self.roots, parent_path, &mut |node| {
            let NodeBody::Folder { children, .. } = &node.body else {
                return Err(FileTreeError::ParentNotFolder(node.path.clone()));
            };
            if children.iter().any(|c| c.name == name) {
                return Err(FileTreeError::NameExists(name.to_string()));
            }
            let mut children = children.clone();
            children.push(Arc::new(new_node(id, name, &node.path, kind)));
            Ok(Some(FileNode {
                id: node.id,
                name: node.name.clone(),
                path: node.path.clone(),
                body: NodeBody::Folder {
                    children,
                    is_open: true,
                },
            }))
        })?;

        match rewritten {
            Some(roots) => Ok(FileTree {
                roots,
                next_id: self.next_id + 1,
            }),
            None => Err(FileTreeError::ParentNotFound(parent_path.to_string())),
        }
    }

    /// Removes the node at `path` together with its whole subtree.
    pub fn delete(&self, path: &str) -> Result<FileTree, FileTreeError> {
        match rewrite_at(&self.roots, path, &mut |_| Ok(None))? {
            Some(roots) => Ok(FileTree {
                roots,
                next_id: self.next_id,
            }),
            None => Err(FileTreeError::NotFound(path.to_string())),
        }
    }

    /// Renames the node at `old_path`, recomputing the path of every
    /// descendant and, for files, the kind from the new extension.
    pub fn rename(&self, old_path: &str, new_name: &str) -> Result<FileTree, FileTreeError> {
        if new_name.is_empty() || new_name.contains('/') {
            return Err(FileTreeError::InvalidName(new_name.to_string()));
        }

        let parent_path = parent_of(old_path);
        let siblings = match parent_path {
            "" => &self.roots,
            parent => match self.find(parent) {
                Some(node) => match &node.body {
                    NodeBody::Folder { children, .. } => children,
                    NodeBody::File { .. } => {
                        return Err(FileTreeError::ParentNotFolder(parent.to_string()))
                    }
                },
                None => return Err(FileTreeError::NotFound(old_path.to_string())),
            },
        };
        if siblings
            .iter()
            .any(|s| s.path != old_path && s.name == new_name)
        {
            return Err(FileTreeError::NameExists(new_name.to_string()));
        }

        let new_path = join_path(parent_path, new_name);
        let rewritten = rewrite_at(&self.roots, old_path, &mut |node| {
            Ok(Some(renamed_node(node, new_name, &new_path)))
        })?;

        match rewritten {
            Some(roots) => Ok(FileTree {
                roots,
                next_id: self.next_id,
            }),
            None => Err(FileTreeError::NotFound(old_path.to_string())),
        }
    }

    /// Flips the expand state of the folder at `path`. Files and unresolved
    /// paths are a soft no-op (`None`).
    pub fn toggle(&self, path: &str) -> Option<FileTree> {
        if !self.find(path)?.is_folder() {
            return None;
        }
        let roots = rewrite_at(&self.roots, path, &mut |node| match &node.body {
            NodeBody::Folder { children, is_open } => Ok(Some(FileNode {
                id: node.id,
                name: node.name.clone(),
                path: node.path.clone(),
                body: NodeBody::Folder {
                    children: children.clone(),
                    is_open: !is_open,
                },
            })),
            NodeBody::File { .. } => unreachable!("checked above"),
        })
        .ok()??;
        Some(FileTree {
            roots,
            next_id: self.next_id,
        })
    }

    /// Replaces the content of the file at `path` and marks it dirty.
    /// Folders and unresolved paths are a soft no-op (`None`).
    pub fn update_content(&self, path: &str, text: &str) -> Option<FileTree> {
        if self.find(path)?.is_folder() {
            return None;
        }
        let roots = rewrite_at(&self.roots, path, &mut |node| match &node.body {
            NodeBody::File { kind, .. } => Ok(Some(FileNode {
                id: node.id,
                name: node.name.clone(),
                path: node.path.clone(),
                body: NodeBody::File {
                    kind: *kind,
                    content: text.to_string(),
                    is_dirty: true,
                },
            })),
            NodeBody::Folder { .. } => unreachable!("checked above"),
        })
        .ok()??;
        Some(FileTree {
            roots,
            next_id: self.next_id,
        })
    }

    /// Clears the dirty flag on every file; subtrees with no dirty files are
    /// shared untouched.
    pub fn mark_all_saved(&self) -> FileTree {
        FileTree {
            roots: self.roots.iter().map(clear_dirty).collect(),
            next_id: self.next_id,
        }
    }

    pub fn any_dirty(&self) -> bool {
        fn walk(nodes: &[Arc<FileNode>]) -> bool {
            nodes.iter().any(|n| n.is_dirty() || walk(n.children()))
        }
        walk(&self.roots)
    }

    /// Flattens the tree for the explorer view: insertion order is display
    /// order, closed folders hide their subtree.
    pub fn flatten_rows(&self) -> Vec<TreeRow> {
        fn walk(nodes: &[Arc<FileNode>], depth: u16, out: &mut Vec<TreeRow>) {
            for node in nodes {
                out.push(TreeRow {
                    path: node.path.clone(),
                    name: node.name.clone(),
                    depth,
                    is_folder: node.is_folder(),
                    is_open: node.is_open(),
                    kind: node.file_kind(),
                    is_dirty: node.is_dirty(),
                });
                if node.is_open() {
                    walk(node.children(), depth + 1, out);
                }
            }
        }
        let mut rows = Vec::new();
        walk(&self.roots, 0, &mut rows);
        rows
    }
}

fn new_node(id: NodeId, name: &str, parent_path: &str, kind: NodeKind) -> FileNode {
    let path = join_path(parent_path, name);
    let body = match kind {
        NodeKind::Folder => NodeBody::Folder {
            children: Vec::new(),
            is_open: true,
        },
        NodeKind::File => NodeBody::File {
            kind: FileKind::from_name(name),
            content: templates::default_content(name),
            is_dirty: false,
        },
    };
    FileNode {
        id,
        name: CompactString::from(name),
        path,
        body,
    }
}

fn renamed_node(node: &FileNode, new_name: &str, new_path: &str) -> FileNode {
    let body = match &node.body {
        NodeBody::File {
            content, is_dirty, ..
        } => NodeBody::File {
            kind: FileKind::from_name(new_name),
            content: content.clone(),
            is_dirty: *is_dirty,
        },
        NodeBody::Folder { children, is_open } => NodeBody::Folder {
            children: children
                .iter()
                .map(|c| Arc::new(rebased_subtree(c, new_path)))
                .collect(),
            is_open: *is_open,
        },
    };
    FileNode {
        id: node.id,
        name: CompactString::from(new_name),
        path: new_path.to_string(),
        body,
    }
}

fn rebased_subtree(node: &FileNode, parent_path: &str) -> FileNode {
    let path = join_path(parent_path, &node.name);
    let body = match &node.body {
        NodeBody::Folder { children, is_open } => NodeBody::Folder {
            children: children
                .iter()
                .map(|c| Arc::new(rebased_subtree(c, &path)))
                .collect(),
            is_open: *is_open,
        },
        file => file.clone(),
    };
    FileNode {
        id: node.id,
        name: node.name.clone(),
        path,
        body,
    }
}

fn clear_dirty(node: &Arc<FileNode>) -> Arc<FileNode> {
    match &node.body {
        NodeBody::File { is_dirty: false, .. } => Arc::clone(node),
        NodeBody::File { kind, content, .. } => Arc::new(FileNode {
            id: node.id,
            name: node.name.clone(),
            path: node.path.clone(),
            body: NodeBody::File {
                kind: *kind,
                content: content.clone(),
                is_dirty: false,
            },
        }),
        NodeBody::Folder { children, is_open } => {
            let next: Vec<_> = children.iter().map(clear_dirty).collect();
            if next
                .iter()
                .zip(children.iter())
                .all(|(a, b)| Arc::ptr_eq(a, b))
            {
                Arc::clone(node)
            } else {
                Arc::new(FileNode {
                    id: node.id,
                    name: node.name.clone(),
                    path: node.path.clone(),
                    body: NodeBody::Folder {
                        children: next,
                        is_open: *is_open,
                    },
                })
            }
        }
    }
}

/// Rebuilds the spine from `nodes` down to the node at `target`, applying
/// `transform` there. `Ok(Some(node))` replaces the node, `Ok(None)` removes
/// it; siblings off the spine are shared by pointer. Returns `Ok(None)` at
/// the top level when `target` resolves to nothing.
///
/// Shared by create, delete, rename, toggle and update_content so there is
/// exactly one path-walking recursion in the model.
fn rewrite_at<F>(
    nodes: &[Arc<FileNode>],
    target: &str,
    transform: &mut F,
) -> Result<Option<Vec<Arc<FileNode>>>, FileTreeError>
where
    F: FnMut(&FileNode) -> Result<Option<FileNode>, FileTreeError>,
{
    let mut out = Vec::with_capacity(nodes.len());
    let mut found = false;

    for node in nodes {
        if !found && node.path == target {
            found = true;
            if let Some(next) = transform(node)? {
                out.push(Arc::new(next));
            }
        } else if !found && node.is_folder() && is_ancestor_path(&node.path, target) {
            match rewrite_at(node.children(), target, transform)? {
                Some(children) => {
                    found = true;
                    let is_open = node.is_open();
                    out.push(Arc::new(FileNode {
                        id: node.id,
                        name: node.name.clone(),
                        path: node.path.clone(),
                        body: NodeBody::Folder { children, is_open },
                    }));
                }
                None => out.push(Arc::clone(node)),
            }
        } else {
            out.push(Arc::clone(node));
        }
    }

    Ok(if found { Some(out) } else { None })
}

fn find_in<'a>(nodes: &'a [Arc<FileNode>], path: &str) -> Option<&'a FileNode> {
    for node in nodes {
        if node.path == path {
            return Some(node);
        }
        if node.is_folder() && is_ancestor_path(&node.path, path) {
            if let Some(found) = find_in(node.children(), path) {
                return Some(found);
            }
        }
    }
    None
}

pub(crate) fn is_ancestor_path(ancestor: &str, path: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> FileTree {
        FileTree::new()
            .create("", "src", NodeKind::Folder)
            .unwrap()
            .create("src", "index.html", NodeKind::File)
            .unwrap()
            .create("src", "assets", NodeKind::Folder)
            .unwrap()
            .create("src/assets", "style.css", NodeKind::File)
            .unwrap()
    }

    fn assert_paths_consistent(nodes: &[Arc<FileNode>], parent: &str) {
        for node in nodes {
            assert_eq!(node.path, join_path(parent, &node.name));
            assert_paths_consistent(node.children(), &node.path);
        }
    }

    #[test]
    fn test_create_and_find() {
        let tree = sample_tree();
        assert!(tree.find("src").unwrap().is_folder());
        let css = tree.find("src/assets/style.css").unwrap();
        assert_eq!(css.file_kind(), Some(FileKind::Css));
        assert!(css.content().unwrap().contains("font-family"));
        assert!(tree.find("src/missing.js").is_none());
    }

    #[test]
    fn test_create_rejects_duplicate_sibling() {
        let tree = sample_tree();
        let err = tree.create("src", "index.html", NodeKind::File).unwrap_err();
        assert!(matches!(err, FileTreeError::NameExists(_)));
    }

    #[test]
    fn test_create_rejects_missing_parent() {
        let tree = sample_tree();
        let err = tree.create("nope", "a.js", NodeKind::File).unwrap_err();
        assert!(matches!(err, FileTreeError::ParentNotFound(_)));
    }

    #[test]
    fn test_create_under_file_rejected() {
        let tree = sample_tree();
        let err = tree
            .create("src/index.html", "a.js", NodeKind::File)
            .unwrap_err();
        assert!(matches!(err, FileTreeError::ParentNotFolder(_)));
    }

    #[test]
    fn test_rename_rewrites_descendant_paths() {
        let tree = sample_tree();
        let renamed = tree.rename("src", "app").unwrap();
        assert!(renamed.find("src").is_none());
        assert!(renamed.find("app/assets/style.css").is_some());
        assert_paths_consistent(renamed.roots(), "");
    }

    #[test]
    fn test_rename_recomputes_file_kind() {
        let tree = sample_tree();
        let renamed = tree.rename("src/index.html", "notes.txt").unwrap();
        let node = renamed.find("src/notes.txt").unwrap();
        assert_eq!(node.file_kind(), Some(FileKind::Plain));

        let back = renamed.rename("src/notes.txt", "main.js").unwrap();
        assert_eq!(
            back.find("src/main.js").unwrap().file_kind(),
            Some(FileKind::Js)
        );
    }

    #[test]
    fn test_rename_rejects_sibling_collision() {
        let tree = sample_tree();
        let err = tree.rename("src/assets", "index.html").unwrap_err();
        assert!(matches!(err, FileTreeError::NameExists(_)));
    }

    #[test]
    fn test_delete_cascades() {
        let tree = sample_tree();
        let pruned = tree.delete("src/assets").unwrap();
        assert!(pruned.find("src/assets").is_none());
        assert!(pruned.find("src/assets/style.css").is_none());
        assert!(pruned.find("src/index.html").is_some());
        assert!(matches!(
            pruned.delete("src/assets"),
            Err(FileTreeError::NotFound(_))
        ));
    }

    #[test]
    fn test_toggle_is_idempotent_pair() {
        let tree = sample_tree();
        let once = tree.toggle("src/assets").unwrap();
        assert!(!once.find("src/assets").unwrap().is_open());
        let twice = once.toggle("src/assets").unwrap();
        assert_eq!(tree, twice);
    }

    #[test]
    fn test_toggle_noop_on_files_and_missing() {
        let tree = sample_tree();
        assert!(tree.toggle("src/index.html").is_none());
        assert!(tree.toggle("ghost").is_none());
    }

    #[test]
    fn test_update_content_marks_dirty() {
        let tree = sample_tree();
        let edited = tree.update_content("src/index.html", "x=1").unwrap();
        let node = edited.find("src/index.html").unwrap();
        assert_eq!(node.content(), Some("x=1"));
        assert!(node.is_dirty());
        assert!(edited.any_dirty());
        assert!(tree.update_content("src", "x").is_none());

        let saved = edited.mark_all_saved();
        assert!(!saved.any_dirty());
        assert_eq!(saved.find("src/index.html").unwrap().content(), Some("x=1"));
    }

    #[test]
    fn test_unrelated_subtrees_are_shared() {
        let tree = sample_tree()
            .create("", "docs", NodeKind::Folder)
            .unwrap()
            .create("docs", "readme.txt", NodeKind::File)
            .unwrap();
        let edited = tree.update_content("src/index.html", "hi").unwrap();

        let docs_before = tree.roots().iter().find(|n| n.path == "docs").unwrap();
        let docs_after = edited.roots().iter().find(|n| n.path == "docs").unwrap();
        assert!(Arc::ptr_eq(docs_before, docs_after));

        let src_before = tree.roots().iter().find(|n| n.path == "src").unwrap();
        let src_after = edited.roots().iter().find(|n| n.path == "src").unwrap();
        assert!(!Arc::ptr_eq(src_before, src_after));
    }

    #[test]
    fn test_flatten_rows_respects_open_state() {
        let tree = sample_tree();
        let rows = tree.flatten_rows();
        let paths: Vec<_> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["src", "src/index.html", "src/assets", "src/assets/style.css"]
        );

        let collapsed = tree.toggle("src/assets").unwrap();
        let rows = collapsed.flatten_rows();
        assert!(!rows.iter().any(|r| r.path == "src/assets/style.css"));
    }

    #[test]
    fn test_plain_files_allowed_in_tree() {
        let tree = sample_tree()
            .create("src", "notes.txt", NodeKind::File)
            .unwrap();
        let node = tree.find("src/notes.txt").unwrap();
        assert_eq!(node.file_kind(), Some(FileKind::Plain));
        assert!(!node.file_kind().unwrap().is_openable());
    }

    #[test]
    fn test_invalid_names_rejected() {
        let tree = sample_tree();
        assert!(matches!(
            tree.create("src", "", NodeKind::File),
            Err(FileTreeError::InvalidName(_))
        ));
        assert!(matches!(
            tree.rename("src/index.html", "a/b.html"),
            Err(FileTreeError::InvalidName(_))
        ));
    }
}
