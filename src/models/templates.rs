//! Default content for freshly created files and the starter project.

use super::file_tree::{FileKind, FileTree, NodeKind};
use crate::kernel::services::ports::persistence::ProjectSnapshot;

pub const DEFAULT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>New Page</title>
</head>
<body>
    <h1>Hello World!</h1>
</body>
</html>"#;

pub const DEFAULT_CSS: &str = r#"/* Styles for the new file */
body {
    font-family: Arial, sans-serif;
    margin: 0;
    padding: 20px;
}

h1 {
    color: #333;
}"#;

pub const DEFAULT_JS: &str = r#"// JavaScript for the new file
document.addEventListener('DOMContentLoaded', function() {
    console.log('New file loaded!');
});"#;

/// Template for a new file, chosen by extension. Unrecognized extensions
/// start empty.
pub fn default_content(name: &str) -> String {
    match FileKind::from_name(name) {
        FileKind::Html => DEFAULT_HTML.to_string(),
        FileKind::Css => DEFAULT_CSS.to_string(),
        FileKind::Js => DEFAULT_JS.to_string(),
        FileKind::Plain => String::new(),
    }
}

/// Builds the starter project: `src/{index.html,style.css,script.js}`.
/// When a saved snapshot exists its contents replace the templates; the
/// resulting tree is fully saved (no dirty flags).
pub fn starter_tree(snapshot: Option<&ProjectSnapshot>) -> FileTree {
    let mut tree = FileTree::new();
    for step in [
        ("", "src", NodeKind::Folder),
        ("src", "index.html", NodeKind::File),
        ("src", "style.css", NodeKind::File),
        ("src", "script.js", NodeKind::File),
    ] {
        match tree.create(step.0, step.1, step.2) {
            Ok(next) => tree = next,
            Err(_) => unreachable!("starter layout has no collisions"),
        }
    }

    if let Some(snapshot) = snapshot {
        for (path, text) in [
            ("src/index.html", snapshot.html.as_str()),
            ("src/style.css", snapshot.css.as_str()),
            ("src/script.js", snapshot.js.as_str()),
        ] {
            if let Some(next) = tree.update_content(path, text) {
                tree = next;
            }
        }
    }

    tree.mark_all_saved()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_content_by_extension() {
        assert!(default_content("page.html").contains("Hello World!"));
        assert!(default_content("a.css").starts_with("/* Styles"));
        assert!(default_content("a.js").contains("DOMContentLoaded"));
        assert!(default_content("notes.txt").is_empty());
    }

    #[test]
    fn test_starter_tree_layout() {
        let tree = starter_tree(None);
        assert!(tree.find("src").unwrap().is_folder());
        for path in ["src/index.html", "src/style.css", "src/script.js"] {
            assert!(tree.find(path).is_some(), "missing {path}");
        }
        assert!(!tree.any_dirty());
    }

    #[test]
    fn test_starter_tree_restores_snapshot() {
        let snapshot = ProjectSnapshot {
            html: "<p>restored</p>".into(),
            css: "p{}".into(),
            js: "restored();".into(),
            last_modified: 0,
        };
        let tree = starter_tree(Some(&snapshot));
        assert_eq!(
            tree.find("src/index.html").unwrap().content(),
            Some("<p>restored</p>")
        );
        assert_eq!(tree.find("src/script.js").unwrap().content(), Some("restored();"));
        assert!(!tree.any_dirty());
    }
}
