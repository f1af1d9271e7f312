use super::*;
use crate::models::{FileTree, NodeKind};

fn big_tree(files: usize) -> FileTree {
    let mut tree = FileTree::new().create("", "src", NodeKind::Folder).unwrap();
    for i in 0..files {
        tree = tree.create("src", &format!("f{i}.js"), NodeKind::File).unwrap();
    }
    tree
}

#[test]
fn test_explorer_selection_and_scroll_follow() {
    let mut explorer = ExplorerState::new(big_tree(20));
    explorer.set_view_height(5);
    assert_eq!(explorer.rows.len(), 21);

    // first move selects the first row
    assert!(explorer.move_selection(1));
    assert_eq!(explorer.selected_row().unwrap().path, "src");

    // walking past the window scrolls it
    for _ in 0..10 {
        explorer.move_selection(1);
    }
    assert_eq!(explorer.selected_row().unwrap().path, "src/f9.js");
    assert!(explorer.scroll_offset > 0);
    let idx = 10;
    assert!(idx >= explorer.scroll_offset && idx < explorer.scroll_offset + 5);
}

#[test]
fn test_explorer_selection_survives_compatible_tree_swap() {
    let mut explorer = ExplorerState::new(big_tree(3));
    explorer.move_selection(2);
    let selected = explorer.selected_path.clone().unwrap();

    let next = explorer.tree().create("src", "extra.js", NodeKind::File).unwrap();
    explorer.set_tree(next);
    assert_eq!(explorer.selected_path.as_deref(), Some(selected.as_str()));

    // selection pointing at a removed node is dropped
    let pruned = explorer.tree().delete(&selected).unwrap();
    explorer.set_tree(pruned);
    assert!(explorer.selected_path.is_none());
}

#[test]
fn test_explorer_scroll_clamps() {
    let mut explorer = ExplorerState::new(big_tree(10));
    explorer.set_view_height(4);
    assert!(explorer.scroll(100));
    assert_eq!(explorer.scroll_offset, 11 - 4);
    assert!(explorer.scroll(-100));
    assert_eq!(explorer.scroll_offset, 0);
    assert!(!explorer.scroll(0));
}

#[test]
fn test_snapshot_takes_first_open_entry_per_kind() {
    let tree = FileTree::new()
        .create("", "src", NodeKind::Folder)
        .unwrap()
        .create("src", "a.html", NodeKind::File)
        .unwrap()
        .create("src", "b.html", NodeKind::File)
        .unwrap()
        .create("src", "app.js", NodeKind::File)
        .unwrap();
    let mut state = AppState::new(tree, Preferences::default());

    for path in ["src/a.html", "src/b.html", "src/app.js"] {
        let node = state.explorer.tree().find(path).unwrap().clone();
        state.open_files.open(&node).unwrap();
    }
    state.open_files.edit("src/a.html", "<p>first wins</p>");
    state.open_files.edit("src/b.html", "<p>second</p>");

    let snapshot = state.snapshot();
    assert_eq!(snapshot.html, "<p>first wins</p>");
    assert!(snapshot.css.is_empty());
    assert!(snapshot.js.contains("DOMContentLoaded"));
    assert!(snapshot.last_modified > 0);
}

#[test]
fn test_any_dirty_covers_both_projections() {
    let tree = FileTree::new()
        .create("", "a.js", NodeKind::File)
        .unwrap();
    let mut state = AppState::new(tree, Preferences::default());
    assert!(!state.any_dirty());

    // dirty only in the tree (no tab open)
    let edited = state.explorer.tree().update_content("a.js", "x").unwrap();
    state.explorer.set_tree(edited);
    assert!(state.any_dirty());
}
