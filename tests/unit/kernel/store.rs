use super::*;
use std::time::Duration;

use serde_json::json;

use crate::kernel::preview::REBUILD_DEBOUNCE;
use crate::kernel::services::ports::surface::SurfaceEvent;
use crate::kernel::state::AppState;
use crate::kernel::services::ports::persistence::Preferences;
use crate::models::templates;

fn store() -> Store {
    let tree = templates::starter_tree(None);
    Store::new(
        AppState::new(tree, Preferences::default()),
        Instant::now(),
    )
}

fn open(store: &mut Store, path: &str) {
    store.dispatch(Action::OpenPath(path.to_string()));
}

fn report(store: &mut Store, generation: u64, payload: serde_json::Value) -> DispatchResult {
    store.dispatch(Action::SurfaceReport(SurfaceEvent {
        generation,
        payload,
    }))
}

#[test]
fn test_create_open_edit_delete_flow() {
    let mut store = store();
    open(&mut store, "src/index.html");

    // create: appears in tree, becomes a tab, is active
    let result = store.dispatch(Action::CreateNode {
        parent_path: "src".to_string(),
        name: "app.js".to_string(),
        kind: NodeKind::File,
    });
    assert!(result.state_changed);
    assert!(store.state().explorer.tree().find("src/app.js").is_some());
    assert_eq!(store.state().open_files.active_path(), Some("src/app.js"));

    // edit: both projections dirty, same content
    store.dispatch(Action::EditorChanged {
        path: "src/app.js".to_string(),
        text: "let x = 1;".to_string(),
    });
    let entry = store.state().open_files.get("src/app.js").unwrap();
    assert!(entry.is_dirty);
    assert_eq!(entry.content, "let x = 1;");
    let node = store.state().explorer.tree().find("src/app.js").unwrap();
    assert!(node.is_dirty());
    assert_eq!(node.content(), Some("let x = 1;"));

    // delete: gone from tree and registry, no orphan tab
    store.dispatch(Action::DeletePath("src/app.js".to_string()));
    assert!(store.state().explorer.tree().find("src/app.js").is_none());
    assert!(store.state().open_files.get("src/app.js").is_none());
    assert_eq!(
        store.state().open_files.active_path(),
        Some("src/index.html")
    );
}

#[test]
fn test_registry_paths_always_subset_of_tree() {
    let mut store = store();
    open(&mut store, "src/index.html");
    open(&mut store, "src/script.js");

    store.dispatch(Action::RenamePath {
        path: "src".to_string(),
        new_name: "app".to_string(),
    });
    store.dispatch(Action::DeletePath("app/script.js".to_string()));

    for entry in store.state().open_files.entries() {
        assert!(
            store.state().explorer.tree().find(&entry.path).is_some(),
            "orphan tab {}",
            entry.path
        );
    }
    assert_eq!(
        store.state().open_files.active_path(),
        Some("app/index.html")
    );
}

#[test]
fn test_rename_to_unsupported_extension_evicts_tab() {
    let mut store = store();
    open(&mut store, "src/script.js");
    assert!(store.state().open_files.get("src/script.js").is_some());

    store.dispatch(Action::RenamePath {
        path: "src/script.js".to_string(),
        new_name: "script.bak".to_string(),
    });
    assert!(store.state().explorer.tree().find("src/script.bak").is_some());
    assert!(store.state().open_files.get("src/script.bak").is_none());
}

#[test]
fn test_duplicate_name_rejected_with_notification() {
    let mut store = store();
    let result = store.dispatch(Action::CreateNode {
        parent_path: "src".to_string(),
        name: "index.html".to_string(),
        kind: NodeKind::File,
    });
    assert!(result.state_changed);
    assert!(store.state().ui.notification.is_some());
    // still exactly one index.html
    let rows = store.state().explorer.tree().flatten_rows();
    assert_eq!(
        rows.iter().filter(|r| r.name == "index.html").count(),
        1
    );
}

#[test]
fn test_dirty_close_requires_confirmation() {
    let mut store = store();
    open(&mut store, "src/script.js");
    store.dispatch(Action::EditorChanged {
        path: "src/script.js".to_string(),
        text: "dirty".to_string(),
    });

    store.dispatch(Action::CloseFile("src/script.js".to_string()));
    assert!(store.state().ui.confirm_dialog.visible);
    assert!(store.state().open_files.get("src/script.js").is_some());

    // decline keeps the tab
    store.dispatch(Action::ConfirmClose { accept: false });
    assert!(!store.state().ui.confirm_dialog.visible);
    assert!(store.state().open_files.get("src/script.js").is_some());

    // accept closes it
    store.dispatch(Action::CloseFile("src/script.js".to_string()));
    store.dispatch(Action::ConfirmClose { accept: true });
    assert!(store.state().open_files.get("src/script.js").is_none());
}

#[test]
fn test_edit_on_closed_file_leaves_tree_untouched() {
    let mut store = store();
    open(&mut store, "src/script.js");
    store.dispatch(Action::CloseFile("src/script.js".to_string()));
    assert!(store.state().open_files.get("src/script.js").is_none());

    let before = store
        .state()
        .explorer
        .tree()
        .find("src/script.js")
        .unwrap()
        .content()
        .unwrap()
        .to_string();

    // a stale editor model keeps dispatching for the closed path
    let result = store.dispatch(Action::EditorChanged {
        path: "src/script.js".to_string(),
        text: "ghost()".to_string(),
    });
    assert!(!result.state_changed);

    let node = store.state().explorer.tree().find("src/script.js").unwrap();
    assert!(!node.is_dirty());
    assert_eq!(node.content(), Some(before.as_str()));
    assert!(!store.state().any_dirty());
}

#[test]
fn test_js_error_report_lands_once_and_clears_on_rebuild() {
    let mut store = store();
    open(&mut store, "src/script.js");
    store.dispatch(Action::EditorChanged {
        path: "src/script.js".to_string(),
        text: "null.property".to_string(),
    });

    let result = store.dispatch(Action::RunCommand(Command::RefreshPreview));
    let generation = match result.effects.as_slice() {
        [Effect::InjectPreview(build)] => {
            assert!(build.document.contains("null.property"));
            build.generation
        }
        other => panic!("expected inject effect, got {other:?}"),
    };

    report(
        &mut store,
        generation,
        json!({
            "type": "error",
            "message": "Cannot read properties of null (reading 'property')",
            "line": 14,
            "column": 1
        }),
    );
    assert_eq!(store.state().preview.errors().count(), 1);
    assert!(store.state().preview.has_errors());

    // stale report after the next build is dropped
    store.dispatch(Action::RunCommand(Command::RefreshPreview));
    let dropped = report(
        &mut store,
        generation,
        json!({"type": "error", "message": "late"}),
    );
    assert!(!dropped.state_changed);
    assert!(!store.state().preview.has_errors());
}

#[test]
fn test_malformed_surface_payloads_ignored() {
    let mut store = store();
    store.dispatch(Action::RunCommand(Command::RefreshPreview));
    let generation = store.state().preview.generation();

    for payload in [
        json!({"type": "log", "message": "not an error"}),
        json!({"type": "error"}),
        json!(42),
    ] {
        let result = report(&mut store, generation, payload);
        assert!(!result.state_changed);
    }
    assert!(!store.state().preview.has_errors());
}

#[test]
fn test_edit_debounces_rebuild_and_refresh_is_immediate() {
    let mut store = store();
    open(&mut store, "src/script.js");
    store.dispatch(Action::EditorChanged {
        path: "src/script.js".to_string(),
        text: "tick()".to_string(),
    });

    // inside the window: nothing due
    assert!(store.tick(Instant::now()).is_empty());

    // after the window: one inject
    let later = Instant::now() + REBUILD_DEBOUNCE + Duration::from_millis(10);
    let effects = store.tick(later);
    assert!(matches!(effects.as_slice(), [Effect::InjectPreview(_)]));
    assert!(store.tick(later + Duration::from_millis(1)).is_empty());

    // manual refresh bypasses the window entirely
    store.dispatch(Action::EditorChanged {
        path: "src/script.js".to_string(),
        text: "tock()".to_string(),
    });
    let result = store.dispatch(Action::RunCommand(Command::RefreshPreview));
    assert!(matches!(result.effects.as_slice(), [Effect::InjectPreview(_)]));
}

#[test]
fn test_save_clears_dirty_and_emits_snapshot() {
    let mut store = store();
    open(&mut store, "src/index.html");
    store.dispatch(Action::EditorChanged {
        path: "src/index.html".to_string(),
        text: "<p>saved</p>".to_string(),
    });

    let result = store.dispatch(Action::RunCommand(Command::Save));
    match result.effects.as_slice() {
        [Effect::SaveSnapshot(snapshot)] => assert_eq!(snapshot.html, "<p>saved</p>"),
        other => panic!("expected save effect, got {other:?}"),
    }
    assert!(!store.state().open_files.any_dirty());
    assert!(!store.state().explorer.tree().any_dirty());
    assert!(store.state().last_saved.is_some());
}

#[test]
fn test_autosave_fires_only_when_dirty() {
    let start = Instant::now();
    let tree = templates::starter_tree(None);
    let mut store = Store::new(
        AppState::new(tree, Preferences::default()),
        start,
    );
    open(&mut store, "src/script.js");

    // clean: interval passes without a save
    let effects = store.tick(start + Duration::from_secs(31));
    assert!(effects.is_empty());

    store.dispatch(Action::EditorChanged {
        path: "src/script.js".to_string(),
        text: "autosaved()".to_string(),
    });
    let effects = store.tick(start + Duration::from_secs(62));
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::SaveSnapshot(_))));
    assert!(!store.state().open_files.any_dirty());
}

#[test]
fn test_new_file_command_creates_default_script() {
    let mut store = store();
    store.dispatch(Action::RunCommand(Command::NewFile));
    let node = store
        .state()
        .explorer
        .tree()
        .find("src/new-file.js")
        .unwrap();
    assert!(node.content().unwrap().contains("New file loaded!"));
    assert_eq!(
        store.state().open_files.active_path(),
        Some("src/new-file.js")
    );
}

#[test]
fn test_tab_cycling_wraps() {
    let mut store = store();
    for path in ["src/index.html", "src/style.css", "src/script.js"] {
        open(&mut store, path);
    }
    assert_eq!(store.state().open_files.active_path(), Some("src/script.js"));

    store.dispatch(Action::RunCommand(Command::NextTab));
    assert_eq!(
        store.state().open_files.active_path(),
        Some("src/index.html")
    );
    store.dispatch(Action::RunCommand(Command::PrevTab));
    assert_eq!(store.state().open_files.active_path(), Some("src/script.js"));
}

#[test]
fn test_terminal_commands_via_store() {
    let mut store = store();
    store.dispatch(Action::TerminalInput("ls".to_string()));
    let lines = store.state().terminal.lines();
    assert!(lines.iter().any(|l| l == "> ls"));
    assert!(lines.iter().any(|l| l == "src/index.html"));

    store.dispatch(Action::TerminalInput("rm -rf /".to_string()));
    assert!(store
        .state()
        .terminal
        .lines()
        .iter()
        .any(|l| l == "Command not found: rm -rf /"));
}

#[test]
fn test_explorer_activate_routes_by_row_kind() {
    let mut store = store();
    store.dispatch(Action::ExplorerMoveSelection { delta: 1 });
    assert_eq!(
        store.state().explorer.selected_row().unwrap().path,
        "src"
    );

    // folder: toggles closed, hiding children
    store.dispatch(Action::ExplorerActivate);
    assert_eq!(store.state().explorer.rows.len(), 1);
    store.dispatch(Action::ExplorerActivate);
    assert_eq!(store.state().explorer.rows.len(), 4);

    // file: opens a tab
    store.dispatch(Action::ExplorerMoveSelection { delta: 1 });
    store.dispatch(Action::ExplorerActivate);
    assert_eq!(
        store.state().open_files.active_path(),
        Some("src/index.html")
    );
}

#[test]
fn test_quit_and_toggles() {
    let mut store = store();
    assert!(store.state().ui.sidebar_visible);
    store.dispatch(Action::RunCommand(Command::ToggleSidebar));
    assert!(!store.state().ui.sidebar_visible);

    assert!(!store.state().ui.terminal_visible);
    store.dispatch(Action::RunCommand(Command::ToggleTerminal));
    assert!(store.state().ui.terminal_visible);

    store.dispatch(Action::RunCommand(Command::Quit));
    assert!(store.state().ui.should_quit);
}
