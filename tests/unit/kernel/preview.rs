use super::*;
use std::time::{Duration, Instant};

fn sources(js: &str) -> PreviewSources {
    PreviewSources {
        html: "<h1>Hi</h1>".to_string(),
        css: "h1 { color: blue; }".to_string(),
        js: js.to_string(),
    }
}

fn error(message: &str) -> PreviewError {
    PreviewError {
        message: message.to_string(),
        line: None,
        column: None,
    }
}

#[test]
fn test_compose_document_shape() {
    let doc = compose_document("<h1>Hi</h1>", "h1 { color: blue; }", "boom()");
    let style = doc.find("<style>h1 { color: blue; }</style>").unwrap();
    let body = doc.find("<h1>Hi</h1>").unwrap();
    let listener = doc.find("window.addEventListener('error'").unwrap();
    let user_js = doc.find("boom()").unwrap();
    assert!(style < body && body < listener && listener < user_js);
    assert!(doc.contains("try {"));
    assert!(doc.contains("} catch (e) {"));
    assert!(doc.contains("postMessage"));
}

#[test]
fn test_rebuild_bumps_generation_and_clears_errors() {
    let mut preview = PreviewState::default();
    let now = Instant::now();
    preview.mark_dirty(sources("a()"), now);
    let first = preview.rebuild();
    assert_eq!(first.generation, 1);

    assert!(preview.apply_report(1, error("a is not defined")));
    assert!(preview.has_errors());

    let second = preview.rebuild();
    assert_eq!(second.generation, 2);
    assert!(!preview.has_errors());
}

#[test]
fn test_stale_generation_reports_dropped() {
    let mut preview = PreviewState::default();
    preview.rebuild();
    preview.rebuild();
    assert_eq!(preview.generation(), 2);

    assert!(!preview.apply_report(1, error("late report")));
    assert!(!preview.has_errors());
    assert!(preview.apply_report(2, error("current report")));
    assert!(preview.has_errors());
}

#[test]
fn test_error_list_is_bounded() {
    let mut preview = PreviewState::default();
    preview.rebuild();
    for i in 0..MAX_ERRORS + 3 {
        assert!(preview.apply_report(1, error(&format!("err{i}"))));
    }
    let messages: Vec<_> = preview.errors().map(|e| e.message.clone()).collect();
    assert_eq!(messages.len(), MAX_ERRORS);
    assert_eq!(messages.first().unwrap(), "err3");
    assert_eq!(messages.last().unwrap(), "err7");
}

#[test]
fn test_debounce_coalesces_rebuilds() {
    let mut preview = PreviewState::default();
    let start = Instant::now();

    preview.mark_dirty(sources("one()"), start);
    assert!(preview
        .take_due_rebuild(start + Duration::from_millis(100))
        .is_none());

    // a second edit inside the window re-arms it
    preview.mark_dirty(sources("two()"), start + Duration::from_millis(200));
    assert!(preview
        .take_due_rebuild(start + Duration::from_millis(400))
        .is_none());

    let build = preview
        .take_due_rebuild(start + Duration::from_millis(600))
        .unwrap();
    assert_eq!(build.generation, 1);
    assert!(build.document.contains("two()"));
    assert!(!build.document.contains("one()"));

    // consumed: nothing more due
    assert!(preview
        .take_due_rebuild(start + Duration::from_secs(5))
        .is_none());
}

#[test]
fn test_manual_rebuild_cancels_pending_debounce() {
    let mut preview = PreviewState::default();
    let start = Instant::now();
    preview.mark_dirty(sources("x()"), start);
    assert!(preview.rebuild_pending());

    let build = preview.rebuild();
    assert_eq!(build.generation, 1);
    assert!(!preview.rebuild_pending());
    assert!(preview
        .take_due_rebuild(start + Duration::from_secs(1))
        .is_none());
}

#[test]
fn test_error_display_formats() {
    let positioned = PreviewError {
        message: "Cannot read properties of null".to_string(),
        line: Some(12),
        column: Some(4),
    };
    assert_eq!(
        positioned.to_string(),
        "Error at line 12, column 4: Cannot read properties of null"
    );
    assert_eq!(error("boom").to_string(), "Error: boom");
}
