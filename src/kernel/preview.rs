//! Live-preview composition and error collection.
//!
//! Every rebuild composes the three sources into one self-contained document
//! and bumps the build generation. Runtime errors come back from the render
//! surface tagged with the generation of the document that raised them;
//! reports from superseded documents are dropped so the error list always
//! describes the document currently on screen.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Only the most recent errors are kept.
pub const MAX_ERRORS: usize = 5;

/// Edits coalesce for this long before a rebuild fires on tick. Manual
/// refresh bypasses the window.
pub const REBUILD_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewSources {
    pub html: String,
    pub css: String,
    pub js: String,
}

#[derive(Debug, Clone)]
pub struct PreviewBuild {
    pub generation: u64,
    pub document: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewError {
    pub message: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                write!(
                    f,
                    "Error at line {line}, column {column}: {}",
                    self.message
                )
            }
            _ => write!(f, "Error: {}", self.message),
        }
    }
}

#[derive(Debug)]
pub struct PreviewState {
    sources: PreviewSources,
    generation: u64,
    errors: VecDeque<PreviewError>,
    pending_since: Option<Instant>,
}

impl Default for PreviewState {
    fn default() -> Self {
        Self {
            sources: PreviewSources::default(),
            generation: 0,
            errors: VecDeque::new(),
            pending_since: None,
        }
    }
}

impl PreviewState {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn sources(&self) -> &PreviewSources {
        &self.sources
    }

    pub fn errors(&self) -> impl Iterator<Item = &PreviewError> {
        self.errors.iter()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn rebuild_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Records changed sources and arms (or re-arms) the debounce window.
    pub fn mark_dirty(&mut self, sources: PreviewSources, now: Instant) {
        self.sources = sources;
        self.pending_since = Some(now);
    }

    /// Returns a build once the debounce window has elapsed.
    pub fn take_due_rebuild(&mut self, now: Instant) -> Option<PreviewBuild> {
        let since = self.pending_since?;
        if now.duration_since(since) < REBUILD_DEBOUNCE {
            return None;
        }
        self.pending_since = None;
        Some(self.rebuild())
    }

    /// Immediate rebuild: bumps the generation, clears the error list and
    /// cancels any pending debounce.
    pub fn rebuild(&mut self) -> PreviewBuild {
        self.generation += 1;
        self.errors.clear();
        self.pending_since = None;
        PreviewBuild {
            generation: self.generation,
            document: compose_document(&self.sources.html, &self.sources.css, &self.sources.js),
        }
    }

    /// Accepts an error report from the surface. Reports carrying a stale
    /// generation are dropped; the list is capped at [`MAX_ERRORS`], oldest
    /// first out.
    pub fn apply_report(&mut self, generation: u64, error: PreviewError) -> bool {
        if generation != self.generation {
            return false;
        }
        if self.errors.len() == MAX_ERRORS {
            self.errors.pop_front();
        }
        self.errors.push_back(error);
        true
    }
}

/// Composes the full preview document: styles in the head, markup in the
/// body, then the user script wrapped so both synchronous throws and
/// window-level errors surface as structured messages.
pub fn compose_document(html: &str, css: &str, js: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<style>{css}</style>
</head>
<body>
{html}
<script>
window.addEventListener('error', function(e) {{
  window.parent.postMessage({{
    type: 'error',
    message: e.message,
    line: e.lineno,
    column: e.colno
  }}, '*');
}});
try {{
{js}
}} catch (e) {{
  window.parent.postMessage({{
    type: 'error',
    message: e.message
  }}, '*');
}}
</script>
</body>
</html>"#
    )
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/preview.rs"]
mod tests;
