//! Contract with the rendering surface. Injection replaces the whole
//! document and yields a handle tagged with the build generation; the handle
//! is the only way the surface can post reports back, so every report
//! carries the generation of the document that produced it.

use std::sync::mpsc::Sender;

use serde_json::Value;

use crate::kernel::preview::{PreviewBuild, PreviewError};

#[derive(Debug, Clone)]
pub struct SurfaceEvent {
    pub generation: u64,
    pub payload: Value,
}

#[derive(Debug, Clone)]
pub struct DocumentHandle {
    generation: u64,
    tx: Sender<SurfaceEvent>,
}

impl DocumentHandle {
    pub fn new(generation: u64, tx: Sender<SurfaceEvent>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Posts a message from the surface back to the kernel. Send failures
    /// mean the session is shutting down and are ignored.
    pub fn post(&self, payload: Value) {
        let _ = self.tx.send(SurfaceEvent {
            generation: self.generation,
            payload,
        });
    }
}

pub trait RenderSurface {
    /// Replaces the displayed document. The previous handle keeps its old
    /// generation, so late reports through it are recognizably stale.
    fn inject(&mut self, build: &PreviewBuild) -> DocumentHandle;
}

/// Extracts an error report from a surface message. Only messages of the
/// exact shape `{type: "error", message, line?, column?}` count; anything
/// else is ignored.
pub fn parse_error_report(payload: &Value) -> Option<PreviewError> {
    if payload.get("type")?.as_str()? != "error" {
        return None;
    }
    let message = payload.get("message")?.as_str()?.to_string();
    let line = payload.get("line").and_then(Value::as_u64).map(|v| v as u32);
    let column = payload
        .get("column")
        .and_then(Value::as_u64)
        .map(|v| v as u32);
    Some(PreviewError {
        message,
        line,
        column,
    })
}
