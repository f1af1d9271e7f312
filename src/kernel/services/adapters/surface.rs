//! Channel-backed render surface.
//!
//! Holds the latest injected document and hands out generation-tagged
//! handles over a std mpsc channel. Reports posted through a handle kept
//! across an injection still carry the old generation, which is exactly how
//! stale reports get recognized upstream.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::kernel::preview::PreviewBuild;
use crate::kernel::services::ports::surface::{DocumentHandle, RenderSurface, SurfaceEvent};

#[derive(Debug)]
pub struct ChannelSurface {
    tx: Sender<SurfaceEvent>,
    current: Option<PreviewBuild>,
}

impl ChannelSurface {
    pub fn new() -> (Self, Receiver<SurfaceEvent>) {
        let (tx, rx) = channel();
        (Self { tx, current: None }, rx)
    }

    pub fn current(&self) -> Option<&PreviewBuild> {
        self.current.as_ref()
    }
}

impl RenderSurface for ChannelSurface {
    fn inject(&mut self, build: &PreviewBuild) -> DocumentHandle {
        self.current = Some(build.clone());
        DocumentHandle::new(build.generation, self.tx.clone())
    }
}
