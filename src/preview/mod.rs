//! Rendering pending changes for review.
//!
//! [`InlineOverlay`] writes marker lines into the live buffer and tracks them
//! so they can be retracted without residue. [`SidePanel`] keeps the preview
//! out of the buffer entirely. Both sit behind [`PreviewRenderer`].

pub mod inline;
pub mod panel;

pub use inline::InlineOverlay;
pub use panel::{PanelRow, SidePanel};

use serde::{Deserialize, Serialize};

use crate::buffer::{TextBuffer, TrackedBuffer};
use crate::diff::{ChangeId, ChangeRecord};
use crate::error::OverlayWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayRole {
    DeleteMarker,
    AddMarker,
    ModifyOld,
    ModifyNew,
}

impl OverlayRole {
    /// Whether the role is backed by a line inserted into the buffer.
    /// `ModifyOld` only marks an original line.
    pub fn is_inserted(self) -> bool {
        self != OverlayRole::ModifyOld
    }
}

/// Preview bookkeeping for one buffer line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverlayEntry {
    pub buffer_line: usize,
    pub change_id: ChangeId,
    pub role: OverlayRole,
}

impl OverlayEntry {
    pub fn inserted(&self) -> bool {
        self.role.is_inserted()
    }
}

pub trait PreviewRenderer {
    /// Render every pending record in `records`. Records already shown are skipped.
    fn show_all<B: TextBuffer>(
        &mut self,
        target: &mut TrackedBuffer<B>,
        records: &[&ChangeRecord],
    ) -> Vec<OverlayWarning>;

    /// Remove everything rendered for `id`. Returns the number of buffer lines removed.
    fn retract<B: TextBuffer>(&mut self, target: &mut TrackedBuffer<B>, id: ChangeId) -> usize;

    fn retract_all<B: TextBuffer>(&mut self, target: &mut TrackedBuffer<B>) -> usize;

    /// Current in-buffer entries ordered by line.
    fn entries<B: TextBuffer>(&self, target: &TrackedBuffer<B>) -> Vec<OverlayEntry>;
}

/// Renderer selected by configuration
#[derive(Debug, Clone)]
pub enum Renderer {
    Inline(InlineOverlay),
    Panel(SidePanel),
}

impl Renderer {
    pub fn panel(&self) -> Option<&SidePanel> {
        match self {
            Renderer::Panel(panel) => Some(panel),
            Renderer::Inline(_) => None,
        }
    }
}

impl PreviewRenderer for Renderer {
    fn show_all<B: TextBuffer>(
        &mut self,
        target: &mut TrackedBuffer<B>,
        records: &[&ChangeRecord],
    ) -> Vec<OverlayWarning> {
        match self {
            Renderer::Inline(overlay) => overlay.show_all(target, records),
            Renderer::Panel(panel) => panel.show_all(target, records),
        }
    }

    fn retract<B: TextBuffer>(&mut self, target: &mut TrackedBuffer<B>, id: ChangeId) -> usize {
        match self {
            Renderer::Inline(overlay) => overlay.retract(target, id),
            Renderer::Panel(panel) => panel.retract(target, id),
        }
    }

    fn retract_all<B: TextBuffer>(&mut self, target: &mut TrackedBuffer<B>) -> usize {
        match self {
            Renderer::Inline(overlay) => overlay.retract_all(target),
            Renderer::Panel(panel) => panel.retract_all(target),
        }
    }

    fn entries<B: TextBuffer>(&self, target: &TrackedBuffer<B>) -> Vec<OverlayEntry> {
        match self {
            Renderer::Inline(overlay) => overlay.entries(target),
            Renderer::Panel(panel) => panel.entries(target),
        }
    }
}
