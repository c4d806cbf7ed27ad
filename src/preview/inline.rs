use tracing::{debug, warn};

use super::{OverlayEntry, OverlayRole, PreviewRenderer};
use crate::buffer::{Slot, TextBuffer, TrackedBuffer};
use crate::diff::{ChangeId, ChangeRecord, Payload};
use crate::error::OverlayWarning;

pub const DEFAULT_DELETE_MARKER: &str = "// [DELETED] ";

/// In-buffer preview: every pending change gets a marker line next to the
/// original line it touches.
#[derive(Debug, Clone)]
pub struct InlineOverlay {
    delete_marker: String,
    /// Original lines flagged as about to be replaced, by (change, anchor).
    marked: Vec<(ChangeId, usize)>,
}

impl InlineOverlay {
    pub fn new(delete_marker: impl Into<String>) -> Self {
        Self {
            delete_marker: delete_marker.into(),
            marked: Vec::new(),
        }
    }

    pub fn delete_marker(&self) -> &str {
        &self.delete_marker
    }

    fn is_shown<B: TextBuffer>(&self, target: &TrackedBuffer<B>, id: ChangeId) -> bool {
        target
            .slots()
            .iter()
            .any(|slot| slot.is_preview() && slot.change_id() == Some(id))
    }

    /// Line of the original `anchor`, or the closest line before where it
    /// would be when it is gone.
    fn locate_base<B: TextBuffer>(
        &self,
        target: &TrackedBuffer<B>,
        record: &ChangeRecord,
    ) -> (usize, Option<OverlayWarning>) {
        let anchor = record.anchor_line;
        match target.position_of_base(anchor) {
            Some(line) => (line, None),
            None => {
                let clamped_to = target.insertion_point(anchor).saturating_sub(1);
                let warning = OverlayWarning::AnchorClamped {
                    id: record.id,
                    anchor,
                    line_count: target.line_count(),
                    clamped_to,
                };
                (clamped_to, Some(warning))
            }
        }
    }

    fn show_one<B: TextBuffer>(
        &mut self,
        target: &mut TrackedBuffer<B>,
        record: &ChangeRecord,
    ) -> Option<OverlayWarning> {
        let id = record.id;
        let anchor = record.anchor_line;

        match &record.payload {
            Payload::Delete { content } => {
                let (line, warning) = self.locate_base(target, record);
                let slot = Slot::Preview {
                    id,
                    role: OverlayRole::DeleteMarker,
                    anchor,
                };
                target.insert(line + 1, slot, format!("{}{}", self.delete_marker, content));
                warning
            }
            Payload::Add { content } => {
                let line_count = target.line_count();
                let at = target.insertion_point(anchor);
                let warning = (anchor > line_count + 1).then_some(OverlayWarning::AnchorClamped {
                    id,
                    anchor,
                    line_count,
                    clamped_to: at,
                });
                let slot = Slot::Preview {
                    id,
                    role: OverlayRole::AddMarker,
                    anchor,
                };
                target.insert(at, slot, content.clone());
                warning
            }
            Payload::Modify { new_content, .. } => {
                let (line, warning) = self.locate_base(target, record);
                let slot = Slot::Preview {
                    id,
                    role: OverlayRole::ModifyNew,
                    anchor,
                };
                target.insert(line + 1, slot, new_content.clone());
                self.marked.push((id, anchor));
                warning
            }
        }
    }
}

impl Default for InlineOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_DELETE_MARKER)
    }
}

impl PreviewRenderer for InlineOverlay {
    fn show_all<B: TextBuffer>(
        &mut self,
        target: &mut TrackedBuffer<B>,
        records: &[&ChangeRecord],
    ) -> Vec<OverlayWarning> {
        // Highest anchor first: inserting below a line never moves the lines
        // above it, so anchors still to be processed stay valid.
        let mut ordered: Vec<&ChangeRecord> = records
            .iter()
            .copied()
            .filter(|record| record.is_pending())
            .collect();
        ordered.sort_by(|a, b| b.anchor_line.cmp(&a.anchor_line));

        let mut warnings = Vec::new();
        for record in ordered {
            if self.is_shown(target, record.id) {
                continue;
            }
            if let Some(warning) = self.show_one(target, record) {
                warn!("{}", warning);
                warnings.push(warning);
            }
        }

        debug!(
            "Overlay shows {} preview lines for {} records",
            target.preview_lines(None).len(),
            records.len()
        );
        warnings
    }

    fn retract<B: TextBuffer>(&mut self, target: &mut TrackedBuffer<B>, id: ChangeId) -> usize {
        let lines = target.preview_lines(Some(id));
        for line in &lines {
            target.remove(*line);
        }
        self.marked.retain(|(owner, _)| *owner != id);
        lines.len()
    }

    fn retract_all<B: TextBuffer>(&mut self, target: &mut TrackedBuffer<B>) -> usize {
        let lines = target.preview_lines(None);
        for line in &lines {
            target.remove(*line);
        }
        self.marked.clear();
        lines.len()
    }

    fn entries<B: TextBuffer>(&self, target: &TrackedBuffer<B>) -> Vec<OverlayEntry> {
        let mut entries: Vec<OverlayEntry> = target
            .slots()
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| match *slot {
                Slot::Preview { id, role, .. } => Some(OverlayEntry {
                    buffer_line: idx + 1,
                    change_id: id,
                    role,
                }),
                _ => None,
            })
            .collect();

        entries.extend(self.marked.iter().filter_map(|&(id, anchor)| {
            target.position_of_base(anchor).map(|line| OverlayEntry {
                buffer_line: line,
                change_id: id,
                role: OverlayRole::ModifyOld,
            })
        }));

        entries.sort_by_key(|entry| entry.buffer_line);
        entries
    }
}
