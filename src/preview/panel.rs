use serde::Serialize;

use super::{OverlayEntry, PreviewRenderer};
use crate::buffer::{TextBuffer, TrackedBuffer};
use crate::diff::{ChangeId, ChangeRecord, Payload};
use crate::error::OverlayWarning;

/// One row of the side panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelRow {
    pub change_id: ChangeId,
    pub line: usize,
    pub gutter: String,
    pub content: String,
}

/// Out-of-buffer preview. Pending changes are listed as `-`/`+` rows; the
/// buffer is never touched, so retracting is only bookkeeping.
#[derive(Debug, Clone)]
pub struct SidePanel {
    add_gutter: String,
    remove_gutter: String,
    rows: Vec<PanelRow>,
}

impl SidePanel {
    pub fn new(add_gutter: impl Into<String>, remove_gutter: impl Into<String>) -> Self {
        Self {
            add_gutter: add_gutter.into(),
            remove_gutter: remove_gutter.into(),
            rows: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    pub fn render(&self) -> String {
        let width = self
            .rows
            .iter()
            .map(|row| row.line.to_string().len())
            .max()
            .unwrap_or(1);

        self.rows
            .iter()
            .map(|row| format!("{:>width$} {} {}", row.line, row.gutter, row.content, width = width))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn row(&self, record: &ChangeRecord, added: bool, content: &str) -> PanelRow {
        let gutter = if added { &self.add_gutter } else { &self.remove_gutter };
        PanelRow {
            change_id: record.id,
            line: record.anchor_line,
            gutter: gutter.clone(),
            content: content.to_string(),
        }
    }
}

impl Default for SidePanel {
    fn default() -> Self {
        Self::new("+", "-")
    }
}

impl PreviewRenderer for SidePanel {
    fn show_all<B: TextBuffer>(
        &mut self,
        _target: &mut TrackedBuffer<B>,
        records: &[&ChangeRecord],
    ) -> Vec<OverlayWarning> {
        for record in records.iter().filter(|record| record.is_pending()) {
            if self.rows.iter().any(|row| row.change_id == record.id) {
                continue;
            }
            let rows = match &record.payload {
                Payload::Add { content } => vec![self.row(record, true, content)],
                Payload::Delete { content } => vec![self.row(record, false, content)],
                Payload::Modify {
                    old_content,
                    new_content,
                } => vec![
                    self.row(record, false, old_content),
                    self.row(record, true, new_content),
                ],
            };
            self.rows.extend(rows);
        }

        self.rows.sort_by_key(|row| (row.line, row.change_id));
        Vec::new()
    }

    fn retract<B: TextBuffer>(&mut self, _target: &mut TrackedBuffer<B>, id: ChangeId) -> usize {
        self.rows.retain(|row| row.change_id != id);
        0
    }

    fn retract_all<B: TextBuffer>(&mut self, _target: &mut TrackedBuffer<B>) -> usize {
        self.rows.clear();
        0
    }

    fn entries<B: TextBuffer>(&self, _target: &TrackedBuffer<B>) -> Vec<OverlayEntry> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::LineBuffer;
    use crate::diff::diff_texts;

    #[test]
    fn test_panel_leaves_buffer_alone() {
        let records = diff_texts("a\nb\nc", "a\nx");
        let mut target = TrackedBuffer::new(LineBuffer::from_text("a\nb\nc"));
        let mut panel = SidePanel::default();
        let refs: Vec<&ChangeRecord> = records.iter().collect();

        panel.show_all(&mut target, &refs);

        assert_eq!(target.text(), "a\nb\nc");
        assert!(panel.entries(&target).is_empty());
        insta::assert_snapshot!(panel.render(), @r"
        2 - b
        2 + x
        3 - c
        ");
    }

    #[test]
    fn test_panel_retract() {
        let records = diff_texts("a\nb", "x\ny");
        let mut target = TrackedBuffer::new(LineBuffer::from_text("a\nb"));
        let mut panel = SidePanel::default();
        let refs: Vec<&ChangeRecord> = records.iter().collect();

        panel.show_all(&mut target, &refs);
        assert_eq!(panel.rows().len(), 4);

        panel.retract(&mut target, records[0].id);
        assert!(panel.rows().iter().all(|row| row.change_id == records[1].id));

        panel.retract_all(&mut target);
        assert!(panel.rows().is_empty());
    }
}
