//! Committing accepted changes into the live buffer.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::buffer::{Slot, TextBuffer, TrackedBuffer};
use crate::diff::{join_lines, split_lines, ChangeKind, ChangeRecord, Payload};
use crate::error::OverlayWarning;
use crate::preview::OverlayRole;

/// Makes an accepted change permanent, replacing its preview lines with the
/// real edit. Works whether or not the change is currently previewed in-buffer.
pub struct BufferPatcher;

impl BufferPatcher {
    pub fn commit<B: TextBuffer>(
        target: &mut TrackedBuffer<B>,
        record: &ChangeRecord,
    ) -> Option<OverlayWarning> {
        let id = record.id;
        let anchor = record.anchor_line;
        debug!("Committing {} ({} at line {})", id, record.kind(), anchor);

        match &record.payload {
            Payload::Add { content } => {
                let committed = Slot::Committed { id, anchor };
                match target.position_of_preview(id, OverlayRole::AddMarker) {
                    Some(line) => {
                        target.reclassify(line, committed);
                    }
                    None => {
                        let at = target.insertion_point(anchor);
                        target.insert(at, committed, content.clone());
                    }
                }
                None
            }
            Payload::Delete { .. } => {
                if let Some(line) = target.position_of_preview(id, OverlayRole::DeleteMarker) {
                    target.remove(line);
                }
                match target.position_of_base(anchor) {
                    Some(line) => {
                        target.remove(line);
                        None
                    }
                    None => Some(missing(record)),
                }
            }
            Payload::Modify { new_content, .. } => {
                if let Some(line) = target.position_of_preview(id, OverlayRole::ModifyNew) {
                    target.remove(line);
                }
                match target.position_of_base(anchor) {
                    Some(line) => {
                        target.replace(line, new_content.clone());
                        None
                    }
                    None => Some(missing(record)),
                }
            }
        }
    }

    /// Undo a previous [`commit`](Self::commit). Preview lines must already be retracted.
    pub fn revert<B: TextBuffer>(
        target: &mut TrackedBuffer<B>,
        record: &ChangeRecord,
    ) -> Option<OverlayWarning> {
        let id = record.id;
        let anchor = record.anchor_line;
        debug!("Reverting {} ({} at line {})", id, record.kind(), anchor);

        match &record.payload {
            Payload::Add { .. } => match target.position_of_committed(id) {
                Some(line) => {
                    target.remove(line);
                    None
                }
                None => Some(missing(record)),
            },
            Payload::Delete { content } => {
                let at = target.insertion_point(anchor);
                target.insert(at, Slot::Base(anchor), content.clone());
                None
            }
            Payload::Modify { old_content, .. } => match target.position_of_base(anchor) {
                Some(line) => {
                    target.replace(line, old_content.clone());
                    None
                }
                None => Some(missing(record)),
            },
        }
    }
}

fn missing(record: &ChangeRecord) -> OverlayWarning {
    let warning = OverlayWarning::MissingLine {
        id: record.id,
        anchor: record.anchor_line,
    };
    warn!("{}", warning);
    warning
}

/// Apply the records selected by `accept` to `original` from scratch.
///
/// Modify replaces its line, Delete drops it, Add inserts before the original
/// line with the same anchor (after the end when there is none).
pub fn apply_records<S, F>(original: &[S], records: &[ChangeRecord], accept: F) -> Vec<String>
where
    S: AsRef<str>,
    F: Fn(&ChangeRecord) -> bool,
{
    let mut in_place: HashMap<usize, &ChangeRecord> = HashMap::new();
    let mut rows: Vec<(usize, u8, String)> = Vec::with_capacity(original.len());

    for record in records.iter().filter(|record| accept(*record)) {
        match &record.payload {
            Payload::Add { content } => rows.push((record.anchor_line, 0, content.clone())),
            _ => {
                in_place.insert(record.anchor_line, record);
            }
        }
    }

    for (idx, line) in original.iter().enumerate() {
        let anchor = idx + 1;
        let content = match in_place.get(&anchor) {
            Some(record) if record.kind() == ChangeKind::Delete => continue,
            Some(record) => record.new_content().unwrap_or(line.as_ref()).to_string(),
            None => line.as_ref().to_string(),
        };
        rows.push((anchor, 1, content));
    }

    rows.sort_by_key(|(anchor, order, _)| (*anchor, *order));
    rows.into_iter().map(|(_, _, content)| content).collect()
}

pub fn patch_text<F>(original: &str, records: &[ChangeRecord], accept: F) -> String
where
    F: Fn(&ChangeRecord) -> bool,
{
    join_lines(&apply_records(&split_lines(original), records, accept))
}
