//! Positional line differ.
//!
//! Lines are compared index by index, not aligned. Inserting or removing one
//! line near the top of a file therefore reports every following line as a
//! `Modify`. Callers must not assume a minimal change set.

pub mod types;

pub use types::{ChangeId, ChangeKind, ChangeRecord, Outcome, Payload, Status};

use serde::Serialize;

/// Split text into lines on `\n` only. Inverse of [`join_lines`].
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}

/// Compare two line sequences position by position.
///
/// Records come out in ascending anchor order with ids `0..n` in the same order.
pub fn diff_lines<O, N>(old: &[O], new: &[N]) -> Vec<ChangeRecord>
where
    O: AsRef<str>,
    N: AsRef<str>,
{
    let max_lines = old.len().max(new.len());
    let mut records = Vec::new();

    for idx in 0..max_lines {
        let payload = match (old.get(idx), new.get(idx)) {
            (None, Some(new_line)) => Payload::Add {
                content: new_line.as_ref().to_string(),
            },
            (Some(old_line), None) => Payload::Delete {
                content: old_line.as_ref().to_string(),
            },
            (Some(old_line), Some(new_line)) if old_line.as_ref() != new_line.as_ref() => {
                Payload::Modify {
                    old_content: old_line.as_ref().to_string(),
                    new_content: new_line.as_ref().to_string(),
                }
            }
            _ => continue,
        };

        let id = ChangeId(records.len() as u32);
        records.push(ChangeRecord::new(id, idx + 1, payload));
    }

    records
}

pub fn diff_texts(old: &str, new: &str) -> Vec<ChangeRecord> {
    diff_lines(&split_lines(old), &split_lines(new))
}

/// Per-kind counts over a change set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub added: usize,
    pub deleted: usize,
    pub modified: usize,
}

impl DiffStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ChangeRecord>) -> Self {
        records.into_iter().fold(Self::default(), |mut stats, record| {
            match record.kind() {
                ChangeKind::Add => stats.added += 1,
                ChangeKind::Delete => stats.deleted += 1,
                ChangeKind::Modify => stats.modified += 1,
            }
            stats
        })
    }

    pub fn total(&self) -> usize {
        self.added + self.deleted + self.modified
    }
}
