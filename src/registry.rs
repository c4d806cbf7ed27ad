use serde::Serialize;
use std::fmt;

use crate::diff::{ChangeId, ChangeRecord, Outcome, Status};
use crate::error::SessionError;

/// Owns a session's change records and their decisions.
///
/// Statuses only ever move `Pending -> Accepted` or `Pending -> Rejected`.
/// Kind and payload are never touched after `open`.
#[derive(Debug, Clone, Default)]
pub struct ChangeRegistry {
    records: Vec<ChangeRecord>,
}

impl ChangeRegistry {
    pub fn open(mut records: Vec<ChangeRecord>) -> Self {
        records.sort_by_key(|record| record.anchor_line);
        Self { records }
    }

    /// Record a decision. Returns whether the status actually changed; deciding
    /// an already decided change is a no-op so duplicate UI events are harmless.
    pub fn decide(&mut self, id: ChangeId, outcome: Outcome) -> Result<bool, SessionError> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(SessionError::UnknownChange { id })?;

        if record.status.is_decided() {
            return Ok(false);
        }
        record.status = outcome.into();
        Ok(true)
    }

    pub fn get(&self, id: ChangeId) -> Option<&ChangeRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn pending(&self) -> impl Iterator<Item = &ChangeRecord> + '_ {
        self.with_status(Status::Pending)
    }

    pub fn accepted(&self) -> impl Iterator<Item = &ChangeRecord> + '_ {
        self.with_status(Status::Accepted)
    }

    pub fn rejected(&self) -> impl Iterator<Item = &ChangeRecord> + '_ {
        self.with_status(Status::Rejected)
    }

    pub fn all_decided(&self) -> bool {
        self.records.iter().all(|record| record.status.is_decided())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            pending: self.pending().count(),
            accepted: self.accepted().count(),
            rejected: self.rejected().count(),
            total: self.records.len(),
        }
    }

    fn with_status(&self, status: Status) -> impl Iterator<Item = &ChangeRecord> + '_ {
        self.records.iter().filter(move |record| record.status == status)
    }
}

/// Decision counts for the action bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub total: usize,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pending > 0 {
            let noun = if self.pending == 1 { "change" } else { "changes" };
            write!(f, "{} {} pending", self.pending, noun)
        } else {
            write!(f, "{} accepted, {} rejected", self.accepted, self.rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_texts;

    fn registry() -> ChangeRegistry {
        ChangeRegistry::open(diff_texts("a\nb\nc", "x\nb\ny\nz"))
    }

    #[test]
    fn test_decide_transitions_once() {
        let mut registry = registry();
        let id = registry.records()[0].id;

        assert_eq!(registry.decide(id, Outcome::Accepted), Ok(true));
        assert_eq!(registry.decide(id, Outcome::Accepted), Ok(false));
        assert_eq!(registry.decide(id, Outcome::Rejected), Ok(false));
        assert_eq!(registry.get(id).map(|r| r.status), Some(Status::Accepted));
    }

    #[test]
    fn test_unknown_change() {
        let mut registry = registry();

        assert_eq!(
            registry.decide(ChangeId(99), Outcome::Rejected),
            Err(SessionError::UnknownChange { id: ChangeId(99) })
        );
    }

    #[test]
    fn test_views_partition_records() {
        let mut registry = registry();
        let ids: Vec<ChangeId> = registry.records().iter().map(|r| r.id).collect();

        registry.decide(ids[0], Outcome::Accepted).unwrap();
        registry.decide(ids[2], Outcome::Rejected).unwrap();

        let summary = registry.summary();
        assert_eq!(summary.pending + summary.accepted + summary.rejected, summary.total);
        assert_eq!(summary.to_string(), "1 change pending");
        assert!(!registry.all_decided());

        registry.decide(ids[1], Outcome::Rejected).unwrap();
        assert!(registry.all_decided());
        assert_eq!(registry.summary().to_string(), "1 accepted, 2 rejected");
    }

    #[test]
    fn test_open_sorts_by_anchor() {
        let mut records = diff_texts("a\nb", "c\nd");
        records.reverse();
        let registry = ChangeRegistry::open(records);

        let anchors: Vec<usize> = registry.records().iter().map(|r| r.anchor_line).collect();
        assert_eq!(anchors, vec![1, 2]);
    }
}
