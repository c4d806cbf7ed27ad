pub mod controller;

pub use controller::{Decided, SessionController};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::diff::{diff_texts, ChangeId, ChangeKind, ChangeRecord, Payload, Status};
use crate::registry::{ChangeRegistry, SessionSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    Idle,
    PreviewShown,
    Resolving,
    Closed,
}

impl SessionState {
    /// A live session owns the buffer.
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::PreviewShown | SessionState::Resolving)
    }
}

/// One review of one file: both texts stay fixed for its whole life.
#[derive(Debug, Clone)]
pub struct DiffSession {
    pub id: SessionId,
    pub file_path: PathBuf,
    pub original_text: String,
    pub proposed_text: String,
    pub started_at: DateTime<Utc>,
    registry: ChangeRegistry,
}

impl DiffSession {
    pub fn new(
        id: SessionId,
        file_path: impl Into<PathBuf>,
        original_text: impl Into<String>,
        proposed_text: impl Into<String>,
    ) -> Self {
        let original_text = original_text.into();
        let proposed_text = proposed_text.into();
        let registry = ChangeRegistry::open(diff_texts(&original_text, &proposed_text));

        Self {
            id,
            file_path: file_path.into(),
            original_text,
            proposed_text,
            started_at: Utc::now(),
            registry,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn registry(&self) -> &ChangeRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ChangeRegistry {
        &mut self.registry
    }

    pub fn records(&self) -> &[ChangeRecord] {
        self.registry.records()
    }

    pub fn pending(&self) -> impl Iterator<Item = &ChangeRecord> + '_ {
        self.registry.pending()
    }

    pub fn accepted(&self) -> impl Iterator<Item = &ChangeRecord> + '_ {
        self.registry.accepted()
    }

    pub fn rejected(&self) -> impl Iterator<Item = &ChangeRecord> + '_ {
        self.registry.rejected()
    }

    pub fn summary(&self) -> SessionSummary {
        self.registry.summary()
    }
}

/// What the UI needs to draw one change and its accept/reject handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeView {
    pub id: ChangeId,
    pub kind: ChangeKind,
    pub anchor_line: usize,
    /// Line in the live buffer the UI should attach its handles to.
    pub buffer_line: Option<usize>,
    pub payload: Payload,
    pub status: Status,
}

impl ChangeView {
    pub fn new(record: &ChangeRecord, buffer_line: Option<usize>) -> Self {
        Self {
            id: record.id,
            kind: record.kind(),
            anchor_line: record.anchor_line,
            buffer_line,
            payload: record.payload.clone(),
            status: record.status,
        }
    }
}
