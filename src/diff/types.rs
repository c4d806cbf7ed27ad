use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a change record, unique within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(pub u32);

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "change-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Add,
    Delete,
    Modify,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeKind::Add => "add",
            ChangeKind::Delete => "delete",
            ChangeKind::Modify => "modify",
        };
        f.write_str(name)
    }
}

/// Line content carried by a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Payload {
    Add { content: String },
    /// The removed line, kept for display only.
    Delete { content: String },
    Modify {
        old_content: String,
        new_content: String,
    },
}

impl Payload {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Payload::Add { .. } => ChangeKind::Add,
            Payload::Delete { .. } => ChangeKind::Delete,
            Payload::Modify { .. } => ChangeKind::Modify,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Accepted,
    Rejected,
}

impl Status {
    pub fn is_decided(self) -> bool {
        self != Status::Pending
    }
}

/// A user decision on one change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Accepted,
    Rejected,
}

impl From<Outcome> for Status {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Accepted => Status::Accepted,
            Outcome::Rejected => Status::Rejected,
        }
    }
}

/// One line-level change between the original and proposed text.
///
/// `anchor_line` is 1-based and always refers to the original text, no matter
/// how many lines the live buffer has gained or lost since.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub id: ChangeId,
    pub anchor_line: usize,
    pub payload: Payload,
    pub status: Status,
}

impl ChangeRecord {
    pub fn new(id: ChangeId, anchor_line: usize, payload: Payload) -> Self {
        Self {
            id,
            anchor_line,
            payload,
            status: Status::Pending,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        self.payload.kind()
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    /// The line this change would leave in the file, if any.
    pub fn new_content(&self) -> Option<&str> {
        match &self.payload {
            Payload::Add { content } => Some(content),
            Payload::Modify { new_content, .. } => Some(new_content),
            Payload::Delete { .. } => None,
        }
    }

    /// The original line this change touches, if any.
    pub fn old_content(&self) -> Option<&str> {
        match &self.payload {
            Payload::Delete { content } => Some(content),
            Payload::Modify { old_content, .. } => Some(old_content),
            Payload::Add { .. } => None,
        }
    }
}
