use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::diff::ChangeId;

/// Main error type for Redline operations
#[derive(Error, Debug)]
pub enum RedlineError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Persist error: {0}")]
    Persist(#[from] PersistError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Session lifecycle errors. None of these are fatal: discard and retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unknown change: {id}")]
    UnknownChange { id: ChangeId },

    #[error("A review session is already active for {path:?}")]
    AlreadyActive { path: PathBuf },

    #[error("Session is closed")]
    Closed,

    #[error("No review session has been started")]
    NoActiveSession,

    #[error("Buffer is read-only while a review session is active")]
    BufferLocked,

    #[error("Original text for {path:?} does not match the buffer content")]
    OriginalMismatch { path: PathBuf },
}

/// Failures at the persistence boundary
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path:?} changed on disk since it was opened")]
    Conflict { path: PathBuf },

    #[error("Write to {path:?} rejected: {reason}")]
    Rejected { path: PathBuf, reason: String },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown config key: {key}")]
    UnknownKey { key: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Recoverable overlay problems. Logged and collected, never returned as `Err`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayWarning {
    #[error("{id}: anchor line {anchor} exceeds line count {line_count}, clamped to line {clamped_to}")]
    AnchorClamped {
        id: ChangeId,
        anchor: usize,
        line_count: usize,
        clamped_to: usize,
    },

    #[error("{id}: original line {anchor} is no longer in the buffer")]
    MissingLine { id: ChangeId, anchor: usize },
}

impl OverlayWarning {
    pub fn change_id(&self) -> ChangeId {
        match self {
            OverlayWarning::AnchorClamped { id, .. } | OverlayWarning::MissingLine { id, .. } => *id,
        }
    }

    /// Same problem for the same change, whatever line numbers it carries.
    pub fn is_same_problem(&self, other: &OverlayWarning) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.change_id() == other.change_id()
    }
}

/// Result type alias for Redline operations
pub type RedlineResult<T> = Result<T, RedlineError>;

/// Error display helper for CLI
pub fn display_error(error: &RedlineError) {
    use colored::Colorize;
    use std::error::Error;

    eprintln!("\n{} {}", "✗".bright_red().bold(), "Operation failed".bright_red().bold());
    eprintln!("  {} {}", "├".bright_black(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} Caused by: {}", "├".bright_black(), err);
        source = err.source();
    }

    match error {
        RedlineError::Persist(PersistError::Conflict { path }) => {
            eprintln!("  {} {:?} was modified by another program", "└".bright_cyan(), path);
            eprintln!("    Reload the file and request the edit again");
        }
        RedlineError::Session(SessionError::AlreadyActive { .. }) => {
            eprintln!("  {} Finish or discard the current review first", "└".bright_cyan());
        }
        RedlineError::Session(SessionError::OriginalMismatch { .. }) => {
            eprintln!("  {} The buffer changed after the proposal was requested", "└".bright_cyan());
        }
        _ => {
            eprintln!("  {} Run with --verbose for more details", "└".bright_black());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = RedlineError::Session(SessionError::UnknownChange { id: ChangeId(7) });
        let display = format!("{}", error);

        assert!(display.contains("change-7"));
        assert!(display.contains("Unknown change"));
    }

    #[test]
    fn test_persist_error_source() {
        use std::error::Error;

        let error = PersistError::Io {
            path: PathBuf::from("src/main.rs"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let wrapped = RedlineError::Persist(error);

        assert!(format!("{}", wrapped).contains("src/main.rs"));
        assert!(wrapped.source().is_some());
    }

    #[test]
    fn test_overlay_warning() {
        let warning = OverlayWarning::AnchorClamped {
            id: ChangeId(2),
            anchor: 9,
            line_count: 4,
            clamped_to: 5,
        };
        let display = format!("{}", warning);

        assert!(display.contains("anchor line 9"));
        assert!(display.contains("clamped to line 5"));
    }
}
