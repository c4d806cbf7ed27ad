use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{ChangeView, DiffSession, SessionId, SessionState};
use crate::buffer::{TextBuffer, TrackedBuffer};
use crate::diff::{ChangeId, ChangeKind, ChangeRecord, Outcome};
use crate::error::{OverlayWarning, RedlineResult, SessionError};
use crate::patch::BufferPatcher;
use crate::persist::Persist;
use crate::preview::{OverlayEntry, OverlayRole, PreviewRenderer};
use crate::registry::SessionSummary;

/// Result of a single `decide` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decided {
    /// False when the change had already been decided.
    pub transitioned: bool,
    /// True when this decision resolved the last pending change.
    pub closed: bool,
}

/// Drives one review at a time over a single buffer.
///
/// `Idle -> PreviewShown -> Resolving -> Closed`. While a session is live the
/// buffer is locked against host edits; every mutation goes through the
/// overlay or the patcher so line bookkeeping stays exact.
pub struct SessionController<B, R, P> {
    buffer: TrackedBuffer<B>,
    renderer: R,
    persister: P,
    state: SessionState,
    session: Option<DiffSession>,
    next_id: u64,
    warnings: Vec<OverlayWarning>,
}

impl<B, R, P> SessionController<B, R, P>
where
    B: TextBuffer,
    R: PreviewRenderer,
    P: Persist,
{
    pub fn new(buffer: B, renderer: R, persister: P) -> Self {
        Self {
            buffer: TrackedBuffer::new(buffer),
            renderer,
            persister,
            state: SessionState::Idle,
            session: None,
            next_id: 1,
            warnings: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The current session, or the last one once it has closed.
    pub fn session(&self) -> Option<&DiffSession> {
        self.session.as_ref()
    }

    pub fn buffer(&self) -> &B {
        self.buffer.inner()
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn persister(&self) -> &P {
        &self.persister
    }

    /// Recoverable overlay problems seen during the current session.
    pub fn warnings(&self) -> &[OverlayWarning] {
        &self.warnings
    }

    pub fn entries(&self) -> Vec<OverlayEntry> {
        self.renderer.entries(&self.buffer)
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        self.session.as_ref().map(DiffSession::summary)
    }

    pub fn views(&self) -> Vec<ChangeView> {
        let Some(session) = &self.session else {
            return Vec::new();
        };

        session
            .records()
            .iter()
            .map(|record| ChangeView::new(record, self.handle_line(record)))
            .collect()
    }

    /// Edit the buffer on behalf of the host. Refused while a session is live.
    pub fn edit<T>(&mut self, f: impl FnOnce(&mut B) -> T) -> Result<T, SessionError> {
        if self.state.is_active() {
            return Err(SessionError::BufferLocked);
        }
        let result = f(self.buffer.inner_mut());
        self.buffer.rebase();
        Ok(result)
    }

    pub fn start_session(
        &mut self,
        original: &str,
        proposed: &str,
        path: impl Into<PathBuf>,
    ) -> RedlineResult<SessionSummary> {
        if self.state.is_active() {
            let path = self
                .session
                .as_ref()
                .map(|session| session.file_path.clone())
                .unwrap_or_default();
            return Err(SessionError::AlreadyActive { path }.into());
        }

        let path = path.into();
        if self.buffer.text() != original {
            return Err(SessionError::OriginalMismatch { path }.into());
        }

        self.buffer.rebase();
        self.warnings.clear();

        let session = DiffSession::new(SessionId(self.next_id), path, original, proposed);
        self.next_id += 1;
        let summary = session.summary();
        info!(
            "Starting {} for {} with {} changes",
            session.id,
            session.file_path.display(),
            summary.total
        );
        self.session = Some(session);

        if summary.total == 0 {
            info!("Nothing to review, closing immediately");
            self.state = SessionState::Closed;
            return Ok(summary);
        }

        self.state = SessionState::PreviewShown;
        self.refresh();
        Ok(summary)
    }

    /// Accept or reject one change. Deciding twice is a no-op.
    pub fn decide(&mut self, id: ChangeId, outcome: Outcome) -> RedlineResult<Decided> {
        self.ensure_open()?;
        let transitioned = self.resolve(&[id], outcome)? > 0;
        let closed = self.finish_if_decided()?;
        Ok(Decided {
            transitioned,
            closed,
        })
    }

    pub fn accept(&mut self, id: ChangeId) -> RedlineResult<Decided> {
        self.decide(id, Outcome::Accepted)
    }

    pub fn reject(&mut self, id: ChangeId) -> RedlineResult<Decided> {
        self.decide(id, Outcome::Rejected)
    }

    /// Accept every pending change. Returns how many changed status.
    pub fn accept_all(&mut self) -> RedlineResult<usize> {
        self.decide_all(Outcome::Accepted)
    }

    pub fn reject_all(&mut self) -> RedlineResult<usize> {
        self.decide_all(Outcome::Rejected)
    }

    /// Abandon the session and restore the buffer to the text it started with,
    /// undoing changes that were already accepted.
    pub fn discard(&mut self) -> RedlineResult<bool> {
        match self.state {
            SessionState::Idle => return Ok(false),
            SessionState::Closed => return Err(SessionError::Closed.into()),
            SessionState::PreviewShown | SessionState::Resolving => {}
        }

        self.renderer.retract_all(&mut self.buffer);

        if let Some(session) = self.session.as_ref() {
            let mut accepted: Vec<&ChangeRecord> = session.accepted().collect();
            accepted.sort_by(|a, b| b.anchor_line.cmp(&a.anchor_line));
            for record in accepted {
                if let Some(warning) = BufferPatcher::revert(&mut self.buffer, record) {
                    note_warning(&mut self.warnings, warning);
                }
            }

            if self.buffer.text() != session.original_text {
                warn!("Reverting {} left residue, restoring original text", session.id);
                self.buffer.inner_mut().set_text(&session.original_text);
                self.buffer.rebase();
            }
            info!("Discarded {}", session.id);
        }

        self.state = SessionState::Closed;
        Ok(true)
    }

    pub fn into_parts(self) -> (B, R, P) {
        (self.buffer.into_inner(), self.renderer, self.persister)
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => Err(SessionError::NoActiveSession),
            SessionState::Closed => Err(SessionError::Closed),
            SessionState::PreviewShown | SessionState::Resolving => Ok(()),
        }
    }

    fn decide_all(&mut self, outcome: Outcome) -> RedlineResult<usize> {
        self.ensure_open()?;
        let ids: Vec<ChangeId> = self
            .session
            .as_ref()
            .map(|session| session.pending().map(|record| record.id).collect())
            .unwrap_or_default();

        let changed = self.resolve(&ids, outcome)?;
        self.finish_if_decided()?;
        Ok(changed)
    }

    /// Record decisions and commit accepted changes into the buffer.
    fn resolve(&mut self, ids: &[ChangeId], outcome: Outcome) -> Result<usize, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;

        let mut changed = 0;
        for &id in ids {
            if !session.registry_mut().decide(id, outcome)? {
                debug!("{} already decided, ignoring", id);
                continue;
            }
            changed += 1;

            if outcome == Outcome::Accepted {
                if let Some(record) = session.registry().get(id) {
                    if let Some(warning) = BufferPatcher::commit(&mut self.buffer, record) {
                        note_warning(&mut self.warnings, warning);
                    }
                }
            }
        }

        self.state = SessionState::Resolving;
        if changed > 0 {
            self.refresh();
        }
        Ok(changed)
    }

    /// Retract everything and re-show only what is still pending.
    fn refresh(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        self.renderer.retract_all(&mut self.buffer);
        let pending: Vec<&ChangeRecord> = session.pending().collect();
        for warning in self.renderer.show_all(&mut self.buffer, &pending) {
            note_warning(&mut self.warnings, warning);
        }
    }

    fn finish_if_decided(&mut self) -> RedlineResult<bool> {
        let all_decided = self
            .session
            .as_ref()
            .map_or(false, |session| session.registry().all_decided());
        if !all_decided {
            return Ok(false);
        }

        self.renderer.retract_all(&mut self.buffer);
        self.state = SessionState::Closed;

        let Some(session) = self.session.as_ref() else {
            return Ok(true);
        };
        let summary = session.summary();
        info!("Closing {}: {}", session.id, summary);

        if summary.accepted > 0 {
            let text = self.buffer.text();
            self.persister.persist(session.file_path(), &text)?;
        }
        Ok(true)
    }

    /// Line the UI should attach the accept/reject handles of `record` to.
    fn handle_line(&self, record: &ChangeRecord) -> Option<usize> {
        let buffer = &self.buffer;
        let id = record.id;
        match record.kind() {
            ChangeKind::Add => buffer
                .position_of_preview(id, OverlayRole::AddMarker)
                .or_else(|| buffer.position_of_committed(id)),
            ChangeKind::Delete => buffer.position_of_base(record.anchor_line),
            ChangeKind::Modify => buffer
                .position_of_preview(id, OverlayRole::ModifyNew)
                .or_else(|| buffer.position_of_base(record.anchor_line)),
        }
    }
}

/// Every refresh re-renders the pending set, so keep one warning per change and problem.
fn note_warning(warnings: &mut Vec<OverlayWarning>, warning: OverlayWarning) {
    match warnings.iter_mut().find(|seen| seen.is_same_problem(&warning)) {
        Some(seen) => *seen = warning,
        None => warnings.push(warning),
    }
}
