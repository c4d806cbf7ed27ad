use super::TextBuffer;
use crate::diff::ChangeId;
use crate::preview::OverlayRole;

/// What a single buffer line is, relative to the text the session started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// An original line, identified by its 1-based anchor.
    Base(usize),
    /// A preview-only line owned by a pending change.
    Preview {
        id: ChangeId,
        role: OverlayRole,
        anchor: usize,
    },
    /// An added line that has been accepted and is now real content.
    Committed { id: ChangeId, anchor: usize },
}

impl Slot {
    /// Anchor the line sorts by. Slots stay ordered by key, preview lines sit
    /// directly after the original line they annotate.
    pub fn key(&self) -> usize {
        match *self {
            Slot::Base(anchor) => anchor,
            Slot::Preview { anchor, .. } | Slot::Committed { anchor, .. } => anchor,
        }
    }

    pub fn is_preview(&self) -> bool {
        matches!(self, Slot::Preview { .. })
    }

    pub fn change_id(&self) -> Option<ChangeId> {
        match *self {
            Slot::Base(_) => None,
            Slot::Preview { id, .. } | Slot::Committed { id, .. } => Some(id),
        }
    }
}

/// A [`TextBuffer`] plus a slot per line, so every mutation made by the engine
/// keeps line identity in lockstep with the text.
#[derive(Debug, Clone)]
pub struct TrackedBuffer<B> {
    inner: B,
    slots: Vec<Slot>,
}

impl<B: TextBuffer> TrackedBuffer<B> {
    pub fn new(inner: B) -> Self {
        let mut tracked = Self {
            inner,
            slots: Vec::new(),
        };
        tracked.rebase();
        tracked
    }

    /// Treat the current text as the new original: every line becomes `Base`.
    pub fn rebase(&mut self) {
        self.slots = (1..=self.inner.line_count()).map(Slot::Base).collect();
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Direct access bypasses bookkeeping; call [`rebase`](Self::rebase) afterwards.
    pub fn inner_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    pub fn into_inner(self) -> B {
        self.inner
    }

    pub fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.inner.line(line)
    }

    pub fn text(&self) -> String {
        self.inner.text()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, line: usize) -> Option<Slot> {
        line.checked_sub(1).and_then(|idx| self.slots.get(idx)).copied()
    }

    pub fn position_of_base(&self, anchor: usize) -> Option<usize> {
        self.position_where(|slot| slot == Slot::Base(anchor))
    }

    pub fn position_of_preview(&self, id: ChangeId, role: OverlayRole) -> Option<usize> {
        self.position_where(|slot| {
            matches!(slot, Slot::Preview { id: owner, role: r, .. } if owner == id && r == role)
        })
    }

    pub fn position_of_committed(&self, id: ChangeId) -> Option<usize> {
        self.position_where(|slot| matches!(slot, Slot::Committed { id: owner, .. } if owner == id))
    }

    /// Preview lines owned by `id` (or by anyone when `None`), highest line first.
    pub fn preview_lines(&self, id: Option<ChangeId>) -> Vec<usize> {
        let mut lines: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| match slot {
                Slot::Preview { id: owner, .. } => id.map_or(true, |id| *owner == id),
                _ => false,
            })
            .map(|(idx, _)| idx + 1)
            .collect();
        lines.reverse();
        lines
    }

    /// Line at which a new line keyed by `anchor` belongs: right after the last
    /// line with a smaller key.
    pub fn insertion_point(&self, anchor: usize) -> usize {
        self.slots
            .iter()
            .rposition(|slot| slot.key() < anchor)
            .map_or(1, |idx| idx + 2)
    }

    pub fn insert(&mut self, at: usize, slot: Slot, content: String) {
        let idx = at.saturating_sub(1).min(self.slots.len());
        self.inner.insert_line(idx + 1, content);
        self.slots.insert(idx, slot);
    }

    pub fn remove(&mut self, line: usize) -> Option<(Slot, String)> {
        let idx = line.checked_sub(1)?;
        if idx >= self.slots.len() {
            return None;
        }
        let content = self.inner.remove_line(line)?;
        Some((self.slots.remove(idx), content))
    }

    pub fn replace(&mut self, line: usize, content: String) -> Option<String> {
        self.inner.replace_line(line, content)
    }

    /// Change what a line is without touching its text.
    pub fn reclassify(&mut self, line: usize, slot: Slot) -> bool {
        match line.checked_sub(1).and_then(|idx| self.slots.get_mut(idx)) {
            Some(existing) => {
                *existing = slot;
                true
            }
            None => false,
        }
    }

    fn position_where(&self, predicate: impl Fn(Slot) -> bool) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| predicate(*slot))
            .map(|idx| idx + 1)
    }
}
