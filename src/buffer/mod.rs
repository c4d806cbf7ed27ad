pub mod tracked;

pub use tracked::{Slot, TrackedBuffer};

use crate::diff::{join_lines, split_lines};

/// The live, mutable text the user is looking at.
///
/// Line numbers are 1-based. Implementations wrap whatever editor widget the
/// host uses; [`LineBuffer`] is the in-memory one.
pub trait TextBuffer {
    fn line_count(&self) -> usize;

    fn line(&self, line: usize) -> Option<&str>;

    /// Insert `content` so that it becomes line `at`. `at == line_count() + 1` appends.
    fn insert_line(&mut self, at: usize, content: String);

    fn remove_line(&mut self, line: usize) -> Option<String>;

    fn replace_line(&mut self, line: usize, content: String) -> Option<String>;

    fn text(&self) -> String;

    fn set_text(&mut self, text: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: split_lines(text).into_iter().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl TextBuffer for LineBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    fn insert_line(&mut self, at: usize, content: String) {
        let idx = at.saturating_sub(1).min(self.lines.len());
        self.lines.insert(idx, content);
    }

    fn remove_line(&mut self, line: usize) -> Option<String> {
        let idx = line.checked_sub(1)?;
        if idx < self.lines.len() {
            Some(self.lines.remove(idx))
        } else {
            None
        }
    }

    fn replace_line(&mut self, line: usize, content: String) -> Option<String> {
        let slot = self.lines.get_mut(line.checked_sub(1)?)?;
        Some(std::mem::replace(slot, content))
    }

    fn text(&self) -> String {
        join_lines(&self.lines)
    }

    fn set_text(&mut self, text: &str) {
        *self = Self::from_text(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_buffer_edits() {
        let mut buffer = LineBuffer::from_text("a\nb\nc");

        buffer.insert_line(2, "x".to_string());
        assert_eq!(buffer.text(), "a\nx\nb\nc");

        assert_eq!(buffer.remove_line(1), Some("a".to_string()));
        assert_eq!(buffer.replace_line(3, "z".to_string()), Some("c".to_string()));
        assert_eq!(buffer.text(), "x\nb\nz");

        buffer.insert_line(4, "end".to_string());
        assert_eq!(buffer.line(4), Some("end"));
    }

    #[test]
    fn test_line_buffer_out_of_range() {
        let mut buffer = LineBuffer::from_text("only");

        assert_eq!(buffer.line(0), None);
        assert_eq!(buffer.line(2), None);
        assert_eq!(buffer.remove_line(5), None);
        assert_eq!(buffer.replace_line(0, "x".to_string()), None);
        assert_eq!(buffer.text(), "only");
    }
}
