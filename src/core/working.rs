//! core::working
//!
//! The editable staging text that becomes the next version on commit.

use thiserror::Error;

/// Errors from buffer edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("position {pos} out of range (length {len})")]
    OutOfRange { pos: usize, len: usize },

    #[error("position {0} is not on a character boundary")]
    NotCharBoundary(usize),
}

/// Mutable working content. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingBuffer {
    text: String,
}

impl WorkingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole buffer.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Remove `len` bytes starting at `pos`, clamped to the end of the buffer.
    ///
    /// # Errors
    ///
    /// - [`EditError::OutOfRange`] if `pos` is past the end
    /// - [`EditError::NotCharBoundary`] if either end splits a UTF-8 character
    pub fn erase(&mut self, pos: usize, len: usize) -> Result<(), EditError> {
        let total = self.text.len();
        if pos > total {
            return Err(EditError::OutOfRange { pos, len: total });
        }
        let end = pos.saturating_add(len).min(total);
        for boundary in [pos, end] {
            if !self.text.is_char_boundary(boundary) {
                return Err(EditError::NotCharBoundary(boundary));
            }
        }
        self.text.replace_range(pos..end, "");
        Ok(())
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for WorkingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
