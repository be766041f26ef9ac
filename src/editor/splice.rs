use crate::editor::errors::EditError;

/// The edit primitive: replace `[byte_start, byte_end)` with `new_text`.
///
/// Every tree edit (node update, append, insert, delete) compiles down to a
/// single splice over the current text. Intelligence lives in choosing the
/// span, not in applying it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Splice does nothing until apply() is called"]
pub struct Splice {
    pub byte_start: usize,
    pub byte_end: usize,
    pub new_text: String,
}

impl Splice {
    pub fn new(byte_start: usize, byte_end: usize, new_text: impl Into<String>) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
        }
    }

    /// Insert `new_text` at `at` without removing anything.
    pub fn insert(at: usize, new_text: impl Into<String>) -> Self {
        Self::new(at, at, new_text)
    }

    /// Apply to `text`, producing the new text. The range must be ordered,
    /// in bounds and on character boundaries.
    pub fn apply(&self, text: &str) -> Result<String, EditError> {
        let invalid = || EditError::InvalidByteRange {
            byte_start: self.byte_start,
            byte_end: self.byte_end,
            text_len: text.len(),
        };

        if self.byte_start > self.byte_end || self.byte_end > text.len() {
            return Err(invalid());
        }
        let prefix = text.get(..self.byte_start).ok_or_else(invalid)?;
        let suffix = text.get(self.byte_end..).ok_or_else(invalid)?;

        let mut out = String::with_capacity(prefix.len() + self.new_text.len() + suffix.len());
        out.push_str(prefix);
        out.push_str(&self.new_text);
        out.push_str(suffix);
        Ok(out)
    }
}
