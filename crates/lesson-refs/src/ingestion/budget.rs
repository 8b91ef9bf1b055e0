//! Shared character budget across reference files

/// What the budget allowed for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    /// Whole text fits
    Full { chars: usize },
    /// Text cut to the first `chars` characters
    Truncated { text: String, chars: usize },
    /// Nothing left
    Exhausted,
}

/// Running character total against a fixed ceiling.
/// Characters are Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharBudget {
    limit: usize,
    used: usize,
}

impl CharBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.used)
    }

    /// Charge `text` (of length `chars`) against the budget
    pub fn allocate(&mut self, text: &str, chars: usize) -> Allocation {
        if self.used + chars <= self.limit {
            self.used += chars;
            return Allocation::Full { chars };
        }

        let remaining = self.remaining();
        if remaining == 0 {
            return Allocation::Exhausted;
        }

        let text = truncate_chars(text, remaining).to_string();
        let chars = text.chars().count();
        self.used += chars;
        Allocation::Truncated { text, chars }
    }
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
