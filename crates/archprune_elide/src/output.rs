//! Output accumulator with retroactive truncation.

/// Append-only output that can be shrunk from the end.
///
/// The scanner writes every character first and decides afterwards whether
/// it belongs in the output; [`shrink`](Self::shrink) takes back the last
/// `n` characters. Callers only ever shrink by amounts they previously
/// pushed, and shrinking past the start empties the buffer.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    chars: Vec<char>,
}

impl OutputBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `capacity` characters.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            chars: Vec::with_capacity(capacity),
        }
    }

    /// Appends one character.
    pub fn push(&mut self, c: char) {
        self.chars.push(c);
    }

    /// Removes the last `n` characters.
    pub fn shrink(&mut self, n: usize) {
        let keep = self.chars.len().saturating_sub(n);
        self.chars.truncate(keep);
    }

    /// Number of characters currently held.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns `true` if the buffer holds nothing.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Materializes the output text.
    pub fn finish(self) -> String {
        self.chars.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(text: &str) -> OutputBuffer {
        let mut out = OutputBuffer::new();
        for c in text.chars() {
            out.push(c);
        }
        out
    }

    #[test]
    fn shrink_removes_tail() {
        let mut out = filled("a();\nif (x) {");
        out.shrink("if (x) {".len());
        assert_eq!(out.finish(), "a();\n");
    }

    #[test]
    fn shrink_counts_characters_not_bytes() {
        let mut out = filled("ok é");
        out.shrink(1);
        assert_eq!(out.finish(), "ok ");
    }

    #[test]
    fn shrink_past_start_empties() {
        let mut out = filled("ab");
        out.shrink(5);
        assert!(out.is_empty());
        assert_eq!(out.finish(), "");
    }

    #[test]
    fn interleaved_push_and_shrink() {
        let mut out = OutputBuffer::with_capacity(8);
        out.push('a');
        out.push('b');
        out.shrink(1);
        out.push('c');
        assert_eq!(out.len(), 2);
        assert_eq!(out.finish(), "ac");
    }
}
