//! Tail matching over the characters consumed so far.

/// Append-only record of consumed characters that answers "does the input
/// seen so far end with this literal?".
///
/// Matching compares from the end, so a query costs `O(|literal|)` no
/// matter how much input has been consumed.
#[derive(Debug, Default)]
pub struct SuffixMatchBuffer {
    chars: Vec<char>,
}

impl SuffixMatchBuffer {
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

    /// Appends one consumed character.
    pub fn push(&mut self, c: char) {
        self.chars.push(c);
    }

    /// Number of characters consumed.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns `true` if nothing has been consumed.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Returns `true` if the consumed input ends with `literal`.
    ///
    /// The empty literal matches any buffer.
    pub fn ends_with(&self, literal: &str) -> bool {
        let mut tail = self.chars.iter().rev();
        for expected in literal.chars().rev() {
            match tail.next() {
                Some(&c) if c == expected => {}
                _ => return false,
            }
        }
        true
    }

    /// Returns `true` if the consumed input ends with any of `literals`.
    pub fn ends_with_any(&self, literals: &[&str]) -> bool {
        literals.iter().any(|lit| self.ends_with(lit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> SuffixMatchBuffer {
        let mut buf = SuffixMatchBuffer::new();
        for c in text.chars() {
            buf.push(c);
        }
        buf
    }

    #[test]
    fn matches_tail_only() {
        let buf = buffer("if (Meteor.isClient) {");
        assert!(buf.ends_with("{"));
        assert!(buf.ends_with("isClient) {"));
        assert!(buf.ends_with("if (Meteor.isClient) {"));
        assert!(!buf.ends_with("if (Meteor"));
    }

    #[test]
    fn literal_longer_than_buffer() {
        let buf = buffer("{");
        assert!(!buf.ends_with("if (x) {"));
    }

    #[test]
    fn empty_literal_always_matches() {
        assert!(SuffixMatchBuffer::new().ends_with(""));
        assert!(buffer("abc").ends_with(""));
    }

    #[test]
    fn any_of_several() {
        let buf = buffer("// note\r");
        assert!(buf.ends_with_any(&["\r", "\n"]));
        assert!(!buf.ends_with_any(&["*/", "}"]));
    }

    #[test]
    fn multibyte_characters() {
        let buf = buffer("naïve { é");
        assert!(buf.ends_with(" é"));
        assert!(!buf.ends_with("e"));
        assert_eq!(buf.len(), 9);
    }
}
