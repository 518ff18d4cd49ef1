//! Forward-only scanner over envelope text.
//!
//! The scanner works on the raw bytes of the input so that arbitrary
//! (even non-ASCII) text can be scanned without panicking; anything that
//! is not part of a literal or the hex alphabet surfaces as a decode
//! error further up.

/// Forward-only cursor over decoded envelope text.
///
/// The scanner never looks backward and is consumed exactly once per
/// decode pass.
#[derive(Debug)]
pub struct FrameScanner<'a> {
    text: &'a [u8],
    position: usize,
}

impl<'a> FrameScanner<'a> {
    /// Creates a scanner positioned at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text: text.as_bytes(),
            position: 0,
        }
    }

    /// Current cursor position in bytes from the start of the input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total input length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns whether the input is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns whether the cursor has passed the end of the input.
    pub fn at_end(&self) -> bool {
        self.position >= self.text.len()
    }

    /// Returns whether any input remains at the cursor.
    pub fn has_more(&self) -> bool {
        self.position < self.text.len()
    }

    /// Returns the character `offset` bytes past the cursor, or `None`
    /// beyond the end of the input.
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.text
            .get(self.position.checked_add(offset)?)
            .map(|&byte| byte as char)
    }

    /// Moves the cursor forward by `count` bytes and reports whether any
    /// input remains.
    pub fn advance(&mut self, count: usize) -> bool {
        self.position = self.position.saturating_add(count);
        self.has_more()
    }

    /// Skips whitespace at the cursor and reports whether any input
    /// remains.
    pub fn skip_whitespace(&mut self) -> bool {
        while let Some(&byte) = self.text.get(self.position) {
            if !byte.is_ascii_whitespace() {
                break;
            }
            self.position += 1;
        }
        self.has_more()
    }

    /// Matches a literal at the cursor, skipping surrounding whitespace.
    ///
    /// On success the cursor advances past the literal and any trailing
    /// whitespace; on failure it is left where it started.
    pub fn match_literal(&mut self, literal: &str) -> bool {
        let start = self.position;
        self.skip_whitespace();
        let rest = self.text.get(self.position..).unwrap_or(&[]);
        if rest.starts_with(literal.as_bytes()) {
            self.position += literal.len();
            self.skip_whitespace();
            true
        } else {
            self.position = start;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek() {
        let scanner = FrameScanner::new("ab");
        assert_eq!(scanner.peek(0), Some('a'));
        assert_eq!(scanner.peek(1), Some('b'));
        assert_eq!(scanner.peek(2), None);
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = FrameScanner::new(" \n\r\t x");
        assert!(scanner.skip_whitespace());
        assert_eq!(scanner.peek(0), Some('x'));

        let mut scanner = FrameScanner::new("   ");
        assert!(!scanner.skip_whitespace());
        assert!(scanner.at_end());
    }

    #[test]
    fn test_match_literal_advances_past_whitespace() {
        let mut scanner = FrameScanner::new("  <msg>\n\r01");
        assert!(scanner.match_literal("<msg>"));
        assert_eq!(scanner.peek(0), Some('0'));
        assert_eq!(scanner.peek(1), Some('1'));
    }

    #[test]
    fn test_match_literal_failure_restores_cursor() {
        let mut scanner = FrameScanner::new("  </msg>");
        let before = scanner.position();
        assert!(!scanner.match_literal("<msg>"));
        assert_eq!(scanner.position(), before);
    }

    #[test]
    fn test_match_literal_near_end_of_input() {
        let mut scanner = FrameScanner::new("<ms");
        assert!(!scanner.match_literal("<msg>"));
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_advance() {
        let mut scanner = FrameScanner::new("abcd");
        assert!(scanner.advance(2));
        assert_eq!(scanner.peek(0), Some('c'));
        assert!(!scanner.advance(10));
        assert!(scanner.at_end());
        assert_eq!(scanner.peek(0), None);
    }

    #[test]
    fn test_forward_only_counters() {
        let scanner = FrameScanner::new("abc");
        assert_eq!(scanner.len(), 3);
        assert!(!scanner.is_empty());
        assert!(scanner.has_more());
        assert_eq!(scanner.position(), 0);
    }
}
