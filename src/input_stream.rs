//! Character stream with position tracking
//!
//! Holds raw sentence text as Unicode characters so the tokenizer can scan
//! words and punctuation by character index and report line/column
//! positions for words the tagger cannot place.

use std::fmt;

#[derive(Clone)]
pub struct InputStream {
    chars: Vec<char>,
    position: usize,
}

impl InputStream {
    pub fn new(input: &str) -> Self {
        InputStream {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    /// Current character without advancing
    pub fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// Current character, then advance
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.current();
        if ch.is_some() {
            self.position += 1;
        }
        ch
    }

    /// Character index, not byte offset
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.chars.len()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn skip_whitespace(&mut self) {
        while self.current().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    /// Consume characters while `pred` holds and return them.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.position;
        while self.current().is_some_and(&pred) {
            self.position += 1;
        }
        self.chars[start..self.position].iter().collect()
    }

    /// 1-based line and column of a character index
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;

        for ch in self.chars.iter().take(pos) {
            if *ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }

        (line, col)
    }
}

impl fmt::Debug for InputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remaining: String = self.chars[self.position..].iter().take(20).collect();
        write!(f, "InputStream(pos={}, remaining={:?})", self.position, remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_and_eof() {
        let mut stream = InputStream::new("ab");
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.advance(), Some('a'));
        assert_eq!(stream.advance(), Some('b'));
        assert_eq!(stream.advance(), None);
        assert!(stream.is_eof());
        assert_eq!(stream.position(), 2);
    }

    #[test]
    fn test_take_while_and_skip() {
        let mut stream = InputStream::new("  man ate");
        stream.skip_whitespace();
        assert_eq!(stream.take_while(char::is_alphabetic), "man");
        assert_eq!(stream.current(), Some(' '));
        stream.skip_whitespace();
        assert_eq!(stream.take_while(char::is_alphabetic), "ate");
        assert!(stream.is_eof());
    }

    #[test]
    fn test_line_col() {
        let stream = InputStream::new("the man\nate it");
        assert_eq!(stream.line_col(0), (1, 1));
        assert_eq!(stream.line_col(4), (1, 5));
        assert_eq!(stream.line_col(8), (2, 1));
        assert_eq!(stream.line_col(12), (2, 5));
    }

    #[test]
    fn test_unicode_positions() {
        let mut stream = InputStream::new("café au");
        assert_eq!(stream.take_while(char::is_alphabetic), "café");
        assert_eq!(stream.position(), 4);
    }
}
