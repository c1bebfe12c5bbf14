//! Character cursor used by the content and draft parsers.
//!
//! Positions are character offsets, not byte offsets, so multi-byte text is
//! handled without slicing mid-character. Every `parse_*` primitive either
//! advances the cursor and returns what it consumed, or leaves the cursor where
//! it was. Speculative parses save [`Scanner::position`] and [`Scanner::reset`]
//! on failure.

#[derive(Debug, Clone)]
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor back (or forward) to a saved position.
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos.min(self.chars.len());
    }

    /// Total number of characters in the buffer.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// True once the cursor has reached the end of the buffer.
    pub fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Advance by one character. Returns false at end of input.
    pub fn advance(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.pos += 1;
        true
    }

    /// Character under the cursor.
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Character `n` positions before the cursor; `prev_char(1)` is the one
    /// just consumed.
    pub fn prev_char(&self, n: usize) -> Option<char> {
        self.pos
            .checked_sub(n)
            .and_then(|i| self.chars.get(i).copied())
    }

    /// Consume `c` if it is next.
    pub fn parse_char(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume the literal `lit` if the buffer continues with it.
    pub fn parse_str(&mut self, lit: &str) -> bool {
        let mut i = self.pos;
        for c in lit.chars() {
            if self.chars.get(i) != Some(&c) {
                return false;
            }
            i += 1;
        }
        self.pos = i;
        true
    }

    /// Consume a single ASCII decimal digit.
    pub fn parse_digit(&mut self) -> Option<usize> {
        let digit = self.peek()?.to_digit(10)?;
        self.pos += 1;
        Some(digit as usize)
    }

    /// Consume the maximal run of characters matching `pred`. An empty run
    /// yields `None`.
    pub fn parse_while(&mut self, pred: impl Fn(char) -> bool) -> Option<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        Some(self.substring(start, self.pos))
    }

    /// Consume exactly `len` hex digits.
    pub fn parse_hexstr(&mut self, len: usize) -> Option<String> {
        let end = self.pos.checked_add(len)?;
        if end > self.chars.len() {
            return None;
        }
        if !self.chars[self.pos..end].iter().all(char::is_ascii_hexdigit) {
            return None;
        }
        let hex = self.substring(self.pos, end);
        self.pos = end;
        Some(hex)
    }

    /// Skip forward to the next character matching `pred`, leaving the cursor
    /// on it. Returns false (cursor at end) when nothing matches.
    pub fn consume_until(&mut self, pred: impl Fn(char) -> bool) -> bool {
        while let Some(c) = self.peek() {
            if pred(c) {
                return true;
            }
            self.pos += 1;
        }
        false
    }

    /// Text between two character offsets.
    pub fn substring(&self, from: usize, to: usize) -> String {
        let to = to.min(self.chars.len());
        if from >= to {
            return String::new();
        }
        self.chars[from..to].iter().collect()
    }
}
