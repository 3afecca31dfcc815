//! Lexical primitives shared by every grammar rule.
//!
//! A [`Scanner`] is a committed cursor over the input text: token rules
//! consume on success and report a positioned [`ParseError`] on failure.
//! There is no backtracking except the explicit save/restore used for the
//! `SG_` lookahead inside a message block.

use crate::types::errors::ParseError;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Scanner {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    /// Current byte offset, for save/restore lookahead.
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn restore(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// 1-based (line, column) of the current offset.
    fn position(&self) -> (usize, usize) {
        let mut line = 1usize;
        let mut column = 1usize;
        for &byte in &self.src[..self.pos.min(self.src.len())] {
            if byte == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }

    pub(crate) fn expected(&self, expected: &'static str) -> ParseError {
        let (line, column) = self.position();
        ParseError::Expected {
            line,
            column,
            expected,
        }
    }

    pub(crate) fn unknown_keyword(&self, keyword: &str) -> ParseError {
        let (line, column) = self.position();
        ParseError::UnknownKeyword {
            line,
            column,
            keyword: keyword.to_string(),
        }
    }

    fn number_out_of_range(&self) -> ParseError {
        let (line, column) = self.position();
        ParseError::NumberOutOfRange { line, column }
    }

    // --- whitespace ---

    /// Skips horizontal whitespace (spaces and tabs) within a construct.
    pub(crate) fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    /// Skips blanks, carriage returns and newlines between constructs.
    pub(crate) fn skip_blank_lines(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// True if the cursor sits at the start of a line (column 1).
    pub(crate) fn at_line_start(&self) -> bool {
        self.pos == 0 || self.src[self.pos - 1] == b'\n'
    }

    /// Consumes trailing blanks and the end of the line. EOF counts as EOL.
    pub(crate) fn expect_eol(&mut self) -> Result<(), ParseError> {
        self.skip_blanks();
        if self.peek() == Some(b'\r') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'\n') => {
                self.pos += 1;
                Ok(())
            }
            None => Ok(()),
            Some(_) => Err(self.expected("end of line")),
        }
    }

    pub(crate) fn expect_char(&mut self, ch: u8, expected: &'static str) -> Result<(), ParseError> {
        if self.peek() == Some(ch) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.expected(expected))
        }
    }

    // --- tokens ---

    /// C-style identifier: `[A-Za-z_][A-Za-z0-9_]*`.
    pub(crate) fn identifier(&mut self) -> Result<&'a str, ParseError> {
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {
                self.pos += 1;
            }
            _ => return Err(self.expected("identifier")),
        }
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        // Input is valid UTF-8 and the token is pure ASCII.
        Ok(std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default())
    }

    /// Unsigned decimal integer.
    pub(crate) fn unsigned(&mut self) -> Result<u64, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.expected("unsigned integer"));
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
        text.parse::<u64>().map_err(|_| self.number_out_of_range())
    }

    pub(crate) fn unsigned_u32(&mut self) -> Result<u32, ParseError> {
        let value = self.unsigned()?;
        u32::try_from(value).map_err(|_| self.number_out_of_range())
    }

    pub(crate) fn unsigned_u16(&mut self) -> Result<u16, ParseError> {
        let value = self.unsigned()?;
        u16::try_from(value).map_err(|_| self.number_out_of_range())
    }

    /// Signed decimal integer.
    pub(crate) fn integer(&mut self) -> Result<i64, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        let digits = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == digits {
            self.pos = start;
            return Err(self.expected("integer"));
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
        text.parse::<i64>().map_err(|_| self.number_out_of_range())
    }

    /// Floating-point number without exponent: `-?digits(.digits?)?`.
    pub(crate) fn float(&mut self) -> Result<f32, ParseError> {
        let text = self.number_text()?;
        text.parse::<f32>().map_err(|_| self.number_out_of_range())
    }

    /// The raw text of a number token, kept unparsed.
    ///
    /// Attribute values are recorded as text and only interpreted once their
    /// definition is known, so `BA_`/`BA_DEF_DEF_` capture the characters.
    pub(crate) fn number_text(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        let digits = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == digits {
            self.pos = start;
            return Err(self.expected("number"));
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        Ok(std::str::from_utf8(&self.src[start..self.pos])
            .unwrap_or_default()
            .to_string())
    }

    /// Quoted string: `"..."`. The body may span lines; no escape sequences.
    pub(crate) fn quoted(&mut self) -> Result<String, ParseError> {
        self.expect_char(b'"', "opening quote")?;
        let start = self.pos;
        loop {
            match self.bump() {
                Some(b'"') => {
                    let body = &self.src[start..self.pos - 1];
                    return Ok(String::from_utf8_lossy(body).into_owned());
                }
                Some(_) => {}
                None => return Err(self.expected("closing quote")),
            }
        }
    }
}
