//! core::persist::reader
//!
//! Token reader for the repository file.
//!
//! Mirrors stream extraction: keywords and numbers are whitespace-delimited
//! tokens that may span line breaks, while `skip_line` and `line` work on
//! raw lines. Every failure carries the 1-based line where it happened.

use std::str::FromStr;

use super::quoted::{read_quoted, QuotedError};
use super::PersistError;

pub(super) struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(super) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// 1-based line of the current position.
    pub(super) fn line_number(&self) -> usize {
        self.src[..self.pos].matches('\n').count() + 1
    }

    pub(super) fn malformed(&self, message: impl Into<String>) -> PersistError {
        PersistError::Malformed {
            line: self.line_number(),
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Next whitespace-delimited token.
    fn token(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.pos += end;
        Some(&rest[..end])
    }

    /// Require the next token to be exactly `keyword`.
    pub(super) fn keyword(&mut self, keyword: &str) -> Result<(), PersistError> {
        match self.token() {
            Some(token) if token == keyword => Ok(()),
            _ => Err(self.malformed(format!("expected '{keyword}'"))),
        }
    }

    /// Parse the next token as a number. `what` names the field in errors.
    pub(super) fn number<T: FromStr>(&mut self, what: &str) -> Result<T, PersistError> {
        match self.token().map(str::parse::<T>) {
            Some(Ok(value)) => Ok(value),
            _ => Err(self.malformed(format!("bad {what}"))),
        }
    }

    /// Read a quoted (or bare) string value.
    pub(super) fn quoted(&mut self, what: &str) -> Result<String, PersistError> {
        match read_quoted(self.rest()) {
            Ok((value, used)) => {
                self.pos += used;
                Ok(value)
            }
            Err(QuotedError::Missing) => Err(self.malformed(format!("bad {what}"))),
            Err(QuotedError::Unterminated) => {
                Err(self.malformed(format!("unterminated quoted {what}")))
            }
        }
    }

    /// Discard the remainder of the current line, including its newline.
    pub(super) fn skip_line(&mut self) {
        match self.rest().find('\n') {
            Some(i) => self.pos += i + 1,
            None => self.pos = self.src.len(),
        }
    }

    /// Read the next raw line without its newline. `None` at end of input.
    pub(super) fn line(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        match rest.find('\n') {
            Some(i) => {
                self.pos += i + 1;
                Some(&rest[..i])
            }
            None => {
                self.pos = self.src.len();
                Some(rest)
            }
        }
    }
}
