//! Replays a packed token stream for the parser.
//!
//! The cursor is strictly sequential: it can start at any token boundary it
//! is given and [`reset`](TokenCursor::reset) back to that start, but it never
//! seeks.  `END_OF_LINE` markers are consumed transparently, bumping the
//! cursor's line counter, so callers only ever see real tokens.

use log::debug;
use std::iter::FusedIterator;

use crate::error::{LexError, Result};
use crate::token::{Token, TokenType};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct TokenCursor<'b> {
    buf: &'b [u8],
    pos: usize,
    line: usize,
    start: (usize, usize),
    finished: bool,
}

impl<'b> TokenCursor<'b> {
    /// Cursor over `buf` from its first byte.
    pub fn new(buf: &'b [u8], line: usize) -> Self {
        Self::at(buf, 0, line)
    }

    /// Cursor over `buf` from `offset`, which must be a token boundary.
    pub fn at(buf: &'b [u8], offset: usize, line: usize) -> Self {
        Self {
            buf,
            pos: offset,
            line,
            start: (offset, line),
            finished: false,
        }
    }

    /// Byte offset of the next unread tag.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Line of the next token, as far as line markers tell.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Go back to where this cursor started.
    pub fn reset(&mut self) {
        (self.pos, self.line) = self.start;
        self.finished = false;
    }

    /// Decode the token at the current position.
    ///
    /// Line markers ahead of it are always skipped, even when peeking.  With
    /// `advance` the position moves past the tag and its value record;
    /// without it the same token is returned again by the next call.
    pub fn read_token(&mut self, advance: bool) -> Result<Token> {
        while self.buf.get(self.pos) == Some(&TokenType::END_OF_LINE.as_u8()) {
            self.line += 1;
            self.pos += 1;
        }

        let offset: usize = self.pos;

        let tag: u8 = *self
            .buf
            .get(offset)
            .ok_or_else(|| LexError::corrupt(offset, "read past end of token stream"))?;

        let token_type: TokenType = TokenType::from_u8(tag)
            .ok_or_else(|| LexError::corrupt(offset, format!("unknown token tag {}", tag)))?;

        let mut rest: &[u8] = &self.buf[offset + 1..];

        let value: Option<Value> = if token_type.has_value() {
            Some(Value::decode(&mut rest, offset + 1)?)
        } else {
            None
        };

        if advance {
            self.pos = self.buf.len() - rest.len();
        }

        debug!("Replayed token ({:?}) at offset {}", token_type, offset);

        Ok(Token { token_type, value })
    }

    /// Decode and step past the next token.
    #[inline]
    pub fn next_token(&mut self) -> Result<Token> {
        self.read_token(true)
    }

    /// Decode the next token without stepping past it.
    #[inline]
    pub fn peek_token(&mut self) -> Result<Token> {
        self.read_token(false)
    }
}

impl<'b> Iterator for TokenCursor<'b> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result: Result<Token> = self.next_token();

        self.finished = match &result {
            Ok(token) => token.token_type == TokenType::EOF,
            Err(_) => true,
        };

        Some(result)
    }
}

impl<'b> FusedIterator for TokenCursor<'b> {}
