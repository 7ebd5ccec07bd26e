//! Module `scanner` implements the one‑token‑at‑a‑time lexer for the C‑like
//! language.
//!
//! It walks a source span byte by byte, skipping whitespace and comments, and
//! yields [`Token`]s whose literal payloads are already converted: identifiers
//! and string constants are interned [`Word`](crate::intern::Word)s, numbers
//! are `i64`/`f64`, character constants are their byte code.
//!
//! # Public API
//!
//! - `Scanner::new(file, src, interner, reserved)`
//!   Create a lexer over an in‑memory span.
//!
//! - `Scanner::with_input(line_source)`
//!   Attach a [`LineSource`] that refills the span once it is exhausted.
//!
//! - `Scanner::next_token()`
//!   Scan one token.  Yields `EOF` when no more input is available.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token, LexError>` up to and including the single `EOF`,
//!   or up to the first error.
//!
//! # Token Recognition (`scan_token`)
//!
//! Exactly one arm of one `match` runs per token:
//!
//! - letter, `_`, `#`: identifier or reserved word (`#define`, `int`, …)
//! - digit: integer or floating point constant
//! - `"`: string constant, `\` only protects the next byte from ending it
//! - `'`: character constant, strictly `'x'`
//! - `/*` … `*/` and `//` … end of line: comments, no token
//! - operators with one byte of lookahead (`+ ++ +=`, `- -- -= ->`, …)
//! - anything else: fatal `illegal character`

use crate::error::{LexError, Result};
use crate::input::LineSource;
use crate::intern::Interner;
use crate::keywords::ReservedWords;
use crate::token::{Token, TokenType};
use crate::value::Value;
use log::{debug, info};
use memchr::{memchr, memchr_iter, memmem};
use std::borrow::Cow;
use std::iter::FusedIterator;

/// A single pass **scanner** over one source unit.
pub struct Scanner<'a> {
    file: &'a str,                              // source name for diagnostics
    src: Cow<'a, str>,                          // current span (initial text or refilled line)
    curr: usize,                                // index of the next byte to examine
    line: usize,                                // 1‑based line counter (\n increments)
    token_line: usize,                          // line the last token started on
    interner: &'a Interner,                     // shared string storage
    reserved: &'a ReservedWords,                // keyword handles, read‑only
    input: Option<Box<dyn LineSource + 'a>>,    // refill source, if interactive
    finished: bool,                             // EOF or an error was yielded
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src`.
    pub fn new(
        file: &'a str,
        src: &'a str,
        interner: &'a Interner,
        reserved: &'a ReservedWords,
    ) -> Self {
        info!("Scanner created over {} bytes of {}", src.len(), file);

        Self {
            file,
            src: Cow::Borrowed(src),
            curr: 0,
            line: 1,
            token_line: 1,
            interner,
            reserved,
            input: None,
            finished: false,
        }
    }

    /// Refill from `input` line by line once the current span is used up.
    pub fn with_input(mut self, input: impl LineSource + 'a) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// Current 1‑based line.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Line on which the most recently scanned token started.
    #[inline]
    pub fn token_line(&self) -> usize {
        self.token_line
    }

    /// Source name used in diagnostics.
    #[inline]
    pub fn file(&self) -> &'a str {
        self.file
    }

    pub fn interner(&self) -> &'a Interner {
        self.interner
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    fn bytes(&self) -> &[u8] {
        self.src.as_bytes()
    }

    /// Are we at (or past) the end of the current span?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Advance one byte and return it.  *Panics* if called at the end of the
    /// span; callers guard with [`is_at_end`](Self::is_at_end).
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.bytes()[self.curr];
        self.curr += 1;
        b
    }

    /// Peek `offset` bytes ahead without consuming.  Returns `0` past the end.
    #[inline(always)]
    fn peek_at(&self, offset: usize) -> u8 {
        self.bytes().get(self.curr + offset).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    #[inline(always)]
    fn peek_next(&self) -> u8 {
        self.peek_at(1)
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    #[inline(always)]
    fn is_ident_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_'
    }

    fn fail<S: Into<String>>(&self, msg: S) -> LexError {
        LexError::lex(self.file, self.line, msg)
    }

    // ───────────────────────────── input handling ──────────────────────────

    /// Replace the exhausted span with the next input line.  Returns `false`
    /// when there is no line source or it has run dry.
    fn refill(&mut self) -> Result<bool> {
        let Some(input) = self.input.as_mut() else {
            return Ok(false);
        };

        match input.next_line()? {
            Some(line) => {
                debug!("Refilled {} bytes at line {}", line.len(), self.line);

                self.src = Cow::Owned(line);
                self.curr = 0;

                Ok(true)
            }

            None => {
                debug!("Line source exhausted");

                self.input = None;

                Ok(false)
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                b'\n' => self.line += 1,
                b' ' | b'\t' | b'\r' | 0x0B | 0x0C => {}
                _ => return,
            }

            self.curr += 1;
        }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan the next token, pulling more input as needed.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            if self.is_at_end() && !self.refill()? {
                self.token_line = self.line;

                debug!("Scanned token (EOF) on line {}", self.line);

                return Ok(Token::new(TokenType::EOF));
            }

            self.skip_whitespace();

            if self.is_at_end() {
                continue;
            }

            self.token_line = self.line;

            if let Some(token) = self.scan_token()? {
                debug!("Scanned token ({:?}) on line {}", token.token_type, self.line);

                return Ok(token);
            }
            // Otherwise it was a comment → continue loop.
        }
    }

    /// Scan a *single* token starting at `self.curr`.  Comments produce
    /// `Ok(None)`.
    fn scan_token(&mut self) -> Result<Option<Token>> {
        let start: usize = self.curr;
        let b: u8 = self.advance();

        let tt: TokenType = match b {
            // ── identifiers / keywords ───────────────────────────────────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'#' => {
                return Ok(Some(self.parse_word(start)));
            }

            // ── number literal (digit‑leading) ───────────────────────────
            b'0'..=b'9' => {
                return Ok(Some(self.parse_number(b)));
            }

            // ── string / character literals ──────────────────────────────
            b'"' => {
                return self.parse_string().map(Some);
            }

            b'\'' => {
                return self.parse_character().map(Some);
            }

            // ── comments, or plain slash ─────────────────────────────────
            b'/' => match self.peek() {
                b'*' | b'/' => {
                    self.skip_comment()?;

                    return Ok(None);
                }

                _ => TokenType::SLASH,
            },

            // ── single‑character punctuators ──────────────────────────────
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b'{' => TokenType::LEFT_BRACE,
            b'}' => TokenType::RIGHT_BRACE,
            b'[' => TokenType::LEFT_BRACKET,
            b']' => TokenType::RIGHT_BRACKET,
            b';' => TokenType::SEMICOLON,
            b',' => TokenType::COMMA,
            b'.' => TokenType::DOT,
            b'*' => TokenType::ASTERISK,
            b'%' => TokenType::MODULUS,
            b'^' => TokenType::ARITHMETIC_EXOR,
            b'~' => TokenType::UNARY_EXOR,
            b'?' => TokenType::QUESTION_MARK,
            b':' => TokenType::COLON,

            // ── operators with one byte of lookahead ─────────────────────
            b'=' => {
                if self.match_byte(b'=') {
                    TokenType::EQUALITY
                } else {
                    TokenType::ASSIGN
                }
            }

            b'!' => {
                if self.match_byte(b'=') {
                    TokenType::NOT_EQUAL
                } else {
                    TokenType::UNARY_NOT
                }
            }

            b'+' => {
                if self.match_byte(b'=') {
                    TokenType::ADD_ASSIGN
                } else if self.match_byte(b'+') {
                    TokenType::INCREMENT
                } else {
                    TokenType::PLUS
                }
            }

            b'-' => {
                if self.match_byte(b'=') {
                    TokenType::SUBTRACT_ASSIGN
                } else if self.match_byte(b'>') {
                    TokenType::ARROW
                } else if self.match_byte(b'-') {
                    TokenType::DECREMENT
                } else {
                    TokenType::MINUS
                }
            }

            b'<' => {
                if self.match_byte(b'=') {
                    TokenType::LESS_EQUAL
                } else {
                    TokenType::LESS_THAN
                }
            }

            b'>' => {
                if self.match_byte(b'=') {
                    TokenType::GREATER_EQUAL
                } else {
                    TokenType::GREATER_THAN
                }
            }

            b'&' => {
                if self.match_byte(b'&') {
                    TokenType::LOGICAL_AND
                } else {
                    TokenType::AMPERSAND
                }
            }

            b'|' => {
                if self.match_byte(b'|') {
                    TokenType::LOGICAL_OR
                } else {
                    TokenType::ARITHMETIC_OR
                }
            }

            // ── unexpected character ─────────────────────────────────────
            _ => {
                let c: char = self
                    .src
                    .get(start..)
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or(b as char);

                return Err(self.fail(format!("illegal character '{}'", c)));
            }
        };

        Ok(Some(Token::new(tt)))
    }

    /// Parse an identifier and decide if it is a **reserved word** or a
    /// generic `IDENTIFIER` token.  `start` is the first byte of the word.
    fn parse_word(&mut self, start: usize) -> Token {
        while Self::is_ident_byte(self.peek()) {
            self.advance();
        }

        let word = self.interner.intern(&self.src[start..self.curr]);

        match self.reserved.lookup(word) {
            Some(keyword) => Token::new(keyword),
            None => Token::with_value(TokenType::IDENTIFIER, Value::Str(word)),
        }
    }

    /// Parse a numeric literal (`123`, `12.5`, `1e2`, `3.0e-1`).  `first` is
    /// the already consumed leading digit.
    fn parse_number(&mut self, first: u8) -> Token {
        let mut result: i64 = i64::from(first - b'0');

        while self.peek().is_ascii_digit() {
            let digit: i64 = i64::from(self.advance() - b'0');
            result = result.wrapping_mul(10).wrapping_add(digit);
        }

        let mut fp: Option<f64> = None;

        // Optional fractional part.
        if self.peek() == b'.' {
            self.advance();

            let mut fp_result: f64 = result as f64;
            let mut fp_div: f64 = 0.1;

            while self.peek().is_ascii_digit() {
                fp_result += f64::from(self.advance() - b'0') * fp_div;
                fp_div /= 10.0;
            }

            fp = Some(fp_result);
        }

        // Optional exponent, only when digits actually follow the marker.
        if matches!(self.peek(), b'e' | b'E') && self.exponent_follows() {
            self.advance();

            let negative: bool = self.peek() == b'-';
            if matches!(self.peek(), b'-' | b'+') {
                self.advance();
            }

            let mut exponent: i32 = 0;
            while self.peek().is_ascii_digit() {
                let digit: i32 = i32::from(self.advance() - b'0');
                exponent = exponent.saturating_mul(10).saturating_add(digit);
            }

            let mantissa: f64 = fp.unwrap_or(result as f64);
            let scale: f64 = 10f64.powi(exponent);

            // zero stays zero however far `scale` overflows
            fp = Some(if mantissa == 0.0 {
                mantissa
            } else if negative {
                mantissa / scale
            } else {
                mantissa * scale
            });
        }

        match fp {
            Some(n) => Token::with_value(TokenType::FP_CONSTANT, Value::Float(n)),
            None => Token::with_value(TokenType::INTEGER_CONSTANT, Value::Int(result)),
        }
    }

    /// With `self.curr` on an `e`/`E`, is this an exponent (`e7`, `e-7`, `E+7`)?
    fn exponent_follows(&self) -> bool {
        match self.peek_next() {
            b'+' | b'-' => self.peek_at(2).is_ascii_digit(),
            c => c.is_ascii_digit(),
        }
    }

    /// Parse a double‑quoted string literal; the opening `"` is consumed.
    ///
    /// The raw text between the quotes is interned, escapes included.  A
    /// literal still open at the end of the span continues on the next
    /// refilled line, and ends where input runs out.
    fn parse_string(&mut self) -> Result<Token> {
        let mut spanned: String = String::new();
        let mut escape: bool = false;

        loop {
            let start: usize = self.curr;

            while !self.is_at_end() && (self.peek() != b'"' || escape) {
                if escape {
                    escape = false;
                } else if self.peek() == b'\\' {
                    escape = true;
                }

                if self.advance() == b'\n' {
                    self.line += 1;
                }
            }

            let piece: &str = &self.src[start..self.curr];

            if !self.is_at_end() {
                let word = if spanned.is_empty() {
                    self.interner.intern(piece)
                } else {
                    spanned.push_str(piece);
                    self.interner.intern(&spanned)
                };

                self.advance(); // closing quote

                return Ok(Token::with_value(TokenType::STRING_CONSTANT, Value::Str(word)));
            }

            spanned.push_str(piece);

            if !self.refill()? {
                let word = self.interner.intern(&spanned);

                return Ok(Token::with_value(TokenType::STRING_CONSTANT, Value::Str(word)));
            }
        }
    }

    /// Parse a character literal `'x'`; the opening `'` is consumed.
    fn parse_character(&mut self) -> Result<Token> {
        let close: u8 = self.peek_next();

        if self.curr + 1 >= self.src.len() || close != b'\'' {
            return Err(self.fail(format!(
                "illegal character '{}'",
                close.escape_ascii()
            )));
        }

        let code: i64 = i64::from(self.advance());
        self.advance(); // closing quote

        if code == i64::from(b'\n') {
            self.line += 1;
        }

        Ok(Token::with_value(
            TokenType::CHARACTER_CONSTANT,
            Value::Int(code),
        ))
    }

    /// Skip a comment.  `self.curr` is on the `*` or `/` after the first `/`.
    ///
    /// Block comments end after the first `*/`, refilling across lines until
    /// input runs out; line comments stop *on* the newline so the line
    /// counter still sees it.
    fn skip_comment(&mut self) -> Result<()> {
        let kind: u8 = self.advance();

        if kind == b'/' {
            let rest: &[u8] = &self.bytes()[self.curr..];
            self.curr += memchr(b'\n', rest).unwrap_or(rest.len());

            return Ok(());
        }

        // a `*` ending one span may pair with a `/` opening the next
        let mut star_pending: bool = false;

        loop {
            let rest: &[u8] = &self.bytes()[self.curr..];

            if star_pending && rest.first() == Some(&b'/') {
                self.curr += 1;

                return Ok(());
            }

            let (skipped, closed): (usize, bool) = match memmem::find(rest, b"*/") {
                Some(pos) => (pos + 2, true),
                None => (rest.len(), false),
            };

            star_pending = !closed && (rest.last() == Some(&b'*') || (rest.is_empty() && star_pending));

            let newlines: usize = memchr_iter(b'\n', &rest[..skipped]).count();

            self.line += newlines;
            self.curr += skipped;

            if closed || !self.refill()? {
                return Ok(());
            }
        }
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>; // alias = Result<T, LexError>

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result: Result<Token> = self.next_token();

        // Yield exactly one EOF, and nothing after a fatal error.
        self.finished = match &result {
            Ok(token) => token.token_type == TokenType::EOF,
            Err(_) => true,
        };

        Some(result)
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
