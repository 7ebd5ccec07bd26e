//! Packs scanner output into one contiguous, exact-size token buffer.
//!
//! # Layout
//!
//! ```text
//! tag [value record] tag [value record] ... EOF
//! ```
//!
//! Every token is its one-byte [`TokenType`] tag.  Value-bearing tags are
//! followed immediately by a [`Value`](crate::value::Value) record; no
//! padding, no length prefixes.  The stream ends with exactly one `EOF`.
//!
//! # Two phases
//!
//! 1. **Scratch**: the arena's free space is read once, right before the run,
//!    and bounds a growable scratch region.  Capacity is checked before each
//!    tag and each value record is written; overrunning it is fatal.
//! 2. **Commit**: once `EOF` is written, the used bytes must fit twice in the
//!    free space (scratch plus permanent copy).  An exact-size copy is then
//!    committed through the arena and the scratch region is dropped.

use bytes::{BufMut, Bytes, BytesMut};
use log::{debug, info};
use std::fmt;
use std::sync::Arc;

use crate::arena::Arena;
use crate::cursor::TokenCursor;
use crate::error::{LexError, Result};
use crate::scanner::Scanner;
use crate::token::{Token, TokenType};

/// Initial physical size of the scratch region; it grows up to the arena's
/// free space as needed.
const SCRATCH_CHUNK: usize = 4096;

/// Drives a [`Scanner`] and packs its tokens.
#[derive(Debug, Clone)]
pub struct Packer {
    arena: Arc<Arena>,
    line_markers: bool,
}

impl Packer {
    pub fn new(arena: Arc<Arena>) -> Self {
        Self {
            arena,
            line_markers: false,
        }
    }

    /// Emit an `END_OF_LINE` tag for every source line a token starts past.
    pub fn line_markers(mut self, enabled: bool) -> Self {
        self.line_markers = enabled;
        self
    }

    /// Tokenise everything `scanner` yields into a committed buffer.
    pub fn tokenise(&self, scanner: &mut Scanner<'_>) -> Result<TokenBuffer> {
        let available: usize = self.arena.free_space();

        info!(
            "Packing tokens for {} into {} bytes of scratch",
            scanner.file(),
            available
        );

        let mut scratch = Scratch {
            bytes: BytesMut::with_capacity(available.min(SCRATCH_CHUNK)),
            available,
        };
        let mut line: usize = scanner.line();
        let mut count: usize = 0;

        loop {
            let token: Token = scanner.next_token()?;

            if self.line_markers {
                while line < scanner.token_line() {
                    scratch.put_tag(TokenType::END_OF_LINE, scanner)?;
                    line += 1;
                }
            }

            scratch.put_token(&token, scanner)?;
            count += 1;

            if token.token_type == TokenType::EOF {
                break;
            }
        }

        let used: usize = scratch.bytes.len();

        // need room for the scratch bytes and the permanent copy at once
        if used.checked_mul(2).map_or(true, |needed| available < needed) {
            return Err(LexError::out_of_memory(scanner.file(), scanner.line()));
        }

        let bytes: Bytes = self
            .arena
            .commit(&scratch.bytes)
            .ok_or_else(|| LexError::out_of_memory(scanner.file(), scanner.line()))?;

        info!("Packed {} tokens into {} bytes", count, bytes.len());

        Ok(TokenBuffer {
            bytes,
            arena: Some(Arc::clone(&self.arena)),
        })
    }
}

/// Capacity-checked scratch region.
struct Scratch {
    bytes: BytesMut,
    available: usize,
}

impl Scratch {
    /// Fail unless strictly more than `len` bytes remain.
    #[inline]
    fn reserve(&self, len: usize, scanner: &Scanner<'_>) -> Result<()> {
        if self.available.saturating_sub(self.bytes.len()) <= len {
            debug!(
                "Scratch exhausted: {} of {} used, {} more needed",
                self.bytes.len(),
                self.available,
                len
            );

            return Err(LexError::out_of_memory(scanner.file(), scanner.line()));
        }

        Ok(())
    }

    fn put_tag(&mut self, tt: TokenType, scanner: &Scanner<'_>) -> Result<()> {
        self.reserve(1, scanner)?;
        self.bytes.put_u8(tt.as_u8());
        Ok(())
    }

    fn put_token(&mut self, token: &Token, scanner: &Scanner<'_>) -> Result<()> {
        self.put_tag(token.token_type, scanner)?;

        if let Some(value) = &token.value {
            self.reserve(value.encoded_len(), scanner)?;
            value.encode(&mut self.bytes);
        }

        Ok(())
    }
}

/// Exact-size, immutable packed token stream.
///
/// The bytes it holds count against the arena that committed them until the
/// buffer is dropped.
pub struct TokenBuffer {
    bytes: Bytes,
    arena: Option<Arc<Arena>>,
}

impl TokenBuffer {
    /// Wrap bytes packed elsewhere.  The cursor validates them as it reads.
    pub fn from_bytes(bytes: Bytes) -> Self {
        Self { bytes, arena: None }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Replay from the start, counting lines from 1.
    pub fn cursor(&self) -> TokenCursor<'_> {
        TokenCursor::new(self.as_bytes(), 1)
    }

    /// Replay from `offset`, counting lines from `line`.
    pub fn cursor_at(&self, offset: usize, line: usize) -> TokenCursor<'_> {
        TokenCursor::at(self.as_bytes(), offset, line)
    }
}

impl fmt::Debug for TokenBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBuffer")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Drop for TokenBuffer {
    fn drop(&mut self) {
        if let Some(arena) = self.arena.take() {
            arena.release(self.bytes.len());
        }
    }
}
