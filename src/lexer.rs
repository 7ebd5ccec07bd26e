//! Top-level lexing entry points.
//!
//! A [`Lexer`] is built once per process (or per compilation session): it
//! owns the interner, resolves the reserved words against it, and holds the
//! arena every packed buffer is committed through.  Each `analyse*` call then
//! scans one translation unit into a fresh [`TokenBuffer`].

use log::info;
use std::sync::Arc;

use crate::arena::{Arena, DEFAULT_SCRATCH_CAPACITY};
use crate::error::Result;
use crate::input::LineSource;
use crate::intern::{Interner, SharedInterner};
use crate::keywords::ReservedWords;
use crate::packer::{Packer, TokenBuffer};
use crate::scanner::Scanner;

/// Lexer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerConfig {
    /// Memory ceiling for packed token buffers, scratch included.
    pub scratch_capacity: usize,

    /// Pack `END_OF_LINE` markers so cursors can track source lines.
    pub line_markers: bool,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
            line_markers: false,
        }
    }
}

#[derive(Debug)]
pub struct Lexer {
    interner: SharedInterner,
    reserved: ReservedWords,
    arena: Arc<Arena>,
    config: LexerConfig,
}

impl Lexer {
    pub fn new(config: LexerConfig) -> Self {
        Self::with_interner(Arc::new(Interner::new()), config)
    }

    /// Share an interner with other lexers, so identical spellings scanned
    /// by any of them resolve to the same word.
    pub fn with_interner(interner: SharedInterner, config: LexerConfig) -> Self {
        let reserved = ReservedWords::new(&interner);

        info!(
            "Lexer initialised: scratch_capacity={}, line_markers={}",
            config.scratch_capacity, config.line_markers
        );

        Self {
            interner,
            reserved,
            arena: Arc::new(Arena::new(config.scratch_capacity)),
            config,
        }
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn reserved(&self) -> &ReservedWords {
        &self.reserved
    }

    #[inline]
    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }

    #[inline]
    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    /// A scanner over `source`, for callers that want tokens one by one.
    pub fn scanner<'a>(&'a self, file: &'a str, source: &'a str) -> Scanner<'a> {
        Scanner::new(file, source, &self.interner, &self.reserved)
    }

    fn packer(&self) -> Packer {
        Packer::new(Arc::clone(&self.arena)).line_markers(self.config.line_markers)
    }

    /// Lexically analyse an in-memory source unit.
    pub fn analyse(&self, file: &str, source: &str) -> Result<TokenBuffer> {
        let mut scanner = self.scanner(file, source);

        self.packer().tokenise(&mut scanner)
    }

    /// Lexically analyse `source`, then keep reading lines from `input` until
    /// it is exhausted.
    pub fn analyse_with_input<'a>(
        &'a self,
        file: &'a str,
        source: &'a str,
        input: impl LineSource + 'a,
    ) -> Result<TokenBuffer> {
        let mut scanner = self.scanner(file, source).with_input(input);

        self.packer().tokenise(&mut scanner)
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new(LexerConfig::default())
    }
}
