//! Reserved words of the language.
//!
//! The spellings live in a compile-time perfect-hash map.  A
//! [`ReservedWords`] table interns each spelling once, after which keyword
//! recognition is a lookup keyed by [`Word`] handle: the scanner interns an
//! identifier and asks whether that handle names a keyword, never comparing
//! characters.

use log::info;
use phf::phf_map;
use rustc_hash::FxHashMap;

use crate::intern::{Interner, Word};
use crate::token::TokenType;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "#define"  => TokenType::HASH_DEFINE,
    "#include" => TokenType::HASH_INCLUDE,
    "break"    => TokenType::BREAK,
    "case"     => TokenType::CASE,
    "char"     => TokenType::CHAR,
    "default"  => TokenType::DEFAULT,
    "do"       => TokenType::DO,
    "double"   => TokenType::DOUBLE,
    "else"     => TokenType::ELSE,
    "enum"     => TokenType::ENUM,
    "float"    => TokenType::FLOAT,
    "for"      => TokenType::FOR,
    "if"       => TokenType::IF,
    "int"      => TokenType::INT,
    "long"     => TokenType::LONG,
    "return"   => TokenType::RETURN,
    "signed"   => TokenType::SIGNED,
    "short"    => TokenType::SHORT,
    "struct"   => TokenType::STRUCT,
    "switch"   => TokenType::SWITCH,
    "typedef"  => TokenType::TYPEDEF,
    "union"    => TokenType::UNION,
    "unsigned" => TokenType::UNSIGNED,
    "void"     => TokenType::VOID,
    "while"    => TokenType::WHILE,
};

/// Keyword table resolved against one [`Interner`].
///
/// Built once and read-only afterwards, so it can be shared freely between
/// scanners that use the same interner.
#[derive(Debug, Clone)]
pub struct ReservedWords {
    by_word: FxHashMap<Word, TokenType>,
}

impl ReservedWords {
    /// Intern every reserved spelling into `interner`.
    pub fn new(interner: &Interner) -> Self {
        let by_word: FxHashMap<Word, TokenType> = KEYWORDS
            .entries()
            .map(|(spelling, &tt)| (interner.intern(spelling), tt))
            .collect();

        info!("Reserved-word table built with {} entries", by_word.len());

        Self { by_word }
    }

    /// The keyword an interned word spells, if any.
    #[inline]
    pub fn lookup(&self, word: Word) -> Option<TokenType> {
        self.by_word.get(&word).copied()
    }

    /// Keyword for a raw spelling, without touching any interner.
    pub fn spelled(spelling: &str) -> Option<TokenType> {
        KEYWORDS.get(spelling).copied()
    }

    pub fn len(&self) -> usize {
        self.by_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_word.is_empty()
    }
}
