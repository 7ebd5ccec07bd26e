//! String interner for identifiers, keywords and string constants.
//!
//! Every distinct spelling is stored exactly once and named by a compact
//! [`Word`] handle.  Comparing two words is a `u32` comparison, and resolving
//! the same word always yields the same `&'static str` (pointer identical),
//! so keyword recognition and later symbol lookups never compare characters.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Handle to an interned string.
///
/// Handles are only meaningful for the [`Interner`] that produced them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(transparent)]
pub struct Word(u32);

impl Word {
    /// Size of a word handle inside a packed token stream.
    pub const ENCODED_SIZE: usize = std::mem::size_of::<u32>();

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Create from raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Word(raw)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self.0)
    }
}

struct InternTable {
    /// Map from string content to handle.
    map: FxHashMap<&'static str, Word>,
    /// Storage for string contents, indexed by handle.
    strings: Vec<&'static str>,
}

/// Interner shared between lexers.
///
/// Lookups take a read lock; first sightings upgrade to a write lock and
/// re-check before inserting, so concurrent lexers never intern the same
/// spelling twice.
pub struct Interner {
    table: RwLock<InternTable>,
}

/// Interner handle that can be cloned across threads.
pub type SharedInterner = Arc<Interner>;

impl Interner {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: RwLock::new(InternTable {
                map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
                strings: Vec::with_capacity(capacity),
            }),
        }
    }

    /// Intern `s`, returning the same [`Word`] for every call with equal
    /// content.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&self, s: &str) -> Word {
        // Fast path: already interned
        if let Some(&word) = self.table.read().map.get(s) {
            return word;
        }

        let mut guard = self.table.write();

        // Double-check after acquiring write lock
        if let Some(&word) = guard.map.get(s) {
            return word;
        }

        let index = u32::try_from(guard.strings.len())
            .unwrap_or_else(|_| panic!("interner exceeded {} strings", u32::MAX));
        let word = Word(index);

        // Interned strings live as long as the process, like the words they name.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, word);

        word
    }

    /// Look up `s` without interning it.
    pub fn get(&self, s: &str) -> Option<Word> {
        self.table.read().map.get(s).copied()
    }

    /// Resolve a word back to its unique storage.
    ///
    /// # Panics
    /// Panics if `word` was not produced by this interner.
    pub fn resolve(&self, word: Word) -> &'static str {
        self.try_resolve(word)
            .unwrap_or_else(|| panic!("{:?} was not interned here", word))
    }

    pub fn try_resolve(&self, word: Word) -> Option<&'static str> {
        self.table.read().strings.get(word.0 as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}
