//! Centralised error hierarchy for the **lexer**.
//!
//! Every failure the scanner, packer or token cursor can hit is one of the
//! variants below.  All of them are fatal to the translation unit being
//! lexed: no partially built token buffer is ever handed back alongside an
//! error.
//!
//! The `Display` form is the diagnostic line the driver prints,
//! `<file>:<line>: <description>`.
//!
//! The module **does not** print diagnostics itself

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the lexer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LexError {
    /// Illegal character, either in operator position or as the closing
    /// quote of a character literal.
    #[error("{file}:{line}: {message}")]
    Lex {
        /// Source name used for diagnostics.
        file: String,

        /// 1‑based line where the error occurred.
        line: usize,

        /// Human‑readable description.
        message: String,
    },

    /// The scratch region ran out, or there was no room left for the final
    /// exact-size commit.
    #[error("{file}:{line}: out of memory while lexing")]
    OutOfMemory { file: String, line: usize },

    /// The token cursor was pointed at bytes that are not a packed stream.
    #[error("corrupt token stream at offset {offset}: {message}")]
    Corrupt { offset: usize, message: String },

    /// Wrapper around `std::io::Error` (transparent).  Raised when refilling
    /// from an interactive line source fails.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl LexError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(file: &str, line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: {}:{}: {}", file, line, message);

        LexError::Lex {
            file: file.to_owned(),
            line,
            message,
        }
    }

    /// Helper constructor for the **packer**.
    pub fn out_of_memory(file: &str, line: usize) -> Self {
        info!("Creating OutOfMemory error: {}:{}", file, line);

        LexError::OutOfMemory {
            file: file.to_owned(),
            line,
        }
    }

    /// Helper constructor for the **token cursor**.
    pub fn corrupt<S: Into<String>>(offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Corrupt error: offset={}, msg={}", offset, message);

        LexError::Corrupt { offset, message }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LexError>;
