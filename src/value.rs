//! In-buffer layout of literal values.
//!
//! A value record is a one-byte discriminator followed by a payload whose
//! width depends only on that discriminator:
//!
//! | discriminator | variant | payload                         |
//! |---------------|---------|---------------------------------|
//! | `0`           | `Void`  | none                            |
//! | `1`           | `Int`   | 8 bytes, little-endian `i64`    |
//! | `2`           | `Float` | 8 bytes, little-endian `f64`    |
//! | `3`           | `Str`   | 4 bytes, little-endian word id  |
//!
//! The packer only ever writes through [`Value::encode`] and the token cursor
//! only ever reads through [`Value::decode`].

use bytes::{Buf, BufMut};
use serde::Serialize;

use crate::error::{LexError, Result};
use crate::intern::Word;

/// Literal payload attached to a value-bearing token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Value {
    Void,
    Int(i64),
    Float(f64),
    /// Interned text: identifier spelling or raw string-literal contents.
    Str(Word),
}

impl Value {
    pub const VOID: u8 = 0;
    pub const INT: u8 = 1;
    pub const FLOAT: u8 = 2;
    pub const STR: u8 = 3;

    /// The discriminator byte written ahead of the payload.
    #[inline]
    pub const fn discriminator(&self) -> u8 {
        match self {
            Value::Void => Self::VOID,
            Value::Int(_) => Self::INT,
            Value::Float(_) => Self::FLOAT,
            Value::Str(_) => Self::STR,
        }
    }

    /// Payload width implied by a discriminator, `None` if it is unknown.
    #[inline]
    pub const fn payload_size(discriminator: u8) -> Option<usize> {
        match discriminator {
            Self::VOID => Some(0),
            Self::INT => Some(std::mem::size_of::<i64>()),
            Self::FLOAT => Some(std::mem::size_of::<f64>()),
            Self::STR => Some(Word::ENCODED_SIZE),
            _ => None,
        }
    }

    /// Total record size: discriminator plus payload.
    #[inline]
    pub const fn encoded_len(&self) -> usize {
        1 + match self {
            Value::Void => 0,
            Value::Int(_) => std::mem::size_of::<i64>(),
            Value::Float(_) => std::mem::size_of::<f64>(),
            Value::Str(_) => Word::ENCODED_SIZE,
        }
    }

    /// Append this value's record to `buf`.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.discriminator());

        match *self {
            Value::Void => {}
            Value::Int(n) => buf.put_i64_le(n),
            Value::Float(n) => buf.put_f64_le(n),
            Value::Str(word) => buf.put_u32_le(word.raw()),
        }
    }

    /// Read one value record from the front of `buf`.
    ///
    /// `offset` is only used to locate errors.  Nothing is consumed beyond
    /// the width the discriminator declares.
    pub fn decode<B: Buf>(buf: &mut B, offset: usize) -> Result<Value> {
        if !buf.has_remaining() {
            return Err(LexError::corrupt(offset, "missing value record"));
        }

        let discriminator: u8 = buf.get_u8();

        let size: usize = Self::payload_size(discriminator).ok_or_else(|| {
            LexError::corrupt(offset, format!("unknown value type {}", discriminator))
        })?;

        if buf.remaining() < size {
            return Err(LexError::corrupt(
                offset,
                format!(
                    "value needs {} payload bytes, {} left",
                    size,
                    buf.remaining()
                ),
            ));
        }

        let value: Value = match discriminator {
            Self::INT => Value::Int(buf.get_i64_le()),
            Self::FLOAT => Value::Float(buf.get_f64_le()),
            Self::STR => Value::Str(Word::from_raw(buf.get_u32_le())),
            _ => Value::Void,
        };

        Ok(value)
    }
}
