pub mod arena;
pub mod cursor;
pub mod error;
pub mod input;
pub mod intern;
pub mod keywords;
pub mod lexer;
pub mod packer;
pub mod scanner;
pub mod token;
pub mod value;

pub use error::{LexError, Result};
pub use lexer::{Lexer, LexerConfig};
