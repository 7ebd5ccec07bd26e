use log::debug;
use serde::Serialize;
use std::fmt;

use crate::intern::Interner;
use crate::value::Value;

/// The different kinds of tokens recognized by the scanner.
///
/// Each variant's discriminant is the one-byte tag written into a packed
/// token stream.  Only the five kinds from `IDENTIFIER` to
/// `CHARACTER_CONSTANT` carry a [`Value`]; see [`TokenType::has_value`].
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum TokenType {
    /// '='
    ASSIGN,

    /// '=='
    EQUALITY,

    /// '!='
    NOT_EQUAL,

    /// '+'
    PLUS,

    /// '++'
    INCREMENT,

    /// '+='
    ADD_ASSIGN,

    /// '-'
    MINUS,

    /// '--'
    DECREMENT,

    /// '-='
    SUBTRACT_ASSIGN,

    /// '->'
    ARROW,

    /// '*'
    ASTERISK,

    /// '/'
    SLASH,

    /// '%'
    MODULUS,

    /// '<'
    LESS_THAN,

    /// '<='
    LESS_EQUAL,

    /// '>'
    GREATER_THAN,

    /// '>='
    GREATER_EQUAL,

    /// '&'
    AMPERSAND,

    /// '&&'
    LOGICAL_AND,

    /// '|'
    ARITHMETIC_OR,

    /// '||'
    LOGICAL_OR,

    /// '^'
    ARITHMETIC_EXOR,

    /// '!'
    UNARY_NOT,

    /// '~'
    UNARY_EXOR,

    /// '?'
    QUESTION_MARK,

    /// ':'
    COLON,

    /// ';'
    SEMICOLON,

    /// ','
    COMMA,

    /// '.'
    DOT,

    /// '('
    LEFT_PAREN,

    /// ')'
    RIGHT_PAREN,

    /// '{'
    LEFT_BRACE,

    /// '}'
    RIGHT_BRACE,

    /// '['
    LEFT_BRACKET,

    /// ']'
    RIGHT_BRACKET,

    /// A user‑defined identifier
    IDENTIFIER,

    /// An integer literal
    INTEGER_CONSTANT,

    /// A floating point literal
    FP_CONSTANT,

    /// A string literal (raw contents without quotes)
    STRING_CONSTANT,

    /// A character literal
    CHARACTER_CONSTANT,

    /// '#define'
    HASH_DEFINE,

    /// '#include'
    HASH_INCLUDE,

    /// 'break'
    BREAK,

    /// 'case'
    CASE,

    /// 'char'
    CHAR,

    /// 'default'
    DEFAULT,

    /// 'do'
    DO,

    /// 'double'
    DOUBLE,

    /// 'else'
    ELSE,

    /// 'enum'
    ENUM,

    /// 'float'
    FLOAT,

    /// 'for'
    FOR,

    /// 'if'
    IF,

    /// 'int'
    INT,

    /// 'long'
    LONG,

    /// 'return'
    RETURN,

    /// 'signed'
    SIGNED,

    /// 'short'
    SHORT,

    /// 'struct'
    STRUCT,

    /// 'switch'
    SWITCH,

    /// 'typedef'
    TYPEDEF,

    /// 'union'
    UNION,

    /// 'unsigned'
    UNSIGNED,

    /// 'void'
    VOID,

    /// 'while'
    WHILE,

    /// Line break marker, only present in streams packed with line markers
    END_OF_LINE,

    /// End‑of‑stream marker
    EOF,
}

impl TokenType {
    /// Every token kind, indexed by its tag byte.
    const ALL: [TokenType; 67] = [
        TokenType::ASSIGN,
        TokenType::EQUALITY,
        TokenType::NOT_EQUAL,
        TokenType::PLUS,
        TokenType::INCREMENT,
        TokenType::ADD_ASSIGN,
        TokenType::MINUS,
        TokenType::DECREMENT,
        TokenType::SUBTRACT_ASSIGN,
        TokenType::ARROW,
        TokenType::ASTERISK,
        TokenType::SLASH,
        TokenType::MODULUS,
        TokenType::LESS_THAN,
        TokenType::LESS_EQUAL,
        TokenType::GREATER_THAN,
        TokenType::GREATER_EQUAL,
        TokenType::AMPERSAND,
        TokenType::LOGICAL_AND,
        TokenType::ARITHMETIC_OR,
        TokenType::LOGICAL_OR,
        TokenType::ARITHMETIC_EXOR,
        TokenType::UNARY_NOT,
        TokenType::UNARY_EXOR,
        TokenType::QUESTION_MARK,
        TokenType::COLON,
        TokenType::SEMICOLON,
        TokenType::COMMA,
        TokenType::DOT,
        TokenType::LEFT_PAREN,
        TokenType::RIGHT_PAREN,
        TokenType::LEFT_BRACE,
        TokenType::RIGHT_BRACE,
        TokenType::LEFT_BRACKET,
        TokenType::RIGHT_BRACKET,
        TokenType::IDENTIFIER,
        TokenType::INTEGER_CONSTANT,
        TokenType::FP_CONSTANT,
        TokenType::STRING_CONSTANT,
        TokenType::CHARACTER_CONSTANT,
        TokenType::HASH_DEFINE,
        TokenType::HASH_INCLUDE,
        TokenType::BREAK,
        TokenType::CASE,
        TokenType::CHAR,
        TokenType::DEFAULT,
        TokenType::DO,
        TokenType::DOUBLE,
        TokenType::ELSE,
        TokenType::ENUM,
        TokenType::FLOAT,
        TokenType::FOR,
        TokenType::IF,
        TokenType::INT,
        TokenType::LONG,
        TokenType::RETURN,
        TokenType::SIGNED,
        TokenType::SHORT,
        TokenType::STRUCT,
        TokenType::SWITCH,
        TokenType::TYPEDEF,
        TokenType::UNION,
        TokenType::UNSIGNED,
        TokenType::VOID,
        TokenType::WHILE,
        TokenType::END_OF_LINE,
        TokenType::EOF,
    ];

    /// The tag byte written into a packed stream.
    #[inline(always)]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a tag byte.  Returns `None` for bytes that name no token.
    #[inline]
    pub fn from_u8(tag: u8) -> Option<TokenType> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Does a packed value record follow this tag?
    #[inline(always)]
    pub const fn has_value(self) -> bool {
        let tag = self as u8;
        tag >= TokenType::IDENTIFIER as u8 && tag <= TokenType::CHARACTER_CONSTANT as u8
    }

    /// Variant name without payloads, as printed by the driver.
    pub fn name(self) -> &'static str {
        match self {
            TokenType::ASSIGN => "ASSIGN",
            TokenType::EQUALITY => "EQUALITY",
            TokenType::NOT_EQUAL => "NOT_EQUAL",
            TokenType::PLUS => "PLUS",
            TokenType::INCREMENT => "INCREMENT",
            TokenType::ADD_ASSIGN => "ADD_ASSIGN",
            TokenType::MINUS => "MINUS",
            TokenType::DECREMENT => "DECREMENT",
            TokenType::SUBTRACT_ASSIGN => "SUBTRACT_ASSIGN",
            TokenType::ARROW => "ARROW",
            TokenType::ASTERISK => "ASTERISK",
            TokenType::SLASH => "SLASH",
            TokenType::MODULUS => "MODULUS",
            TokenType::LESS_THAN => "LESS_THAN",
            TokenType::LESS_EQUAL => "LESS_EQUAL",
            TokenType::GREATER_THAN => "GREATER_THAN",
            TokenType::GREATER_EQUAL => "GREATER_EQUAL",
            TokenType::AMPERSAND => "AMPERSAND",
            TokenType::LOGICAL_AND => "LOGICAL_AND",
            TokenType::ARITHMETIC_OR => "ARITHMETIC_OR",
            TokenType::LOGICAL_OR => "LOGICAL_OR",
            TokenType::ARITHMETIC_EXOR => "ARITHMETIC_EXOR",
            TokenType::UNARY_NOT => "UNARY_NOT",
            TokenType::UNARY_EXOR => "UNARY_EXOR",
            TokenType::QUESTION_MARK => "QUESTION_MARK",
            TokenType::COLON => "COLON",
            TokenType::SEMICOLON => "SEMICOLON",
            TokenType::COMMA => "COMMA",
            TokenType::DOT => "DOT",
            TokenType::LEFT_PAREN => "LEFT_PAREN",
            TokenType::RIGHT_PAREN => "RIGHT_PAREN",
            TokenType::LEFT_BRACE => "LEFT_BRACE",
            TokenType::RIGHT_BRACE => "RIGHT_BRACE",
            TokenType::LEFT_BRACKET => "LEFT_BRACKET",
            TokenType::RIGHT_BRACKET => "RIGHT_BRACKET",
            TokenType::IDENTIFIER => "IDENTIFIER",
            TokenType::INTEGER_CONSTANT => "INTEGER_CONSTANT",
            TokenType::FP_CONSTANT => "FP_CONSTANT",
            TokenType::STRING_CONSTANT => "STRING_CONSTANT",
            TokenType::CHARACTER_CONSTANT => "CHARACTER_CONSTANT",
            TokenType::HASH_DEFINE => "HASH_DEFINE",
            TokenType::HASH_INCLUDE => "HASH_INCLUDE",
            TokenType::BREAK => "BREAK",
            TokenType::CASE => "CASE",
            TokenType::CHAR => "CHAR",
            TokenType::DEFAULT => "DEFAULT",
            TokenType::DO => "DO",
            TokenType::DOUBLE => "DOUBLE",
            TokenType::ELSE => "ELSE",
            TokenType::ENUM => "ENUM",
            TokenType::FLOAT => "FLOAT",
            TokenType::FOR => "FOR",
            TokenType::IF => "IF",
            TokenType::INT => "INT",
            TokenType::LONG => "LONG",
            TokenType::RETURN => "RETURN",
            TokenType::SIGNED => "SIGNED",
            TokenType::SHORT => "SHORT",
            TokenType::STRUCT => "STRUCT",
            TokenType::SWITCH => "SWITCH",
            TokenType::TYPEDEF => "TYPEDEF",
            TokenType::UNION => "UNION",
            TokenType::UNSIGNED => "UNSIGNED",
            TokenType::VOID => "VOID",
            TokenType::WHILE => "WHILE",
            TokenType::END_OF_LINE => "END_OF_LINE",
            TokenType::EOF => "EOF",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scanned token: its kind plus the literal value for value-bearing kinds.
///
/// This is exactly the pair a packed stream stores per token, so the scanner
/// and the token cursor produce comparable `Token`s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Token {
    /// The category of this token.
    pub token_type: TokenType,

    /// Literal payload, `Some` iff `token_type.has_value()`.
    pub value: Option<Value>,
}

impl Token {
    /// Create a token that carries no value.
    pub fn new(token_type: TokenType) -> Self {
        debug_assert!(!token_type.has_value());

        Self {
            token_type,
            value: None,
        }
    }

    /// Create a value-bearing token.
    pub fn with_value(token_type: TokenType, value: Value) -> Self {
        debug!("Creating new token: type={:?}, value={:?}", token_type, value);

        debug_assert!(token_type.has_value());

        Self {
            token_type,
            value: Some(value),
        }
    }

    /// Render this token with its interned text resolved.
    pub fn display<'a>(&'a self, interner: &'a Interner) -> TokenDisplay<'a> {
        TokenDisplay {
            token: self,
            interner,
        }
    }
}

/// `Display` adapter returned by [`Token::display`].
pub struct TokenDisplay<'a> {
    token: &'a Token,
    interner: &'a Interner,
}

impl<'a> fmt::Display for TokenDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant: &'static str = self.token.token_type.name();

        match (self.token.token_type, self.token.value) {
            (_, None) | (_, Some(Value::Void)) => f.write_str(variant),

            (TokenType::CHARACTER_CONSTANT, Some(Value::Int(code))) => {
                match u8::try_from(code).ok().filter(u8::is_ascii_graphic) {
                    Some(b) => write!(f, "{} '{}'", variant, b as char),
                    None => write!(f, "{} {}", variant, code),
                }
            }

            (_, Some(Value::Int(n))) => {
                let mut buf: itoa::Buffer = itoa::Buffer::new();
                write!(f, "{} {}", variant, buf.format(n))
            }

            (_, Some(Value::Float(n))) => {
                // 3 → "3.0", 3.14 → "3.14"
                if n.fract() == 0.0 {
                    write!(f, "{} {:.1}", variant, n)
                } else {
                    write!(f, "{} {}", variant, n)
                }
            }

            // a word from another interner prints as its raw handle
            (_, Some(Value::Str(word))) => match self.interner.try_resolve(word) {
                Some(text) if self.token.token_type == TokenType::STRING_CONSTANT => {
                    write!(f, "{} \"{}\"", variant, text)
                }
                Some(text) => write!(f, "{} {}", variant, text),
                None => write!(f, "{} #{}", variant, word.raw()),
            },
        }
    }
}
