use crate::grammer::token::{Pos, Token, TokenKind};
use std::fmt;
use thiserror::Error;

// Token information detached from the token stream
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.pos)
    }
}

impl From<Token> for TokenInfo {
    fn from(token: Token) -> Self {
        TokenInfo {
            kind: token.kind,
            pos: token.pos,
        }
    }
}

impl From<&Token> for TokenInfo {
    fn from(token: &Token) -> Self {
        TokenInfo {
            kind: token.kind.clone(),
            pos: token.pos,
        }
    }
}

fn at(pos: &Option<Pos>) -> String {
    pos.map(|p| format!(" at {}", p)).unwrap_or_default()
}

// Unified error type for jackc
#[derive(Debug, Error)]
pub enum Error {
    // Lex errors
    #[error("Unexpected character `{0}` at {1}")]
    UnexpectedChar(char, Pos),

    #[error("Unterminated string constant starting at {0}")]
    UnterminatedString(Pos),

    #[error("Unterminated block comment starting at {0}")]
    UnterminatedComment(Pos),

    #[error("Integer constant {0} out of range (0..=32767) at {1}")]
    IntegerOutOfRange(String, Pos),

    #[error("Character `{0}` in string constant out of range (0..=32767) at {1}")]
    StringCharOutOfRange(char, Pos),

    #[error("String constant longer than 32767 characters starting at {0}")]
    StringTooLong(Pos),

    // Parse errors
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: TokenInfo },

    #[error("Expected {expected}, found end of input after {pos}")]
    UnexpectedEOF { expected: String, pos: Pos },

    #[error("Unexpected {0} after end of class")]
    TrailingToken(TokenInfo),

    // Symbol errors
    #[error("Undefined identifier `{name}`{}", at(.pos))]
    UndefinedSymbol { name: String, pos: Option<Pos> },

    #[error("Identifier `{name}` already declared in this scope{}", at(.pos))]
    Redeclared { name: String, pos: Option<Pos> },

    #[error("Too many {what} (limit 65535) at `{name}`{}", at(.pos))]
    TooMany {
        what: String,
        name: String,
        pos: Option<Pos>,
    },

    // IO errors
    #[error("Failed to read {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to write {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Failed to read directory {0}")]
    DirRead(String, #[source] std::io::Error),

    #[error("No .{1} files found in {0}")]
    NoSources(String, String),

    #[error("Invalid config file {0}")]
    Config(String, #[source] serde_yaml::Error),
}

impl Error {
    /// Taxonomy bucket of this error.
    pub fn category(&self) -> &'static str {
        match self {
            Error::UnexpectedChar(..)
            | Error::UnterminatedString(_)
            | Error::UnterminatedComment(_)
            | Error::IntegerOutOfRange(..)
            | Error::StringCharOutOfRange(..)
            | Error::StringTooLong(_) => "lex",
            Error::UnexpectedToken { .. } | Error::UnexpectedEOF { .. } | Error::TrailingToken(_) => {
                "parse"
            }
            Error::UndefinedSymbol { .. } | Error::Redeclared { .. } | Error::TooMany { .. } => {
                "symbol"
            }
            Error::FileRead(..)
            | Error::FileWrite(..)
            | Error::DirRead(..)
            | Error::NoSources(..)
            | Error::Config(..) => "io",
        }
    }

    /// Source position the error points at, if any.
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Error::UnexpectedChar(_, pos)
            | Error::UnterminatedString(pos)
            | Error::UnterminatedComment(pos)
            | Error::IntegerOutOfRange(_, pos)
            | Error::StringCharOutOfRange(_, pos)
            | Error::StringTooLong(pos) => Some(*pos),
            Error::UnexpectedToken { found, .. } => Some(found.pos),
            Error::UnexpectedEOF { pos, .. } => Some(*pos),
            Error::TrailingToken(info) => Some(info.pos),
            Error::UndefinedSymbol { pos, .. }
            | Error::Redeclared { pos, .. }
            | Error::TooMany { pos, .. } => *pos,
            _ => None,
        }
    }

    /// Attach a source position to a symbol error raised without one.
    pub fn located(self, at: Pos) -> Self {
        match self {
            Error::UndefinedSymbol { name, pos: None } => Error::UndefinedSymbol {
                name,
                pos: Some(at),
            },
            Error::Redeclared { name, pos: None } => Error::Redeclared {
                name,
                pos: Some(at),
            },
            Error::TooMany {
                what,
                name,
                pos: None,
            } => Error::TooMany {
                what,
                name,
                pos: Some(at),
            },
            e => e,
        }
    }
}
