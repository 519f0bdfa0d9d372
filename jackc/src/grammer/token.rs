use std::fmt;
use strum::{Display, EnumString};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Token { kind, pos }
    }

    /// `<category> value </category>` with markup-significant characters escaped.
    pub fn markup(&self) -> String {
        let cat = self.kind.category();
        let value = match &self.kind {
            TokenKind::Str(s) => escape(s),
            kind => escape(&kind.lexeme()),
        };
        format!("<{cat}> {value} </{cat}>")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Symbol(char),
    Ident(String),
    Int(u16),
    Str(String),
}

impl TokenKind {
    pub fn category(&self) -> Category {
        match self {
            TokenKind::Keyword(_) => Category::Keyword,
            TokenKind::Symbol(_) => Category::Symbol,
            TokenKind::Ident(_) => Category::Identifier,
            TokenKind::Int(_) => Category::IntegerConstant,
            TokenKind::Str(_) => Category::StringConstant,
        }
    }

    /// Source text this token was scanned from.
    pub fn lexeme(&self) -> String {
        match self {
            TokenKind::Keyword(kw) => kw.to_string(),
            TokenKind::Symbol(ch) => ch.to_string(),
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Int(n) => n.to_string(),
            TokenKind::Str(s) => format!("\"{}\"", s),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.category(), self.lexeme())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "camelCase")]
pub enum Category {
    Keyword,
    Symbol,
    Identifier,
    IntegerConstant,
    StringConstant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

pub const SYMBOLS: &str = "{}()[].,;+-*/&|<>=~";

/// Largest integer constant the VM can push.
pub const INT_MAX: u16 = 32767;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            ch => out.push(ch),
        }
    }
    out
}
