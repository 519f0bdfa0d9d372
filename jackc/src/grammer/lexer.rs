use super::token::{Keyword, Pos, Token, TokenKind, INT_MAX, SYMBOLS};
use crate::error::Error;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
    row: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self {
            iter: code.chars().peekable(),
            row: 1,
            col: 1,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.iter.clone().nth(n)
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.iter.next()?;
        if ch == '\n' {
            self.row += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn consume_while(&mut self, cond: impl Fn(char) -> bool) -> String {
        let mut lexeme = String::new();
        while let Some(ch) = self.peek_nth(0) {
            if !cond(ch) {
                break;
            }
            self.consume();
            lexeme.push(ch);
        }
        lexeme
    }

    fn pos(&self) -> Pos {
        Pos {
            row: self.row,
            col: self.col,
        }
    }
}

// ----------------------------------------------------------------------------
// Scanner
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    pub fn parse(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        while let Some(ch0) = self.peek_nth(0) {
            // 0. Skip whitespaces and blank lines
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            let pos = self.pos();

            // 1. Comments
            if ch0 == '/' {
                match self.peek_nth(1) {
                    Some('/') => {
                        self.consume_while(|ch| ch != '\n');
                        continue;
                    }
                    Some('*') => {
                        self.skip_block_comment(pos)?;
                        continue;
                    }
                    _ => {}
                }
            }

            // 2. Cut one lexeme
            let lexeme = if ch0 == '"' {
                self.scan_text(pos)?
            } else if ch0.is_ascii_digit() {
                self.consume_while(|ch| ch.is_ascii_digit())
            } else if ch0.is_ascii_alphabetic() || ch0 == '_' {
                self.consume_while(|ch| ch.is_ascii_alphanumeric() || ch == '_')
            } else {
                self.consume();
                ch0.to_string()
            };

            // 3. Classify it
            tokens.push(Token::new(classify(&lexeme, pos)?, pos));
        }
        Ok(tokens)
    }

    // /* ... */ and /** ... */, may span lines
    fn skip_block_comment(&mut self, start: Pos) -> Result<(), Error> {
        self.consume(); // consume '/'
        self.consume(); // consume '*'
        loop {
            match self.consume() {
                Some('*') if self.peek_nth(0) == Some('/') => {
                    self.consume();
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(Error::UnterminatedComment(start)),
            }
        }
    }

    // Text: "hoge fuga", returned with its quotes
    // Every character and the length must fit a `push constant`.
    fn scan_text(&mut self, start: Pos) -> Result<String, Error> {
        self.consume();
        let mut lexeme = String::from('"');
        let mut len = 0;
        loop {
            match self.peek_nth(0) {
                Some('"') => {
                    self.consume();
                    lexeme.push('"');
                    return Ok(lexeme);
                }
                Some('\n') | None => return Err(Error::UnterminatedString(start)),
                Some(ch) => {
                    if ch as u32 > INT_MAX as u32 {
                        return Err(Error::StringCharOutOfRange(ch, self.pos()));
                    }
                    len += 1;
                    if len > INT_MAX as usize {
                        return Err(Error::StringTooLong(start));
                    }
                    self.consume();
                    lexeme.push(ch);
                }
            }
        }
    }
}

/// Classify one lexeme. When several patterns match, the earlier one wins:
/// keyword, symbol, string constant, identifier, integer constant.
pub fn classify(lexeme: &str, pos: Pos) -> Result<TokenKind, Error> {
    if let Ok(kw) = lexeme.parse::<Keyword>() {
        return Ok(TokenKind::Keyword(kw));
    }

    let mut chars = lexeme.chars();
    let first = match chars.next() {
        Some(ch) => ch,
        None => return Err(Error::UnexpectedChar(' ', pos)),
    };

    if lexeme.len() == 1 && SYMBOLS.contains(first) {
        return Ok(TokenKind::Symbol(first));
    }

    if lexeme.len() >= 2 && lexeme.starts_with('"') && lexeme.ends_with('"') {
        let body = &lexeme[1..lexeme.len() - 1];
        if !body.contains(['"', '\n']) {
            return Ok(TokenKind::Str(body.to_string()));
        }
    }

    if (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return Ok(TokenKind::Ident(lexeme.to_string()));
    }

    if lexeme.chars().all(|ch| ch.is_ascii_digit()) {
        return match lexeme.parse::<u16>() {
            Ok(n) if n <= INT_MAX => Ok(TokenKind::Int(n)),
            _ => Err(Error::IntegerOutOfRange(lexeme.to_string(), pos)),
        };
    }

    Err(Error::UnexpectedChar(first, pos))
}
