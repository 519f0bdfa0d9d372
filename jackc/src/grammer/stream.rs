use super::token::{Pos, Token};
use crate::error::Error;

/// Eagerly scanned tokens of one unit with a forward-only cursor.
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream { tokens, cursor: 0 }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// `<tokens>` listing, one markup line per token.
    pub fn markup(&self) -> String {
        let mut out = String::from("<tokens>\n");
        for token in &self.tokens {
            out.push_str(&token.markup());
            out.push('\n');
        }
        out.push_str("</tokens>\n");
        out
    }

    fn end_pos(&self) -> Pos {
        self.tokens.last().map(|t| t.pos).unwrap_or_default()
    }
}

impl TokenStream {
    pub fn has_more(&self) -> bool {
        self.cursor < self.tokens.len()
    }

    /// Watch current token without consuming it
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// Watch the token `n` places after the current one
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + n)
    }

    pub fn current(&self) -> Result<&Token, Error> {
        self.peek().ok_or_else(|| Error::UnexpectedEOF {
            expected: "more input".to_string(),
            pos: self.end_pos(),
        })
    }

    /// Consume current token and return it. Moving past the last token is an error.
    pub fn advance(&mut self) -> Result<Token, Error> {
        let token = self.current()?.clone();
        self.cursor += 1;
        Ok(token)
    }

    /// Peek and check current token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&self, cond: F) -> bool {
        self.peek().map_or(false, |token| cond(token))
    }

    /// Consume if current token is match with condition
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token> {
        if self.check_if(cond) {
            self.advance().ok()
        } else {
            None
        }
    }

    /// Current token must be match with condition
    pub fn expect_tobe<F: Fn(&Token) -> bool>(&mut self, cond: F, what: &str) -> Result<Token, Error> {
        match self.peek() {
            Some(token) if cond(token) => self.advance(),
            Some(token) => Err(Error::UnexpectedToken {
                expected: what.to_string(),
                found: token.into(),
            }),
            None => Err(Error::UnexpectedEOF {
                expected: what.to_string(),
                pos: self.end_pos(),
            }),
        }
    }
}

#[macro_export]
macro_rules! check {
    ($tokens:expr, $kind:pat) => {
        $tokens.check_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($tokens:expr, $kind:pat, $what:expr) => {
        $tokens.expect_tobe(|token| matches!(&token.kind, $kind), $what)
    };
}

#[macro_export]
macro_rules! optional {
    ($tokens:expr, $trigger:pat) => {
        $tokens.consume_if(|token| matches!(&token.kind, $trigger))
    };
}
