use vmcode::{Arith, Segment};

use super::Compiler;
use crate::{
    check,
    error::{Error, TokenInfo},
    expect,
    grammer::token::{Keyword as Kw, Pos, TokenKind::*, INT_MAX},
    optional,
    trace::Rule,
};

/// Binary operator between two terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Lt,
    Gt,
    Eq,
}

impl BinOp {
    fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(BinOp::Add),
            '-' => Some(BinOp::Sub),
            '*' => Some(BinOp::Mul),
            '/' => Some(BinOp::Div),
            '&' => Some(BinOp::And),
            '|' => Some(BinOp::Or),
            '<' => Some(BinOp::Lt),
            '>' => Some(BinOp::Gt),
            '=' => Some(BinOp::Eq),
            _ => None,
        }
    }
}

impl<'h> Compiler<'h> {
    /// expression = term { op term }
    ///
    /// No precedence: operators apply strictly left to right.
    pub(super) fn compile_expression(&mut self) -> Result<(), Error> {
        self.enter(Rule::Expression);
        self.compile_term()?;
        while let Some(op) = self.tokens.peek().and_then(|token| match token.kind {
            Symbol(ch) => BinOp::from_symbol(ch),
            _ => None,
        }) {
            self.tokens.advance()?;
            self.compile_term()?;
            self.compile_op(op);
        }
        self.leave(Rule::Expression);
        Ok(())
    }

    /// term = integer | string | "true" | "false" | "null" | "this"
    ///      | ident | ident "[" expression "]" | subroutineCall
    ///      | "(" expression ")" | ( "-" | "~" ) term
    fn compile_term(&mut self) -> Result<(), Error> {
        self.enter(Rule::Term);
        let token = self.tokens.expect_tobe(|_| true, "term")?;
        match token.kind {
            Int(n) => self.writer.push(Segment::Constant, n),
            Str(text) => self.compile_string(&text, token.pos)?,
            Keyword(Kw::True) => {
                self.writer.push(Segment::Constant, 0);
                self.writer.arith(Arith::Not);
            }
            Keyword(Kw::False | Kw::Null) => self.writer.push(Segment::Constant, 0),
            Keyword(Kw::This) => self.writer.push(Segment::Pointer, 0),
            Symbol('(') => {
                self.compile_expression()?;
                expect!(self.tokens, Symbol(')'), "')'")?;
            }
            Symbol('-') => {
                self.compile_term()?;
                self.writer.arith(Arith::Neg);
            }
            Symbol('~') => {
                self.compile_term()?;
                self.writer.arith(Arith::Not);
            }
            Ident(name) => {
                // One token of lookahead past the identifier picks the form
                if optional!(self.tokens, Symbol('[')).is_some() {
                    let var = self.resolve(&name, token.pos)?;
                    self.compile_expression()?;
                    expect!(self.tokens, Symbol(']'), "']'")?;
                    self.writer.push(var.segment(), var.index);
                    self.writer.arith(Arith::Add);
                    self.writer.pop(Segment::Pointer, 1);
                    self.writer.push(Segment::That, 0);
                } else if check!(self.tokens, Symbol('(' | '.')) {
                    self.compile_call(name)?;
                } else {
                    let var = self.resolve(&name, token.pos)?;
                    self.writer.push(var.segment(), var.index);
                }
            }
            kind => {
                return Err(Error::UnexpectedToken {
                    expected: "term".to_string(),
                    found: TokenInfo {
                        kind,
                        pos: token.pos,
                    },
                })
            }
        }
        self.leave(Rule::Term);
        Ok(())
    }

    /// subroutineCall = ident "(" expressionList ")"
    ///                | ident "." ident "(" expressionList ")"
    ///
    /// The leading identifier has already been consumed.
    pub(super) fn compile_call(&mut self, name: String) -> Result<(), Error> {
        let (target, receiver) = if optional!(self.tokens, Symbol('.')).is_some() {
            let (method, _) = self.expect_ident("subroutine name")?;
            match self.symbols.lookup(&name).cloned() {
                // var.method(...): the object goes first
                Some(var) => {
                    self.writer.push(var.segment(), var.index);
                    (format!("{}.{}", var.ty, method), 1)
                }
                // Class.function(...)
                None => (format!("{}.{}", name, method), 0),
            }
        } else {
            // method(...) on the current object
            self.writer.push(Segment::Pointer, 0);
            (format!("{}.{}", self.class_name, name), 1)
        };

        expect!(self.tokens, Symbol('('), "'('")?;
        let args = self.compile_expression_list(&target)?;
        expect!(self.tokens, Symbol(')'), "')'")?;
        let args = args
            .checked_add(receiver)
            .ok_or_else(|| too_many_args(&target, None))?;
        self.writer.call(&target, args);
        Ok(())
    }

    /// expressionList = [ expression { "," expression } ]
    fn compile_expression_list(&mut self, target: &str) -> Result<u16, Error> {
        self.enter(Rule::ExpressionList);
        let mut count: u16 = 0;
        if !check!(self.tokens, Symbol(')')) {
            loop {
                let pos = self.tokens.peek().map(|t| t.pos);
                self.compile_expression()?;
                count = count.checked_add(1).ok_or_else(|| too_many_args(target, pos))?;
                if optional!(self.tokens, Symbol(',')).is_none() {
                    break;
                }
            }
        }
        self.leave(Rule::ExpressionList);
        Ok(count)
    }

    fn compile_op(&mut self, op: BinOp) {
        match op {
            BinOp::Add => self.writer.arith(Arith::Add),
            BinOp::Sub => self.writer.arith(Arith::Sub),
            BinOp::And => self.writer.arith(Arith::And),
            BinOp::Or => self.writer.arith(Arith::Or),
            BinOp::Lt => self.writer.arith(Arith::Lt),
            BinOp::Gt => self.writer.arith(Arith::Gt),
            BinOp::Eq => self.writer.arith(Arith::Eq),
            BinOp::Mul => self.writer.call("Math.multiply", 2),
            BinOp::Div => self.writer.call("Math.divide", 2),
        }
    }

    /// Build the string object one character at a time.
    fn compile_string(&mut self, text: &str, pos: Pos) -> Result<(), Error> {
        let len = constant(text.chars().count()).ok_or(Error::StringTooLong(pos))?;
        self.writer.push(Segment::Constant, len);
        self.writer.call("String.new", 1);
        for ch in text.chars() {
            let code = constant(ch as usize).ok_or(Error::StringCharOutOfRange(ch, pos))?;
            self.writer.push(Segment::Constant, code);
            self.writer.call("String.appendChar", 2);
        }
        Ok(())
    }
}

// Value as a `push constant` operand, if the VM can express it
fn constant(n: usize) -> Option<u16> {
    u16::try_from(n).ok().filter(|&n| n <= INT_MAX)
}

fn too_many_args(target: &str, pos: Option<Pos>) -> Error {
    Error::TooMany {
        what: "arguments".to_string(),
        name: target.to_string(),
        pos,
    }
}
