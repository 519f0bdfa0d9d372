use vmcode::{Arith, Segment};

use super::Compiler;
use crate::{
    check,
    error::Error,
    expect,
    grammer::token::{Keyword as Kw, TokenKind::*},
    optional,
    trace::Rule,
};

impl<'h> Compiler<'h> {
    /// statements = { letStatement | ifStatement | whileStatement | doStatement | returnStatement }
    pub(super) fn compile_statements(&mut self) -> Result<(), Error> {
        self.enter(Rule::Statements);
        loop {
            match self.tokens.peek().map(|token| &token.kind) {
                Some(Keyword(Kw::Let)) => self.compile_let()?,
                Some(Keyword(Kw::If)) => self.compile_if()?,
                Some(Keyword(Kw::While)) => self.compile_while()?,
                Some(Keyword(Kw::Do)) => self.compile_do()?,
                Some(Keyword(Kw::Return)) => self.compile_return()?,
                _ => break,
            }
        }
        self.leave(Rule::Statements);
        Ok(())
    }

    /// letStatement = "let" ident [ "[" expression "]" ] "=" expression ";"
    fn compile_let(&mut self) -> Result<(), Error> {
        self.enter(Rule::LetStatement);
        expect!(self.tokens, Keyword(Kw::Let), "keyword `let`")?;
        let (name, pos) = self.expect_ident("variable name")?;
        let var = self.resolve(&name, pos)?;

        if optional!(self.tokens, Symbol('[')).is_some() {
            // Target address first, then the value; `that` is aimed only
            // after the right-hand side is done with `pointer 1`.
            self.compile_expression()?;
            expect!(self.tokens, Symbol(']'), "']'")?;
            self.writer.push(var.segment(), var.index);
            self.writer.arith(Arith::Add);
            expect!(self.tokens, Symbol('='), "'='")?;
            self.compile_expression()?;
            self.writer.pop(Segment::Temp, 0);
            self.writer.pop(Segment::Pointer, 1);
            self.writer.push(Segment::Temp, 0);
            self.writer.pop(Segment::That, 0);
        } else {
            expect!(self.tokens, Symbol('='), "'='")?;
            self.compile_expression()?;
            self.writer.pop(var.segment(), var.index);
        }

        expect!(self.tokens, Symbol(';'), "';'")?;
        self.leave(Rule::LetStatement);
        Ok(())
    }

    /// ifStatement = "if" "(" expression ")" "{" statements "}" [ "else" "{" statements "}" ]
    fn compile_if(&mut self) -> Result<(), Error> {
        self.enter(Rule::IfStatement);
        expect!(self.tokens, Keyword(Kw::If), "keyword `if`")?;
        expect!(self.tokens, Symbol('('), "'('")?;
        self.compile_expression()?;
        expect!(self.tokens, Symbol(')'), "')'")?;

        let else_label = self.fresh_label("IF_ELSE");
        let end_label = self.fresh_label("IF_END");
        self.writer.arith(Arith::Not);
        self.writer.if_goto(&else_label);
        self.compile_block()?;

        if optional!(self.tokens, Keyword(Kw::Else)).is_some() {
            self.writer.goto(&end_label);
            self.writer.label(&else_label);
            self.compile_block()?;
            self.writer.label(&end_label);
        } else {
            self.writer.label(&else_label);
        }

        self.leave(Rule::IfStatement);
        Ok(())
    }

    /// whileStatement = "while" "(" expression ")" "{" statements "}"
    fn compile_while(&mut self) -> Result<(), Error> {
        self.enter(Rule::WhileStatement);
        let top_label = self.fresh_label("WHILE_TOP");
        let end_label = self.fresh_label("WHILE_END");

        expect!(self.tokens, Keyword(Kw::While), "keyword `while`")?;
        self.writer.label(&top_label);
        expect!(self.tokens, Symbol('('), "'('")?;
        self.compile_expression()?;
        expect!(self.tokens, Symbol(')'), "')'")?;
        self.writer.arith(Arith::Not);
        self.writer.if_goto(&end_label);
        self.compile_block()?;
        self.writer.goto(&top_label);
        self.writer.label(&end_label);

        self.leave(Rule::WhileStatement);
        Ok(())
    }

    /// doStatement = "do" subroutineCall ";"
    fn compile_do(&mut self) -> Result<(), Error> {
        self.enter(Rule::DoStatement);
        expect!(self.tokens, Keyword(Kw::Do), "keyword `do`")?;
        let (name, _) = self.expect_ident("subroutine name")?;
        self.compile_call(name)?;
        expect!(self.tokens, Symbol(';'), "';'")?;
        // Discard the value every call leaves behind
        self.writer.pop(Segment::Temp, 0);
        self.leave(Rule::DoStatement);
        Ok(())
    }

    /// returnStatement = "return" [ expression ] ";"
    fn compile_return(&mut self) -> Result<(), Error> {
        self.enter(Rule::ReturnStatement);
        expect!(self.tokens, Keyword(Kw::Return), "keyword `return`")?;
        if check!(self.tokens, Symbol(';')) {
            self.writer.push(Segment::Constant, 0);
        } else {
            self.compile_expression()?;
        }
        expect!(self.tokens, Symbol(';'), "';'")?;
        self.writer.ret();
        self.leave(Rule::ReturnStatement);
        Ok(())
    }

    // "{" statements "}"
    fn compile_block(&mut self) -> Result<(), Error> {
        expect!(self.tokens, Symbol('{'), "'{'")?;
        self.compile_statements()?;
        expect!(self.tokens, Symbol('}'), "'}'")?;
        Ok(())
    }
}
