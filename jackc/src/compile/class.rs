use vmcode::{Segment, Writer};

use super::Compiler;
use crate::{
    check,
    error::Error,
    expect,
    grammer::token::{Keyword as Kw, TokenKind::*},
    optional,
    symbols::Kind,
    trace::Rule,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubKind {
    Constructor,
    Function,
    Method,
}

impl<'h> Compiler<'h> {
    /// class = "class" ident "{" { classVarDec } { subroutineDec } "}"
    pub(super) fn compile_class(&mut self) -> Result<(), Error> {
        self.enter(Rule::Class);
        expect!(self.tokens, Keyword(Kw::Class), "keyword `class`")?;
        let (name, _) = self.expect_ident("class name")?;
        self.class_name = name;
        expect!(self.tokens, Symbol('{'), "'{'")?;
        while check!(self.tokens, Keyword(Kw::Static | Kw::Field)) {
            self.compile_class_var_dec()?;
        }
        while check!(self.tokens, Keyword(Kw::Constructor | Kw::Function | Kw::Method)) {
            self.compile_subroutine()?;
        }
        expect!(self.tokens, Symbol('}'), "'}'")?;
        self.leave(Rule::Class);
        Ok(())
    }

    /// classVarDec = ( "static" | "field" ) type ident { "," ident } ";"
    fn compile_class_var_dec(&mut self) -> Result<(), Error> {
        self.enter(Rule::ClassVarDec);
        let kind = match self.tokens.advance()?.kind {
            Keyword(Kw::Static) => Kind::Static,
            _ => Kind::Field,
        };
        let ty = self.compile_type(false)?;
        self.compile_var_names(&ty, kind)?;
        expect!(self.tokens, Symbol(';'), "';'")?;
        self.leave(Rule::ClassVarDec);
        Ok(())
    }

    /// subroutineDec = ( "constructor" | "function" | "method" ) ( "void" | type ) ident
    ///                 "(" parameterList ")" subroutineBody
    fn compile_subroutine(&mut self) -> Result<(), Error> {
        self.enter(Rule::SubroutineDec);
        let kind = match self.tokens.advance()?.kind {
            Keyword(Kw::Constructor) => SubKind::Constructor,
            Keyword(Kw::Method) => SubKind::Method,
            _ => SubKind::Function,
        };
        self.compile_type(true)?;
        let (name, _) = self.expect_ident("subroutine name")?;

        self.symbols.start_subroutine();
        self.labels = 0;
        if kind == SubKind::Method {
            let class_name = self.class_name.clone();
            self.symbols.define("this", &class_name, Kind::Argument)?;
        }

        expect!(self.tokens, Symbol('('), "'('")?;
        self.compile_parameter_list()?;
        expect!(self.tokens, Symbol(')'), "')'")?;
        self.compile_subroutine_body(kind, &name)?;
        self.leave(Rule::SubroutineDec);
        Ok(())
    }

    /// parameterList = [ type ident { "," type ident } ]
    fn compile_parameter_list(&mut self) -> Result<(), Error> {
        self.enter(Rule::ParameterList);
        if !check!(self.tokens, Symbol(')')) {
            loop {
                let ty = self.compile_type(false)?;
                let (name, pos) = self.expect_ident("parameter name")?;
                self.define(&name, &ty, Kind::Argument, pos)?;
                if optional!(self.tokens, Symbol(',')).is_none() {
                    break;
                }
            }
        }
        self.leave(Rule::ParameterList);
        Ok(())
    }

    /// subroutineBody = "{" { varDec } statements "}"
    fn compile_subroutine_body(&mut self, kind: SubKind, name: &str) -> Result<(), Error> {
        self.enter(Rule::SubroutineBody);
        expect!(self.tokens, Symbol('{'), "'{'")?;
        while check!(self.tokens, Keyword(Kw::Var)) {
            self.compile_var_dec()?;
        }

        // The local count is only known once every varDec has been read
        let locals = self.symbols.var_count(Kind::Local);
        let full_name = format!("{}.{}", self.class_name, name);
        self.writer.function(&full_name, locals);
        match kind {
            SubKind::Constructor => {
                let fields = self.symbols.var_count(Kind::Field);
                self.writer.push(Segment::Constant, fields);
                self.writer.call("Memory.alloc", 1);
                self.writer.pop(Segment::Pointer, 0);
            }
            SubKind::Method => {
                self.writer.push(Segment::Argument, 0);
                self.writer.pop(Segment::Pointer, 0);
            }
            SubKind::Function => {}
        }

        self.compile_statements()?;
        expect!(self.tokens, Symbol('}'), "'}'")?;
        if !ends_with_return(&self.writer) {
            self.writer.push(Segment::Constant, 0);
            self.writer.ret();
        }
        self.leave(Rule::SubroutineBody);
        Ok(())
    }

    /// varDec = "var" type ident { "," ident } ";"
    fn compile_var_dec(&mut self) -> Result<(), Error> {
        self.enter(Rule::VarDec);
        expect!(self.tokens, Keyword(Kw::Var), "keyword `var`")?;
        let ty = self.compile_type(false)?;
        self.compile_var_names(&ty, Kind::Local)?;
        expect!(self.tokens, Symbol(';'), "';'")?;
        self.leave(Rule::VarDec);
        Ok(())
    }

    /// type = "int" | "char" | "boolean" | ident
    fn compile_type(&mut self, allow_void: bool) -> Result<String, Error> {
        let what = if allow_void { "type or `void`" } else { "type" };
        let token = self.tokens.expect_tobe(
            |token| match token.kind {
                Keyword(Kw::Int | Kw::Char | Kw::Boolean) | Ident(_) => true,
                Keyword(Kw::Void) => allow_void,
                _ => false,
            },
            what,
        )?;
        Ok(match token.kind {
            Ident(name) => name,
            kind => kind.lexeme(),
        })
    }

    // ident { "," ident }
    fn compile_var_names(&mut self, ty: &str, kind: Kind) -> Result<(), Error> {
        loop {
            let (name, pos) = self.expect_ident("variable name")?;
            self.define(&name, ty, kind, pos)?;
            if optional!(self.tokens, Symbol(',')).is_none() {
                return Ok(());
            }
        }
    }
}

fn ends_with_return(writer: &Writer) -> bool {
    writer.last().map_or(false, |inst| inst.is_return())
}
