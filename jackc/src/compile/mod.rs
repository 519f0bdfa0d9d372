mod class;
mod expr;
mod stmt;

use vmcode::{Inst, Writer};

use crate::{
    error::{Error, TokenInfo},
    expect,
    grammer::{
        stream::TokenStream,
        token::{Pos, TokenKind::Ident},
    },
    symbols::{Kind, Symbol, SymbolTable},
    trace::{Hook, Rule},
};

/// VM code of one compiled class.
#[derive(Debug, Clone)]
pub struct Class {
    pub name: String,
    /// Statics and fields, in declaration order
    pub symbols: Vec<Symbol>,
    pub insts: Vec<Inst>,
}

/// Single-pass parser and code generator for one unit.
/// Owns every piece of per-unit state; nothing is shared between units.
pub struct Compiler<'h> {
    tokens: TokenStream,
    symbols: SymbolTable,
    writer: Writer,
    class_name: String,
    labels: usize,
    strict: bool,
    hook: Option<&'h mut dyn Hook>,
}

impl<'h> Compiler<'h> {
    pub fn new(tokens: TokenStream) -> Self {
        Self {
            tokens,
            symbols: SymbolTable::new(),
            writer: Writer::new(),
            class_name: String::new(),
            labels: 0,
            strict: false,
            hook: None,
        }
    }

    /// Reject a name declared twice in one scope.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn hook(mut self, hook: &'h mut dyn Hook) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn compile(mut self) -> Result<Class, Error> {
        self.compile_class()?;
        if let Some(token) = self.tokens.peek() {
            return Err(Error::TrailingToken(token.into()));
        }
        Ok(Class {
            name: self.class_name,
            symbols: self.symbols.class_symbols().cloned().collect(),
            insts: self.writer.into_insts(),
        })
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'h> Compiler<'h> {
    fn enter(&mut self, rule: Rule) {
        if let Some(hook) = self.hook.as_deref_mut() {
            hook.enter(rule);
        }
    }

    fn leave(&mut self, rule: Rule) {
        if let Some(hook) = self.hook.as_deref_mut() {
            hook.leave(rule);
        }
    }

    fn fresh_label(&mut self, prefix: &str) -> String {
        let label = format!("{}_{}", prefix, self.labels);
        self.labels += 1;
        label
    }

    fn define(&mut self, name: &str, ty: &str, kind: Kind, pos: Pos) -> Result<(), Error> {
        if self.strict && self.symbols.is_defined_in_scope(name, kind) {
            return Err(Error::Redeclared {
                name: name.to_string(),
                pos: Some(pos),
            });
        }
        self.symbols
            .define(name, ty, kind)
            .map_err(|e| e.located(pos))
    }

    fn resolve(&self, name: &str, pos: Pos) -> Result<Symbol, Error> {
        self.symbols
            .resolve(name)
            .cloned()
            .map_err(|e| e.located(pos))
    }

    fn expect_ident(&mut self, what: &str) -> Result<(String, Pos), Error> {
        let token = expect!(self.tokens, Ident(_), what)?;
        match token.kind {
            Ident(name) => Ok((name, token.pos)),
            kind => Err(Error::UnexpectedToken {
                expected: what.to_string(),
                found: TokenInfo {
                    kind,
                    pos: token.pos,
                },
            }),
        }
    }
}
