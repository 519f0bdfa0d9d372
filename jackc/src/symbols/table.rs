use indexmap::IndexMap;
use strum::{Display, EnumString};
use vmcode::Segment;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    Static,
    Field,
    Argument,
    Local,
}

impl Kind {
    /// Memory segment backing variables of this kind.
    pub fn segment(&self) -> Segment {
        match self {
            Kind::Static => Segment::Static,
            Kind::Field => Segment::This,
            Kind::Argument => Segment::Argument,
            Kind::Local => Segment::Local,
        }
    }

    fn is_class_scope(&self) -> bool {
        matches!(self, Kind::Static | Kind::Field)
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: String,
    pub kind: Kind,
    pub index: u16,
}

impl Symbol {
    pub fn segment(&self) -> Segment {
        self.kind.segment()
    }
}

/// Two-level scope: class scope lives for the whole unit,
/// subroutine scope is reset by `start_subroutine`.
#[derive(Debug, Default)]
pub struct SymbolTable {
    class: IndexMap<String, Symbol>,
    sub: IndexMap<String, Symbol>,
    counts: [u16; 4],
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_subroutine(&mut self) {
        self.sub.clear();
        self.counts[Kind::Argument.slot()] = 0;
        self.counts[Kind::Local.slot()] = 0;
    }

    /// Re-defining a name in the same scope replaces the entry;
    /// the index the old entry held stays consumed.
    /// Fails once a kind has used up every `u16` index.
    pub fn define(&mut self, name: &str, ty: &str, kind: Kind) -> Result<(), Error> {
        let index = self.counts[kind.slot()];
        self.counts[kind.slot()] = index.checked_add(1).ok_or_else(|| Error::TooMany {
            what: format!("{} variables", kind),
            name: name.to_string(),
            pos: None,
        })?;
        let symbol = Symbol {
            name: name.to_string(),
            ty: ty.to_string(),
            kind,
            index,
        };
        let scope = if kind.is_class_scope() {
            &mut self.class
        } else {
            &mut self.sub
        };
        scope.insert(name.to_string(), symbol);
        Ok(())
    }

    pub fn var_count(&self, kind: Kind) -> u16 {
        self.counts[kind.slot()]
    }

    /// Whether the scope `kind` would be stored in already holds `name`.
    pub fn is_defined_in_scope(&self, name: &str, kind: Kind) -> bool {
        if kind.is_class_scope() {
            self.class.contains_key(name)
        } else {
            self.sub.contains_key(name)
        }
    }

    /// Subroutine scope shadows class scope.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.sub.get(name).or_else(|| self.class.get(name))
    }

    pub fn resolve(&self, name: &str) -> Result<&Symbol, Error> {
        self.lookup(name).ok_or_else(|| Error::UndefinedSymbol {
            name: name.to_string(),
            pos: None,
        })
    }

    pub fn kind_of(&self, name: &str) -> Result<Kind, Error> {
        self.resolve(name).map(|s| s.kind)
    }

    pub fn type_of(&self, name: &str) -> Result<&str, Error> {
        self.resolve(name).map(|s| s.ty.as_str())
    }

    pub fn index_of(&self, name: &str) -> Result<u16, Error> {
        self.resolve(name).map(|s| s.index)
    }

    pub fn class_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.class.values()
    }
}
