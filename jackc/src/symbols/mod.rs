mod table;

pub use table::{Kind, Symbol, SymbolTable};
