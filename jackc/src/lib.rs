pub mod compile;
pub mod config;
pub mod error;
pub mod grammer;
pub mod project;
pub mod symbols;
pub mod trace;
pub mod util;

pub use compile::{Class, Compiler};
pub use config::Config;
pub use error::Error;
pub use grammer::lexer::Lexer;
pub use grammer::stream::TokenStream;
pub use symbols::{Kind, Symbol, SymbolTable};

/// Scan a whole unit up front.
pub fn tokenize(code: &str) -> Result<TokenStream, Error> {
    Ok(TokenStream::new(Lexer::new(code).parse()?))
}

/// Compile one class with the default, last-definition-wins policy.
pub fn compile(code: &str) -> Result<Class, Error> {
    Compiler::new(tokenize(code)?).compile()
}
