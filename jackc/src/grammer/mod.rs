pub mod lexer;
pub mod stream;
pub mod token;
