pub mod ast;
pub mod callable;
pub mod diagnostic;
pub mod environment;
pub mod error;
#[allow(clippy::module_inception)]
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod value;
