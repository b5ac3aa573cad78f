//! Parser for binder template markup

pub mod ast;
pub mod entities;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::parse;
