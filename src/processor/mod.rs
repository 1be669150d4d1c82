//! The parser half of the converter.
//!
//! Pseudo-code text goes in, a `ParsedCode` comes out. Line lexing lives
//! in `lexer`, the line grammar in `rules`, block nesting in `scope`, and
//! `script_parser` ties them together.
pub mod ast;
pub mod lexer;
pub mod rules;
pub mod scope;
pub mod script_parser;

pub use ast::Action;
pub use script_parser::parse_pseudo_code;
