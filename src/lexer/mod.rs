//! Lexical analysis for cminus.
//!
//! Converts source text into an ordered stream of `(kind, lexeme)` tokens:
//!
//! - Ordered regex pattern tables, first match wins
//! - Keyword lookup over the maximal identifier-shaped word
//! - Nested block comments via an explicit comment scanning mode
//! - Illegal characters reported and skipped without halting

pub mod lexer;
pub mod tokens;
