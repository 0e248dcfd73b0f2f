use lazy_static::lazy_static;
use std::{collections::HashSet, fmt::Display};

use crate::Span;

/// Lexeme stored on every `COMMENT` token in place of the comment text.
pub const COMMENT_PLACEHOLDER: &str = "...";

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashSet<&'static str> = {
        let mut set = HashSet::new();
        set.insert("int");
        set.insert("float");
        set.insert("if");
        set.insert("else");
        set.insert("exit");
        set.insert("while");
        set.insert("read");
        set.insert("write");
        set.insert("return");
        set
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    ConstantFloat,
    ConstantInt,
    StringLiteral,
    ArithOp,       // + - * / =
    LogicOp,       // ! && ||
    RelationalOp,  // == != <= >= < >
    Separator,     // ( ) , { } [ ] ;
    Comment,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::ConstantFloat => "CONSTANT_FLOAT",
            TokenKind::ConstantInt => "CONSTANT_INT",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::ArithOp => "ARITH_OP",
            TokenKind::LogicOp => "LOGIC_OP",
            TokenKind::RelationalOp => "RELATIONAL_OP",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::Comment => "COMMENT",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "('{}', '{}')", self.kind, self.value)
    }
}

impl Token {
    /// The `(kind, lexeme)` pair handed to the parser.
    pub fn pair(&self) -> (TokenKind, &str) {
        (self.kind, self.value.as_str())
    }
}
