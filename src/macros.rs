//! Utility macros for the lexer.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a handler that emits the matched text as one token
//!
//! These macros reduce boilerplate in the pattern tables.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's lexeme
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::ConstantInt, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a default handler for rules whose whole match is the lexeme.
///
/// The generated handler pushes a token of the given kind carrying the
/// matched text and moves the cursor past it.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new(r"^[+\-*/=]").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::ArithOp),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr) => {
        |lexer: &mut Lexer, lexeme: &str| {
            let span = lexer.span_of(lexeme);
            lexer.push(MK_TOKEN!($kind, String::from(lexeme), span));
            lexer.advance_n(lexeme.len());
        }
    };
}
