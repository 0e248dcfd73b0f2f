use std::io::BufRead;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, COMMENT_PLACEHOLDER, RESERVED_LOOKUP};

/// Receives the matched lexeme and must advance the cursor past (part of) it.
pub type RegexHandler = fn(&mut Lexer, &str);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // First match wins. Two-character operators come before their
    // one-character prefixes, so relational precedes logic and arithmetic.
    static ref NORMAL_PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^/\*").unwrap(), handler: comment_open_handler },
        RegexPattern { regex: Regex::new(r"^\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"^[0-9]+\.[0-9]+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ConstantFloat) },
        RegexPattern { regex: Regex::new(r"^[0-9]+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ConstantInt) },
        RegexPattern { regex: Regex::new(r"^'[^'\r\n]*'").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StringLiteral) },
        RegexPattern { regex: Regex::new(r"^(==|!=|<=|>=|<|>)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RelationalOp) },
        RegexPattern { regex: Regex::new(r"^(&&|\|\||!)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LogicOp) },
        RegexPattern { regex: Regex::new(r"^[+\-*/=]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ArithOp) },
        RegexPattern { regex: Regex::new(r"^[(),{}\[\];]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Separator) },
    ];

    static ref COMMENT_PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^/\*").unwrap(), handler: comment_open_handler },
        RegexPattern { regex: Regex::new(r"^\*/").unwrap(), handler: comment_close_handler },
        RegexPattern { regex: Regex::new(r#"^"([^\\\r\n]|\\.)*?""#).unwrap(), handler: comment_body_handler },
        RegexPattern { regex: Regex::new(r"^'([^\\\r\n]|\\.)*?'").unwrap(), handler: comment_body_handler },
        RegexPattern { regex: Regex::new(r#"^[^\s'"]+"#).unwrap(), handler: comment_word_handler },
        RegexPattern { regex: Regex::new(r"^\s+").unwrap(), handler: comment_whitespace_handler },
    ];
}

/// Events that move the scanner between normal and comment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentEvent {
    Opener(Position),
    Closer,
    Newlines(u32),
}

/// A block comment that has just been balanced back to nesting level 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedComment {
    pub start: Position,
    pub newlines: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    #[default]
    Normal,
    InComment {
        level: u32,
        start: Position,
        newlines: u32,
    },
}

impl ScanMode {
    /// Applies `event`, returning the next mode and the finished comment when
    /// the outermost closer was seen.
    pub fn transition(self, event: CommentEvent) -> (ScanMode, Option<ClosedComment>) {
        match (self, event) {
            (ScanMode::Normal, CommentEvent::Opener(start)) => (
                ScanMode::InComment { level: 1, start, newlines: 0 },
                None,
            ),
            (ScanMode::Normal, _) => (ScanMode::Normal, None),
            (ScanMode::InComment { level, start, newlines }, CommentEvent::Opener(_)) => (
                ScanMode::InComment { level: level + 1, start, newlines },
                None,
            ),
            (ScanMode::InComment { level, start, newlines }, CommentEvent::Closer) => {
                if level <= 1 {
                    (ScanMode::Normal, Some(ClosedComment { start, newlines }))
                } else {
                    (ScanMode::InComment { level: level - 1, start, newlines }, None)
                }
            }
            (ScanMode::InComment { level, start, newlines }, CommentEvent::Newlines(n)) => (
                ScanMode::InComment { level, start, newlines: newlines + n },
                None,
            ),
        }
    }

    pub fn nesting_level(&self) -> u32 {
        match self {
            ScanMode::Normal => 0,
            ScanMode::InComment { level, .. } => *level,
        }
    }
}

/// The outcome of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Error>,
}

impl Analysis {
    pub fn pairs(&self) -> Vec<(TokenKind, &str)> {
        self.tokens.iter().map(Token::pair).collect()
    }
}

/// Scanner state for a single run. Cursor is reset for every line fed in;
/// the mode and line counter carry over so comments may span lines.
#[derive(Debug, Clone)]
pub struct Lexer {
    mode: ScanMode,
    tokens: Vec<Token>,
    diagnostics: Vec<Error>,
    line: u32,
    pos: usize,
}

impl Default for Lexer {
    fn default() -> Self {
        Lexer::new()
    }
}

impl Lexer {
    pub fn new() -> Lexer {
        Lexer {
            mode: ScanMode::Normal,
            tokens: vec![],
            diagnostics: vec![],
            line: 1,
            pos: 0,
        }
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn position(&self) -> Position {
        Position { line: self.line, column: self.pos as u32 + 1 }
    }

    /// Span of `lexeme` if it starts at the cursor.
    pub fn span_of(&self, lexeme: &str) -> Span {
        let start = self.position();
        Span {
            start,
            end: Position { line: start.line, column: start.column + lexeme.len() as u32 },
        }
    }

    fn apply(&mut self, event: CommentEvent) -> Option<ClosedComment> {
        let (mode, closed) = self.mode.transition(event);
        self.mode = mode;
        closed
    }

    /// Scans one line of input until its text is exhausted. `text` is a
    /// single line, ending in at most one line break.
    pub fn feed_line(&mut self, text: &str) {
        self.pos = 0;

        while self.pos < text.len() {
            let remaining = &text[self.pos..];
            let patterns = match self.mode {
                ScanMode::Normal => NORMAL_PATTERNS.as_slice(),
                ScanMode::InComment { .. } => COMMENT_PATTERNS.as_slice(),
            };

            let matched = patterns
                .iter()
                .find_map(|pattern| pattern.regex.find(remaining).map(|m| (pattern.handler, m.as_str())));

            match matched {
                Some((handler, lexeme)) => handler(self, lexeme),
                None => self.reject(remaining),
            }
        }
    }

    fn reject(&mut self, remaining: &str) {
        let Some(character) = remaining.chars().next() else {
            return;
        };

        if let ScanMode::Normal = self.mode {
            let position = self.position();
            debug!(%character, line = position.line, column = position.column, "illegal character");
            self.diagnostics.push(Error::new(ErrorImpl::IllegalCharacter { character }, position));
        }

        self.advance_n(character.len_utf8());
    }

    /// Ends the run. An unterminated comment is dropped without a token.
    pub fn finish(self) -> Analysis {
        if let ScanMode::InComment { level, start, .. } = self.mode {
            debug!(level, line = start.line, column = start.column, "unterminated comment dropped");
        }

        Analysis { tokens: self.tokens, diagnostics: self.diagnostics }
    }
}

// `\r\n`, `\r` and `\n` each end one line.
fn count_line_breaks(text: &str) -> u32 {
    let crlf = text.matches("\r\n").count();
    (text.matches('\n').count() + text.matches('\r').count() - crlf) as u32
}

fn skip_handler(lexer: &mut Lexer, lexeme: &str) {
    lexer.line += count_line_breaks(lexeme);
    lexer.advance_n(lexeme.len());
}

fn symbol_handler(lexer: &mut Lexer, lexeme: &str) {
    let kind = if RESERVED_LOOKUP.contains(lexeme) {
        TokenKind::Keyword
    } else {
        TokenKind::Identifier
    };

    let span = lexer.span_of(lexeme);
    lexer.push(MK_TOKEN!(kind, String::from(lexeme), span));
    lexer.advance_n(lexeme.len());
}

fn comment_open_handler(lexer: &mut Lexer, lexeme: &str) {
    let start = lexer.position();
    lexer.apply(CommentEvent::Opener(start));
    debug!(level = lexer.mode.nesting_level(), line = start.line, column = start.column, "comment opened");
    lexer.advance_n(lexeme.len());
}

fn comment_close_handler(lexer: &mut Lexer, lexeme: &str) {
    lexer.advance_n(lexeme.len());

    if let Some(closed) = lexer.apply(CommentEvent::Closer) {
        lexer.line += closed.newlines;
        let end = lexer.position();
        debug!(line = end.line, lines_spanned = closed.newlines, "comment closed");
        lexer.push(MK_TOKEN!(
            TokenKind::Comment,
            String::from(COMMENT_PLACEHOLDER),
            Span { start: closed.start, end }
        ));
    }
}

fn comment_body_handler(lexer: &mut Lexer, lexeme: &str) {
    lexer.advance_n(lexeme.len());
}

// A word glued to an opener or closer ("end*/") stops right before it.
fn comment_word_handler(lexer: &mut Lexer, lexeme: &str) {
    let cut = [lexeme.find("/*"), lexeme.find("*/")]
        .into_iter()
        .flatten()
        .filter(|&at| at > 0)
        .min()
        .unwrap_or(lexeme.len());

    lexer.advance_n(cut);
}

fn comment_whitespace_handler(lexer: &mut Lexer, lexeme: &str) {
    let newlines = count_line_breaks(lexeme);
    lexer.apply(CommentEvent::Newlines(newlines));
    lexer.advance_n(lexeme.len());
}

/// Runs a fresh lexer over `lines`, which should keep their line endings.
pub fn tokenize_lines<'a, I>(lines: I) -> Analysis
where
    I: IntoIterator<Item = &'a str>,
{
    let mut lex = Lexer::new();

    for line in lines {
        lex.feed_line(line);
    }

    lex.finish()
}

/// Splits `source` after every `\r\n`, `\r` or `\n`, keeping the endings.
pub fn split_lines(source: &str) -> impl Iterator<Item = &str> {
    let mut rest = source;

    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        let end = match rest.find(['\r', '\n']) {
            Some(at) if rest[at..].starts_with("\r\n") => at + 2,
            Some(at) => at + 1,
            None => rest.len(),
        };

        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}

pub fn tokenize(source: &str) -> Analysis {
    tokenize_lines(split_lines(source))
}

/// Streams lines from `reader`. Only read failures are errors.
pub fn tokenize_reader<R: BufRead>(mut reader: R) -> std::io::Result<Analysis> {
    let mut lex = Lexer::new();
    let mut line = String::new();

    while reader.read_line(&mut line)? > 0 {
        for part in split_lines(&line) {
            lex.feed_line(part);
        }
        line.clear();
    }

    Ok(lex.finish())
}
