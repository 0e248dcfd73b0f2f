#![allow(clippy::module_inception)]

use std::{
    fmt::Display,
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use crate::{
    errors::errors::{AnalyzeError, Error, ErrorTip},
    lexer::{
        lexer::{split_lines, tokenize_reader, Analysis},
        tokens::Token,
    },
};

pub mod errors;
pub mod lexer;
pub mod macros;

extern crate regex;

/// 1-based line and column; the column counts bytes within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Tokenizes the file at `path`. Only an unreadable file is an error;
/// lexical problems are returned as diagnostics.
pub fn analyze_file(path: &Path) -> Result<Analysis, AnalyzeError> {
    let io_error = |source: io::Error| AnalyzeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    tokenize_reader(BufReader::new(file)).map_err(io_error)
}

/// Renders tokens as a list of `('KIND', 'lexeme')` tuples.
pub fn format_pairs(tokens: &[Token]) -> String {
    let items = tokens
        .iter()
        .map(|token| token.to_string())
        .collect::<Vec<String>>();

    format!("[{}]", items.join(", "))
}

/// Line texts of `source` without their endings, split the same way the
/// lexer splits them so `source_lines(..)[line - 1]` matches a `Position`.
pub fn source_lines(source: &str) -> Vec<&str> {
    split_lines(source)
        .map(|line| line.trim_end_matches(['\r', '\n']))
        .collect()
}

/// Returns the text of `line` (1-based), or an empty string past the end.
pub fn get_line_at_position<'a>(lines: &[&'a str], line: u32) -> &'a str {
    (line as usize)
        .checked_sub(1)
        .and_then(|index| lines.get(index).copied())
        .unwrap_or_default()
}

pub fn render_diagnostic(error: &Error, file: &Path, line_text: &str) -> String {
    /*
        Error: Illegal character '@'
        -> input.cminus
           |
         3 | int a = @;
           | --------^
    */

    let position = error.get_position();
    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_kind()));
    } else {
        out.push_str(&format!("Error: {} ({})\n", error.get_kind(), error.get_tip()));
    }
    out.push_str(&format!("-> {}:{}\n", file.to_string_lossy(), position));
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = (position.column as usize).saturating_sub(removed_whitespace).max(1);
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let start = string.len() - string.trim_start_matches([' ', '\t']).len();
    (&string[start..], start)
}
