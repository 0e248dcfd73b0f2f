//! Error types for lexical analysis.
//!
//! - `Error` / `ErrorImpl`: recoverable diagnostics (illegal characters) with
//!   the position they were raised at
//! - `AnalyzeError`: fatal failures, such as an unreadable source file
//! - `ErrorTip`: optional suggestions shown alongside a diagnostic

pub mod errors;
