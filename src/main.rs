use std::{fs, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cminus_lexer::{
    analyze_file, format_pairs, get_line_at_position, lexer::lexer::Analysis, render_diagnostic,
    source_lines,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Lexical analyzer for the cminus language
#[derive(Parser, Debug)]
#[command(name = "cminus-lexer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tokenizes a cminus source file", long_about = None)]
struct Cli {
    /// Source file to analyze
    file: PathBuf,

    /// How tokens are printed
    #[arg(short, long, value_enum, default_value_t = OutputFormat::List)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, env = "CMINUS_VERBOSE")]
    verbose: bool,

    /// Disable color output
    #[arg(long, env = "CMINUS_NO_COLOR")]
    no_color: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// One token per line: `line:column KIND lexeme`
    List,
    /// A single list of `('KIND', 'lexeme')` tuples
    Pairs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.no_color)?;

    let start = Instant::now();
    let analysis = analyze_file(&cli.file)
        .with_context(|| format!("could not analyze {}", cli.file.display()))?;

    info!(
        tokens = analysis.tokens.len(),
        diagnostics = analysis.diagnostics.len(),
        "tokenized in {:?}",
        start.elapsed()
    );

    print_tokens(&analysis, cli.format);

    if !analysis.diagnostics.is_empty() {
        let source = fs::read_to_string(&cli.file)
            .with_context(|| format!("could not re-read {}", cli.file.display()))?;
        let lines = source_lines(&source);

        for error in &analysis.diagnostics {
            let line_text = get_line_at_position(&lines, error.get_position().line);
            eprint!("{}", render_diagnostic(error, &cli.file, line_text));
        }
    }

    Ok(())
}

fn print_tokens(analysis: &Analysis, format: OutputFormat) {
    match format {
        OutputFormat::List => {
            for token in &analysis.tokens {
                println!("{:<8} {:<15} {}", token.span.start.to_string(), token.kind.as_str(), token.value);
            }
        }
        OutputFormat::Pairs => println!("{}", format_pairs(&analysis.tokens)),
    }
}

fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .context("failed to initialize logging")?;

    Ok(())
}
