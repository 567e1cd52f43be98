pub mod util;
pub mod interpreter;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use clap::Parser as ClapParser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use crate::interpreter::ast::Stmt;
use crate::interpreter::diagnostic::{ConsoleReporter, Reporter};
use crate::interpreter::error::RuntimeError;
use crate::interpreter::interpreter::Interpreter;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::parser::Parser;
use crate::interpreter::printer::AstPrinter;

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Script to run; starts an interactive prompt when omitted")]
    pub input: Option<PathBuf>,
    #[clap(long, help = "Print the syntax tree instead of running the program")]
    pub print_ast: bool,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum TmoxError {
    /// Lexical or syntax errors; each one has already gone to the reporter.
    #[error("The program contains syntax errors")]
    Syntax,
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TmoxError {
    pub fn exit_code(&self) -> u8 {
        match self {
            TmoxError::Syntax => 42,
            TmoxError::Runtime(_) => 75,
            TmoxError::Io(_) => 74,
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(config: &Config) -> Result<(), TmoxError> {
    match &config.input {
        Some(input) => run_file(input, config),
        None => run_prompt(),
    }
}

pub fn run_file(path: &Path, config: &Config) -> Result<(), TmoxError> {
    tracing::debug!(path = %path.to_string_lossy(), "running file");

    let source = std::fs::read_to_string(path)?;
    let mut reporter = ConsoleReporter::new();

    if config.print_ast {
        let statements = parse_source(&source, &mut reporter)?;
        let mut stdout = std::io::stdout().lock();

        AstPrinter::new(String::from("    ")).write_program(&statements, &mut stdout)?;
        stdout.flush()?;
        return Ok(());
    }

    let mut interpreter = Interpreter::new();
    run_source(&source, &mut interpreter, &mut reporter)
}

/// Reads one line at a time from stdin and runs it against a single
/// interpreter, so definitions carry over between lines. Errors are reported
/// and the session continues until EOF.
pub fn run_prompt() -> Result<(), TmoxError> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    let mut interpreter = Interpreter::new();
    let mut reporter = ConsoleReporter::new();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        reporter.reset();

        match run_source(&line, &mut interpreter, &mut reporter) {
            Ok(()) | Err(TmoxError::Syntax) => {},
            Err(TmoxError::Runtime(err)) => report_runtime_error(&err),
            Err(err @ TmoxError::Io(_)) => return Err(err),
        }
    }

    println!();
    Ok(())
}

/// Scans and parses `source`. Fails with [`TmoxError::Syntax`] if the reporter
/// saw any lexical or syntax error, in which case nothing should be executed.
pub fn parse_source(source: &str, reporter: &mut dyn Reporter) -> Result<Vec<Stmt>, TmoxError> {
    let tokens = Lexer::new(source).tokenize(reporter);

    let mut parser = Parser::new(tokens, reporter);
    let statements = parser.parse();
    let had_error = parser.had_error();

    if had_error || reporter.had_error() {
        return Err(TmoxError::Syntax);
    }

    Ok(statements)
}

pub fn run_source(source: &str, interpreter: &mut Interpreter, reporter: &mut dyn Reporter) -> Result<(), TmoxError> {
    let statements = parse_source(source, reporter)?;

    interpreter.interpret(&statements)?;
    Ok(())
}

pub fn report_runtime_error(error: &RuntimeError) {
    eprintln!("{}\n[line {}]", error, error.line());
}
