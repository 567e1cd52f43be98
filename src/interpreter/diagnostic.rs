use std::fmt::{Display, Formatter};

/// Sink for lexical and syntax errors.
///
/// `location` is either empty, ` at end`, or ` at 'lexeme'`.
pub trait Reporter {
    fn report(&mut self, line: i32, location: &str, message: &str);

    fn had_error(&self) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: i32,
    pub location: String,
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] Error{}: {}", self.line, self.location, self.message)
    }
}

/// Prints every diagnostic to stderr as soon as it is reported.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    had_error: bool,
}

impl ConsoleReporter {
    pub fn new() -> ConsoleReporter {
        ConsoleReporter::default()
    }

    /// Forgets earlier errors, so a REPL line doesn't poison the next one.
    pub fn reset(&mut self) {
        self.had_error = false;
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, line: i32, location: &str, message: &str) {
        eprintln!("[line {}] Error{}: {}", line, location, message);
        self.had_error = true;
    }

    fn had_error(&self) -> bool {
        self.had_error
    }
}

/// Collects diagnostics instead of printing them.
#[derive(Debug, Default)]
pub struct Diagnostics {
    pub entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Reporter for Diagnostics {
    fn report(&mut self, line: i32, location: &str, message: &str) {
        tracing::trace!(line, location, message, "diagnostic");

        self.entries.push(Diagnostic {
            line,
            location: location.to_owned(),
            message: message.to_owned(),
        });
    }

    fn had_error(&self) -> bool {
        !self.entries.is_empty()
    }
}
