use thiserror::Error;
use crate::interpreter::lexer::Token;

/// An error that aborts interpretation. Each variant keeps the token whose
/// evaluation failed so the driver can report its line.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{message}")]
    TypeMismatch {
        token: Token,
        message: &'static str,
    },
    #[error("Undefined variable '{name}'.")]
    UndefinedVariable {
        token: Token,
        name: String,
    },
    #[error("Can only call functions.")]
    NotCallable {
        token: Token,
    },
    #[error("Expected {expected} arguments but got {got}.")]
    ArityMismatch {
        token: Token,
        expected: usize,
        got: usize,
    },
    #[error("Stack overflow.")]
    StackOverflow {
        token: Token,
    },
    #[error("Failed to write output: {source}")]
    Output {
        token: Token,
        #[source]
        source: std::io::Error,
    },
}

impl RuntimeError {
    pub fn type_mismatch(token: &Token, message: &'static str) -> RuntimeError {
        RuntimeError::TypeMismatch { token: token.clone(), message }
    }

    pub fn undefined_variable(token: &Token) -> RuntimeError {
        RuntimeError::UndefinedVariable { token: token.clone(), name: token.source().to_owned() }
    }

    pub fn token(&self) -> &Token {
        match self {
            RuntimeError::TypeMismatch { token, .. }
            | RuntimeError::UndefinedVariable { token, .. }
            | RuntimeError::NotCallable { token }
            | RuntimeError::ArityMismatch { token, .. }
            | RuntimeError::StackOverflow { token }
            | RuntimeError::Output { token, .. } => token,
        }
    }

    pub fn line(&self) -> i32 {
        self.token().line()
    }
}
