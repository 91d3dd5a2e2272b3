//! Error types for Blanket
//!
//! Every pipeline stage reports failures as a [`BlanketError`]. Errors carry
//! the span of the offending source; runtime errors additionally carry a
//! traceback captured from the execution context chain.

use crate::token::{Position, Span};
use std::fmt;

/// Error kinds in Blanket
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    // Lexer errors
    IllegalCharacter(char),
    BadFloat,
    BadComparator(String),

    // Parser errors
    Expected(String),
    NestingTooDeep(usize),
    TooManyOperators(usize),

    // Runtime errors
    UndefinedVariable(String),
    DivisionByZero,
    NoValue,
    EvaluationTooDeep(usize),
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::IllegalCharacter(_) | ErrorKind::BadFloat | ErrorKind::BadComparator(_) => {
                ErrorCategory::InvalidToken
            }
            ErrorKind::Expected(_)
            | ErrorKind::NestingTooDeep(_)
            | ErrorKind::TooManyOperators(_) => ErrorCategory::Syntax,
            ErrorKind::UndefinedVariable(_)
            | ErrorKind::DivisionByZero
            | ErrorKind::NoValue
            | ErrorKind::EvaluationTooDeep(_) => ErrorCategory::Runtime,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::IllegalCharacter(c) => write!(f, "Illegal character '{}'", c),
            ErrorKind::BadFloat => write!(f, "Bad Float"),
            ErrorKind::BadComparator(s) => write!(f, "Bad Comparator '{}'", s),
            ErrorKind::Expected(what) => write!(f, "Expected {}", what),
            ErrorKind::NestingTooDeep(limit) => {
                write!(f, "Expression nested deeper than {} levels", limit)
            }
            ErrorKind::TooManyOperators(limit) => {
                write!(f, "Expression has more than {} operators", limit)
            }
            ErrorKind::UndefinedVariable(name) => write!(f, "{} is not defined", name),
            ErrorKind::DivisionByZero => write!(f, "Division by zero"),
            ErrorKind::NoValue => write!(f, "Expression produced no value"),
            ErrorKind::EvaluationTooDeep(limit) => {
                write!(f, "Evaluation nested deeper than {} levels", limit)
            }
        }
    }
}

/// The three families of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidToken,
    Syntax,
    Runtime,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::InvalidToken => write!(f, "Invalid Token"),
            ErrorCategory::Syntax => write!(f, "Syntax Error"),
            ErrorCategory::Runtime => write!(f, "Runtime Error"),
        }
    }
}

/// One entry of a runtime traceback
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub label: String,
    /// Where execution was inside this frame, if known
    pub position: Option<Position>,
}

/// A Blanket error with location information
#[derive(Debug, Clone)]
pub struct BlanketError {
    pub kind: ErrorKind,
    pub span: Span,
    /// Outermost frame first; empty for lexer and parser errors
    pub traceback: Vec<Frame>,
    pub source_name: Option<String>,
    pub source_line: Option<String>,
}

impl BlanketError {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            traceback: Vec::new(),
            source_name: None,
            source_line: None,
        }
    }

    /// A runtime error with a captured traceback
    pub fn runtime(kind: ErrorKind, span: Span, traceback: Vec<Frame>) -> Self {
        Self {
            traceback,
            ..Self::new(kind, span)
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn is_runtime(&self) -> bool {
        self.category() == ErrorCategory::Runtime
    }

    /// Attach the name and offending line of the source the error came from
    pub fn with_source(mut self, name: &str, source: &str) -> Self {
        self.source_name = Some(name.to_string());
        let line = self.span.start.line;
        if line > 0 {
            self.source_line = source.lines().nth(line - 1).map(str::to_string);
        }
        self
    }

    /// The offending source line with a caret under the error column
    pub fn excerpt(&self) -> Option<String> {
        let line = self.source_line.as_ref()?;
        let column = self.span.start.column.saturating_sub(1);
        Some(format!("  | {}\n  | {}^", line, " ".repeat(column)))
    }
}

impl fmt::Display for BlanketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_runtime() {
            let name = self.source_name.as_deref().unwrap_or("<unknown>");
            writeln!(f, "Traceback (most recent call last):")?;
            for frame in &self.traceback {
                match frame.position {
                    Some(pos) => {
                        writeln!(f, "  File {}, line {}, in {}", name, pos.line, frame.label)?
                    }
                    None => writeln!(f, "  File {}, in {}", name, frame.label)?,
                }
            }
        }
        write!(
            f,
            "{}: {} ({})",
            self.category(),
            self.kind,
            self.span.start
        )
    }
}

impl std::error::Error for BlanketError {}

/// Result type for Blanket operations
pub type Result<T> = std::result::Result<T, BlanketError>;
