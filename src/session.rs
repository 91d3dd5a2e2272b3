//! Interpreter sessions
//!
//! A [`Session`] owns the root execution context. Bindings made by one call
//! to [`Session::evaluate`] are visible to every later call on the same
//! session.

use std::rc::Rc;

use log::{debug, trace};

use crate::context::Context;
use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::Value;

pub use crate::interpreter::DEFAULT_EVAL_DEPTH;
pub use crate::parser::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_OPERATORS};

/// Name reported for the source in tracebacks
pub const DEFAULT_SOURCE_NAME: &str = "<stdin>";

/// Label of the root context
pub const ROOT_LABEL: &str = "<program>";

/// Constants every session starts with
const BUILTINS: [(&str, f64); 3] = [("null", 0.0), ("true", 1.0), ("false", 0.0)];

/// Persistent interpreter state
#[derive(Debug)]
pub struct Session {
    root: Rc<Context>,
    source_name: String,
    max_depth: usize,
    max_operators: usize,
    max_eval_depth: usize,
}

impl Session {
    pub fn new() -> Self {
        Self {
            root: seeded_root(),
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_operators: DEFAULT_MAX_OPERATORS,
            max_eval_depth: DEFAULT_EVAL_DEPTH,
        }
    }

    pub fn with_source_name(mut self, name: &str) -> Self {
        self.source_name = name.to_string();
        self
    }

    /// Limit how deeply the parser lets expressions nest
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Limit how many infix operators one input may contain
    pub fn with_max_operators(mut self, max_operators: usize) -> Self {
        self.max_operators = max_operators;
        self
    }

    /// Limit how deeply the interpreter may recurse
    pub fn with_max_eval_depth(mut self, max_eval_depth: usize) -> Self {
        self.max_eval_depth = max_eval_depth;
        self
    }

    pub fn root(&self) -> &Rc<Context> {
        &self.root
    }

    /// Current value bound to `name`
    pub fn get(&self, name: &str) -> Option<Value> {
        self.root.lookup(name)
    }

    /// Drop every user binding, keeping only the builtin constants
    pub fn reset(&mut self) {
        debug!("resetting session");
        self.root = seeded_root();
    }

    /// Lex, parse and evaluate one piece of source.
    ///
    /// `Ok(None)` means the source evaluated to nothing (a conditional with
    /// no matching branch and no `else`). Errors come back decorated with
    /// the session's source name and the offending source line.
    pub fn evaluate(&mut self, source: &str) -> Result<Option<Value>> {
        self.pipeline(source)
            .map_err(|err| err.with_source(&self.source_name, source))
    }

    fn pipeline(&mut self, source: &str) -> Result<Option<Value>> {
        let tokens = Lexer::new(source).tokenize()?;
        debug!("lexed {} tokens", tokens.len());
        trace!("tokens: {:?}", tokens);

        let expr = Parser::with_max_depth(tokens, self.max_depth)
            .with_max_operators(self.max_operators)
            .parse()?;
        trace!("ast: {:#?}", expr);

        let mut interpreter = Interpreter::with_max_depth(self.max_eval_depth);
        let value = interpreter.evaluate(&expr, &self.root)?;
        match &value {
            Some(value) => debug!("evaluated to {}", value),
            None => debug!("evaluated to no value"),
        }

        Ok(value)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn seeded_root() -> Rc<Context> {
    let root = Context::root(ROOT_LABEL);
    for (name, number) in BUILTINS {
        root.assign(name, &Value::new(number));
    }
    root
}
