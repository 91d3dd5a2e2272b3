//! Blanket - a tiny expression language
//!
//! Source text is lexed into tokens, parsed into an expression tree and
//! evaluated directly against a persistent [`Session`].
//!
//! ```
//! let mut session = blanket::Session::new();
//! blanket::run(&mut session, "sclr x = 2 ^ 3").unwrap();
//! let value = blanket::run(&mut session, "if x > 5 then x else 0").unwrap();
//! assert_eq!(value.map(|v| v.number), Some(8.0));
//! ```

pub mod token;
pub mod lexer;
pub mod parser;
pub mod ast;
pub mod value;
pub mod context;
pub mod interpreter;
pub mod session;
pub mod error;

pub use context::{Context, SymbolTable};
pub use error::{BlanketError, ErrorCategory, ErrorKind, Result};
pub use interpreter::Interpreter;
pub use lexer::Lexer;
pub use parser::Parser;
pub use session::Session;
pub use value::Value;

/// Evaluate one piece of source in `session`
pub fn run(session: &mut Session, source: &str) -> Result<Option<Value>> {
    session.evaluate(source)
}

/// Version of the Blanket language
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
