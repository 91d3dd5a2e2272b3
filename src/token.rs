//! Token definitions for Blanket
//!
//! Tokens represent the atomic units of meaning in source code.

use std::fmt;

/// A cursor location in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset into the source
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self { index, line, column }
    }

    /// Position of the first character of a source
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Move past `ch`
    pub fn advance(&mut self, ch: char) {
        self.index += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Region of source code for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`
    pub fn point(pos: Position) -> Self {
        Self::new(pos, pos)
    }

    /// Span from the start of `self` to the end of `other`
    pub fn to(self, other: Span) -> Self {
        Self::new(self.start, other.end)
    }
}

/// Reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Sclr,   // variable assignment
    And,
    Or,
    Not,
    If,
    Then,
    Elif,
    Else,
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Keyword::Sclr => "sclr",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Not => "not",
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::Elif => "elif",
            Keyword::Else => "else",
        };
        write!(f, "{}", word)
    }
}

/// Token types in Blanket
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(f64),
    Float(f64),

    Ident(String),
    Keyword(Keyword),

    // Arithmetic
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Caret,      // ^

    // Comparison
    Equal,        // =
    EqualEqual,   // ==
    BangEqual,    // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=

    LeftParen,
    RightParen,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) | TokenKind::Float(n) => write!(f, "{}", n),
            TokenKind::Ident(s) => write!(f, "{}", s),
            TokenKind::Keyword(k) => write!(f, "{}", k),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::Equal => write!(f, "="),
            TokenKind::EqualEqual => write!(f, "=="),
            TokenKind::BangEqual => write!(f, "!="),
            TokenKind::Less => write!(f, "<"),
            TokenKind::LessEqual => write!(f, "<="),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::GreaterEqual => write!(f, ">="),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

/// A token with its kind and location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, lexeme: String) -> Self {
        Self { kind, span, lexeme }
    }
}

/// Check if a word is a keyword
pub fn lookup_keyword(ident: &str) -> Option<Keyword> {
    match ident {
        "sclr" => Some(Keyword::Sclr),
        "and" => Some(Keyword::And),
        "or" => Some(Keyword::Or),
        "not" => Some(Keyword::Not),
        "if" => Some(Keyword::If),
        "then" => Some(Keyword::Then),
        "elif" => Some(Keyword::Elif),
        "else" => Some(Keyword::Else),
        _ => None,
    }
}

/// Resolve a one or two character comparator lexeme
pub fn lookup_comparator(lexeme: &str) -> Option<TokenKind> {
    match lexeme {
        "=" => Some(TokenKind::Equal),
        "==" => Some(TokenKind::EqualEqual),
        "!=" => Some(TokenKind::BangEqual),
        "<" => Some(TokenKind::Less),
        "<=" => Some(TokenKind::LessEqual),
        ">" => Some(TokenKind::Greater),
        ">=" => Some(TokenKind::GreaterEqual),
        _ => None,
    }
}
