//! Parser for Blanket
//!
//! Converts tokens into an Abstract Syntax Tree.
//!
//! Precedence, lowest first: assignment, `and`/`or`, comparison and `not`,
//! `+ -`, `* /`, prefix sign, `^`, atoms. Every infix level goes through the
//! same left-folding [`Parser::binary`] builder, so `^` is left-associative
//! like everything else: `2^3^2` is `(2^3)^2`.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{BlanketError, ErrorKind, Result};
use crate::token::{Keyword, Span, Token, TokenKind};

/// Maximum nesting of parenthesised and prefixed expressions
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Maximum number of infix operators in one input. Operator chains fold
/// into left-leaning trees, so this bounds how tall a tree can get.
pub const DEFAULT_MAX_OPERATORS: usize = 1000;

/// A syntax error together with the token index the parser had reached
/// when it was raised.
#[derive(Debug, Clone)]
pub struct Failure {
    pub error: BlanketError,
    pub reached: usize,
}

impl Failure {
    pub fn new(error: BlanketError, reached: usize) -> Self {
        Self { error, reached }
    }

    /// Keep whichever failure got further through the tokens. On a tie the
    /// candidate wins, so a failure that consumed nothing can always be
    /// replaced by a more descriptive one.
    pub fn furthest(self, candidate: Failure) -> Failure {
        if candidate.reached >= self.reached {
            candidate
        } else {
            self
        }
    }
}

type Parse<T> = std::result::Result<T, Failure>;

const ATOM_START: &str = "number, identifier, '+', '-', '(' or 'if'";
const COMPARISON_START: &str = "number, identifier, '+', '-', '(', 'if' or 'not'";
const EXPRESSION_START: &str = "'sclr', number, identifier, '+', '-', '(', 'if' or 'not'";

const LOGICAL_OPS: &[TokenKind] = &[
    TokenKind::Keyword(Keyword::And),
    TokenKind::Keyword(Keyword::Or),
];
const COMPARISON_OPS: &[TokenKind] = &[
    TokenKind::EqualEqual,
    TokenKind::BangEqual,
    TokenKind::Less,
    TokenKind::Greater,
    TokenKind::LessEqual,
    TokenKind::GreaterEqual,
];
const ADDITIVE_OPS: &[TokenKind] = &[TokenKind::Plus, TokenKind::Minus];
const MULTIPLICATIVE_OPS: &[TokenKind] = &[TokenKind::Star, TokenKind::Slash];
const POWER_OPS: &[TokenKind] = &[TokenKind::Caret];

/// The parser state
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
    max_depth: usize,
    operators: usize,
    max_operators: usize,
}

impl Parser {
    /// Create a new parser from tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_max_depth(tokens, DEFAULT_MAX_DEPTH)
    }

    /// Create a parser that rejects input nested deeper than `max_depth`
    pub fn with_max_depth(mut tokens: Vec<Token>, max_depth: usize) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let end = tokens.last().map(|t| Span::point(t.span.end)).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, end, String::new()));
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
            max_depth,
            operators: 0,
            max_operators: DEFAULT_MAX_OPERATORS,
        }
    }

    /// Reject input with more than `max_operators` infix operators
    pub fn with_max_operators(mut self, max_operators: usize) -> Self {
        self.max_operators = max_operators;
        self
    }

    /// Parse the whole token stream into one expression
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.expression().map_err(|failure| failure.error)?;

        if !self.is_at_end() {
            return Err(self.expected("operator or end of input").error);
        }

        Ok(expr)
    }

    // ==================== Expressions ====================

    fn expression(&mut self) -> Parse<Expr> {
        self.nested(|parser| {
            if parser.check_keyword(Keyword::Sclr) {
                return parser.assignment();
            }

            let start = parser.current;
            parser
                .binary(Self::comparison, LOGICAL_OPS)
                .map_err(|failure| failure.furthest(parser.expected_at(start, EXPRESSION_START)))
        })
    }

    fn assignment(&mut self) -> Parse<Expr> {
        self.advance(); // consume 'sclr'

        let (name, name_span) = match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let span = self.advance().span;
                (name, span)
            }
            _ => return Err(self.expected("identifier")),
        };

        self.expect(&TokenKind::Equal, "'='")?;

        let value = self.expression()?;
        let span = name_span.to(value.span());

        Ok(Expr::Assign {
            name,
            value: Box::new(value),
            span,
        })
    }

    fn comparison(&mut self) -> Parse<Expr> {
        if self.check_keyword(Keyword::Not) {
            let op_span = self.advance().span;
            let operand = self.nested(Self::comparison)?;
            let span = op_span.to(operand.span());
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                span,
            });
        }

        let start = self.current;
        self.binary(Self::arithmetic, COMPARISON_OPS)
            .map_err(|failure| failure.furthest(self.expected_at(start, COMPARISON_START)))
    }

    fn arithmetic(&mut self) -> Parse<Expr> {
        self.binary(Self::term, ADDITIVE_OPS)
    }

    fn term(&mut self) -> Parse<Expr> {
        self.binary(Self::factor, MULTIPLICATIVE_OPS)
    }

    fn factor(&mut self) -> Parse<Expr> {
        let op = match self.peek().kind {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.power(),
        };

        let op_span = self.advance().span;
        let operand = self.nested(Self::factor)?;
        let span = op_span.to(operand.span());

        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            span,
        })
    }

    fn power(&mut self) -> Parse<Expr> {
        self.binary(Self::atom, POWER_OPS)
    }

    fn atom(&mut self) -> Parse<Expr> {
        let token = self.peek().clone();

        match &token.kind {
            TokenKind::Int(value) | TokenKind::Float(value) => {
                self.advance();
                Ok(Expr::Number { value: *value, span: token.span })
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Variable { name: name.clone(), span: token.span })
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(&TokenKind::RightParen, "')'")?;
                Ok(expr)
            }
            TokenKind::Keyword(Keyword::If) => self.conditional(),
            _ => Err(self.expected(ATOM_START)),
        }
    }

    /// `if c then r (elif c then r)* (else e)?`, where a repeated `then` may
    /// stand in for `elif`
    fn conditional(&mut self) -> Parse<Expr> {
        let if_span = self.advance().span; // consume 'if'
        let mut cases = Vec::new();

        loop {
            let condition = self.expression()?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.expression()?;
            cases.push((condition, result));

            if !(self.match_keyword(Keyword::Elif) || self.match_keyword(Keyword::Then)) {
                break;
            }
        }

        let else_branch = if self.match_keyword(Keyword::Else) {
            Some(Box::new(self.expression()?))
        } else {
            None
        };

        let end = match (&else_branch, cases.last()) {
            (Some(branch), _) => branch.span(),
            (None, Some((_, result))) => result.span(),
            (None, None) => if_span,
        };

        Ok(Expr::Conditional {
            cases,
            else_branch,
            span: if_span.to(end),
        })
    }

    /// Left-fold `operand (op operand)*` for any operator in `ops`
    fn binary(&mut self, operand: fn(&mut Self) -> Parse<Expr>, ops: &[TokenKind]) -> Parse<Expr> {
        let mut left = operand(self)?;

        while let Some(op) = self.match_operator(ops) {
            self.count_operator()?;
            let right = operand(self)?;
            let span = left.span().to(right.span());
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    // ==================== Helpers ====================

    /// Run `parse` one nesting level deeper
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Parse<T>) -> Parse<T> {
        if self.depth >= self.max_depth {
            let error = BlanketError::new(ErrorKind::NestingTooDeep(self.max_depth), self.peek().span);
            return Err(Failure::new(error, self.current));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn count_operator(&mut self) -> Parse<()> {
        if self.operators >= self.max_operators {
            let span = self.tokens[self.current - 1].span;
            let error = BlanketError::new(ErrorKind::TooManyOperators(self.max_operators), span);
            return Err(Failure::new(error, self.current));
        }

        self.operators += 1;
        Ok(())
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        let index = self.current;
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[index]
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek().kind == TokenKind::Keyword(keyword)
    }

    fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_operator(&mut self, ops: &[TokenKind]) -> Option<BinaryOp> {
        if !ops.contains(&self.peek().kind) {
            return None;
        }
        let op = BinaryOp::from_token(&self.peek().kind)?;
        self.advance();
        Some(op)
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Parse<&Token> {
        if &self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.expected(what))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Parse<()> {
        if self.match_keyword(keyword) {
            Ok(())
        } else {
            Err(self.expected(&format!("'{}'", keyword)))
        }
    }

    fn expected(&self, what: &str) -> Failure {
        self.expected_at(self.current, what)
    }

    fn expected_at(&self, index: usize, what: &str) -> Failure {
        let error = BlanketError::new(ErrorKind::Expected(what.to_string()), self.tokens[index].span);
        Failure::new(error, index)
    }
}
