//! Lexer for Blanket
//!
//! Converts source code into a stream of tokens.

use crate::error::{BlanketError, ErrorKind, Result};
use crate::token::{lookup_comparator, lookup_keyword, Position, Span, Token, TokenKind};

/// The lexer state
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    pos: Position,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer from source code
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            pos: Position::start(),
        }
    }

    /// Tokenize the entire source
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        tokens.push(Token::new(TokenKind::Eof, Span::point(self.pos), String::new()));

        Ok(tokens)
    }

    /// Get the next token
    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();

        let Some(ch) = self.peek_char() else {
            return Ok(None);
        };

        let start = self.pos;

        let kind = match ch {
            '+' => { self.advance(); TokenKind::Plus }
            '-' => { self.advance(); TokenKind::Minus }
            '*' => { self.advance(); TokenKind::Star }
            '/' => { self.advance(); TokenKind::Slash }
            '^' => { self.advance(); TokenKind::Caret }
            '(' => { self.advance(); TokenKind::LeftParen }
            ')' => { self.advance(); TokenKind::RightParen }

            c if c.is_ascii_digit() => self.scan_number()?,
            c if c.is_ascii_alphabetic() => self.scan_identifier(),
            c if is_comparator_char(c) => self.scan_comparator()?,

            _ => {
                self.advance();
                return Err(BlanketError::new(
                    ErrorKind::IllegalCharacter(ch),
                    Span::new(start, self.pos),
                ));
            }
        };

        let lexeme = self.source[start.index..self.pos.index].to_string();

        Ok(Some(Token::new(kind, Span::new(start, self.pos), lexeme)))
    }

    /// Advance and return the current character
    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.pos.advance(ch);
        Some(ch)
    }

    /// Peek at the next character without advancing
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek_char() {
            self.advance();
        }
    }

    /// Scan an integer or float literal
    fn scan_number(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        let mut seen_dot = false;

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' {
                if seen_dot {
                    let dot = self.pos;
                    self.advance();
                    return Err(BlanketError::new(ErrorKind::BadFloat, Span::new(dot, self.pos)));
                }
                seen_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start.index..self.pos.index];
        let value = text
            .parse::<f64>()
            .map_err(|_| BlanketError::new(ErrorKind::BadFloat, Span::new(start, self.pos)))?;
        if seen_dot {
            Ok(TokenKind::Float(value))
        } else {
            Ok(TokenKind::Int(value))
        }
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos.index;

        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphabetic() {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.pos.index];

        match lookup_keyword(text) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Ident(text.to_string()),
        }
    }

    /// Scan a one or two character comparator
    fn scan_comparator(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        self.advance();
        if self.peek_char().is_some_and(is_comparator_char) {
            self.advance();
        }

        let lexeme = &self.source[start.index..self.pos.index];
        lookup_comparator(lexeme).ok_or_else(|| {
            BlanketError::new(
                ErrorKind::BadComparator(lexeme.to_string()),
                Span::new(start, self.pos),
            )
        })
    }
}

fn is_comparator_char(c: char) -> bool {
    matches!(c, '>' | '<' | '=' | '!')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Keyword;

    fn tokenize(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        lexer.tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !matches!(k, TokenKind::Eof))
            .collect()
    }

    fn lex_error(source: &str) -> BlanketError {
        Lexer::new(source).tokenize().unwrap_err()
    }

    #[test]
    fn test_keywords() {
        let tokens = tokenize("sclr and or not if then elif else");
        assert_eq!(tokens, vec![
            TokenKind::Keyword(Keyword::Sclr),
            TokenKind::Keyword(Keyword::And),
            TokenKind::Keyword(Keyword::Or),
            TokenKind::Keyword(Keyword::Not),
            TokenKind::Keyword(Keyword::If),
            TokenKind::Keyword(Keyword::Then),
            TokenKind::Keyword(Keyword::Elif),
            TokenKind::Keyword(Keyword::Else),
        ]);
    }

    #[test]
    fn test_operators() {
        let tokens = tokenize("+ - * / ^ ( ) = == != < <= > >=");
        assert_eq!(tokens, vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Caret,
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::Equal,
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
            TokenKind::Greater,
            TokenKind::GreaterEqual,
        ]);
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("42 3.14 0 100.0 7.");
        assert_eq!(tokens, vec![
            TokenKind::Int(42.0),
            TokenKind::Float(3.14),
            TokenKind::Int(0.0),
            TokenKind::Float(100.0),
            TokenKind::Float(7.0),
        ]);
    }

    #[test]
    fn test_number_values_keep_every_digit() {
        let tokens = tokenize("007 0.50 123456789012");
        assert_eq!(tokens, vec![
            TokenKind::Int(7.0),
            TokenKind::Float(0.5),
            TokenKind::Int(123456789012.0),
        ]);
    }

    #[test]
    fn test_identifiers_are_letters_only() {
        let tokens = tokenize("foo x1 a");
        assert_eq!(tokens, vec![
            TokenKind::Ident("foo".to_string()),
            TokenKind::Ident("x".to_string()),
            TokenKind::Int(1.0),
            TokenKind::Ident("a".to_string()),
        ]);
        assert!(matches!(lex_error("a_b").kind, ErrorKind::IllegalCharacter('_')));
    }

    #[test]
    fn test_comparators_without_spaces() {
        let tokens = tokenize("x>=1");
        assert_eq!(tokens, vec![
            TokenKind::Ident("x".to_string()),
            TokenKind::GreaterEqual,
            TokenKind::Int(1.0),
        ]);
    }

    #[test]
    fn test_bad_float() {
        let err = lex_error("1.2.3");
        assert_eq!(err.kind, ErrorKind::BadFloat);
        assert_eq!(err.span.start.column, 4);
    }

    #[test]
    fn test_bad_comparators() {
        assert_eq!(lex_error("1 ! 2").kind, ErrorKind::BadComparator("!".to_string()));
        assert_eq!(lex_error("a => b").kind, ErrorKind::BadComparator("=>".to_string()));
        assert_eq!(lex_error("a << b").kind, ErrorKind::BadComparator("<<".to_string()));
    }

    #[test]
    fn test_illegal_character() {
        let err = lex_error("1 && 2");
        assert_eq!(err.kind, ErrorKind::IllegalCharacter('&'));
        assert_eq!(err.span.start.column, 3);
    }

    #[test]
    fn test_eof_at_final_position() {
        let tokens = Lexer::new("1 +\n 2 ").tokenize().unwrap();
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.span.start, Position::new(7, 2, 4));
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
    }

    #[test]
    fn test_token_spans_and_lexemes() {
        let tokens = Lexer::new("ab\n  12.5").tokenize().unwrap();
        assert_eq!(tokens[1].lexeme, "12.5");
        assert_eq!(tokens[1].span.start, Position::new(5, 2, 3));
        assert_eq!(tokens[1].span.end, Position::new(9, 2, 7));
    }

    #[test]
    fn test_empty_source() {
        assert!(tokenize("   \t\n").is_empty());
    }
}
