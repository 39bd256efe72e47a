use crate::error::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Illegal,
    Eof,

    // Literals
    Identifier,
    Integer,
    String,

    // Operators
    Equal,
    Plus,
    Minus,
    Bang,
    Star,
    Slash,
    Less,
    Greater,
    EqualEqual,
    BangEqual,

    // Delimiters
    Comma,
    Semicolon,
    Colon,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,

    // Keywords
    Fn,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

impl TokenType {
    fn keyword(text: &str) -> Option<TokenType> {
        match text {
            "fn" => Some(TokenType::Fn),
            "let" => Some(TokenType::Let),
            "true" => Some(TokenType::True),
            "false" => Some(TokenType::False),
            "if" => Some(TokenType::If),
            "else" => Some(TokenType::Else),
            "return" => Some(TokenType::Return),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenType::Illegal => "ILLEGAL",
            TokenType::Eof => "EOF",
            TokenType::Identifier => "IDENT",
            TokenType::Integer => "INT",
            TokenType::String => "STRING",
            TokenType::Equal => "=",
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Bang => "!",
            TokenType::Star => "*",
            TokenType::Slash => "/",
            TokenType::Less => "<",
            TokenType::Greater => ">",
            TokenType::EqualEqual => "==",
            TokenType::BangEqual => "!=",
            TokenType::Comma => ",",
            TokenType::Semicolon => ";",
            TokenType::Colon => ":",
            TokenType::LeftParen => "(",
            TokenType::RightParen => ")",
            TokenType::LeftBrace => "{",
            TokenType::RightBrace => "}",
            TokenType::LeftBracket => "[",
            TokenType::RightBracket => "]",
            TokenType::Fn => "FUNCTION",
            TokenType::Let => "LET",
            TokenType::True => "TRUE",
            TokenType::False => "FALSE",
            TokenType::If => "IF",
            TokenType::Else => "ELSE",
            TokenType::Return => "RETURN",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(token_type: TokenType, literal: String, span: Span) -> Self {
        Self {
            token_type,
            literal,
            span,
        }
    }
}

/// Single-pass scanner. Tokens are produced on demand by `next_token`; once the
/// end of input is reached every further call yields another EOF token.
pub struct Lexer<'a> {
    source: &'a str,
    start: usize,
    current: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            finished: false,
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.current;

        let c = match self.advance() {
            Some(c) => c,
            None => {
                return Token::new(TokenType::Eof, String::new(), Span::single(self.current));
            }
        };

        match c {
            '(' => self.make_token(TokenType::LeftParen),
            ')' => self.make_token(TokenType::RightParen),
            '{' => self.make_token(TokenType::LeftBrace),
            '}' => self.make_token(TokenType::RightBrace),
            '[' => self.make_token(TokenType::LeftBracket),
            ']' => self.make_token(TokenType::RightBracket),
            ',' => self.make_token(TokenType::Comma),
            ';' => self.make_token(TokenType::Semicolon),
            ':' => self.make_token(TokenType::Colon),
            '+' => self.make_token(TokenType::Plus),
            '-' => self.make_token(TokenType::Minus),
            '*' => self.make_token(TokenType::Star),
            '/' => self.make_token(TokenType::Slash),
            '<' => self.make_token(TokenType::Less),
            '>' => self.make_token(TokenType::Greater),
            '!' => {
                let token_type = if self.match_char('=') {
                    TokenType::BangEqual
                } else {
                    TokenType::Bang
                };
                self.make_token(token_type)
            }
            '=' => {
                let token_type = if self.match_char('=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.make_token(token_type)
            }
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_identifier_start(c) => self.identifier(),
            _ => self.make_token(TokenType::Illegal),
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    // Comment goes until end of line
                    while matches!(self.peek(), Some(c) if c != '\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += c.len_utf8();
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next()
    }

    fn string(&mut self) -> Token {
        while matches!(self.peek(), Some(c) if c != '"') {
            self.advance();
        }

        if self.peek().is_none() {
            // Unterminated string
            return self.make_token(TokenType::Illegal);
        }

        // Consume the closing "
        self.advance();

        let content = &self.source[self.start + 1..self.current - 1];
        Token::new(
            TokenType::String,
            content.to_string(),
            Span::new(self.start, self.current),
        )
    }

    fn number(&mut self) -> Token {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        self.make_token(TokenType::Integer)
    }

    fn identifier(&mut self) -> Token {
        while matches!(self.peek(), Some(c) if is_identifier_continue(c)) {
            self.advance();
        }

        let text = &self.source[self.start..self.current];
        let token_type = TokenType::keyword(text).unwrap_or(TokenType::Identifier);
        self.make_token(token_type)
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        let text = &self.source[self.start..self.current];
        Token::new(
            token_type,
            text.to_string(),
            Span::new(self.start, self.current),
        )
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token up to and including the first EOF.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.token_type == TokenType::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '?'
}
