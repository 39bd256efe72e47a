use crate::ast::{
    BlockStatement, Expression, FunctionLiteral, Identifier, InfixOp, PrefixOp, Program, Statement,
};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenType};
use crate::stack::ensure_sufficient_stack;
use std::rc::Rc;

type ParseResult<T> = Result<T, ParseError>;

/// Binding power of an operator, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl Precedence {
    fn of(token_type: TokenType) -> Precedence {
        match token_type {
            TokenType::EqualEqual | TokenType::BangEqual => Precedence::Equals,
            TokenType::Less | TokenType::Greater => Precedence::LessGreater,
            TokenType::Plus | TokenType::Minus => Precedence::Sum,
            TokenType::Star | TokenType::Slash => Precedence::Product,
            TokenType::LeftParen => Precedence::Call,
            TokenType::LeftBracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

/// Pratt parser over a lazily scanned token stream with one token of lookahead.
///
/// Syntax errors never abort the parse: the offending statement is dropped, the
/// error is recorded and parsing resumes at the next token. The collected errors
/// are handed back by [`Parser::parse_program`] alongside the program.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
        }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(mut self) -> (Program, Vec<ParseError>) {
        let mut statements = Vec::new();

        while !self.current_is(TokenType::Eof) {
            match self.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(error) => self.record(error),
            }
            self.next_token();
        }

        tracing::debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        (Program { statements }, self.errors)
    }

    fn record(&mut self, error: ParseError) {
        tracing::trace!(message = %error.message, "parse error");
        self.errors.push(error);
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current.token_type {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> ParseResult<Statement> {
        let token = self.current.clone();

        self.expect_peek(TokenType::Identifier)?;
        let name = Identifier::new(self.current.clone());

        self.expect_peek(TokenType::Equal)?;
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        // Semicolon is optional
        if self.peek_is(TokenType::Semicolon) {
            self.next_token();
        }

        Ok(Statement::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        let token = self.current.clone();

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenType::Semicolon) {
            self.next_token();
        }

        Ok(Statement::Return { token, value })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let token = self.current.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenType::Semicolon) {
            self.next_token();
        }

        Ok(Statement::Expression { token, expression })
    }

    /// Parses statements up to the closing `}` (or end of input). Leaves the
    /// current token on the `}`.
    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.current.clone();
        let mut statements = Vec::new();

        self.next_token();

        while !self.current_is(TokenType::RightBrace) && !self.current_is(TokenType::Eof) {
            match self.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    self.record(error);
                    // The failed expression ran into this block's closing brace.
                    if self.current_is(TokenType::RightBrace) {
                        break;
                    }
                }
            }
            self.next_token();
        }

        BlockStatement { token, statements }
    }

    fn parse_expression(&mut self, precedence: Precedence) -> ParseResult<Expression> {
        ensure_sufficient_stack(|| self.parse_expression_with(precedence))
    }

    fn parse_expression_with(&mut self, precedence: Precedence) -> ParseResult<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenType::Semicolon) && precedence < self.peek_precedence() {
            self.next_token();
            left = self.parse_infix(left)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Expression> {
        match self.current.token_type {
            TokenType::Identifier => Ok(Expression::Identifier(Identifier::new(
                self.current.clone(),
            ))),
            TokenType::Integer => self.parse_integer_literal(),
            TokenType::String => Ok(Expression::StringLiteral {
                token: self.current.clone(),
                value: self.current.literal.clone(),
            }),
            TokenType::True | TokenType::False => Ok(Expression::Boolean {
                token: self.current.clone(),
                value: self.current_is(TokenType::True),
            }),
            TokenType::Bang | TokenType::Minus => self.parse_prefix_expression(),
            TokenType::LeftParen => self.parse_grouped_expression(),
            TokenType::If => self.parse_if_expression(),
            TokenType::Fn => self.parse_function_literal(),
            TokenType::LeftBracket => {
                let token = self.current.clone();
                let elements = self.parse_expression_list(TokenType::RightBracket)?;
                Ok(Expression::ArrayLiteral { token, elements })
            }
            TokenType::LeftBrace => self.parse_hash_literal(),
            other => Err(ParseError::new(
                format!("no prefix parse function for {} found", other),
                self.current.span,
            )),
        }
    }

    /// Folds `left` through the operator in the current token.
    fn parse_infix(&mut self, left: Expression) -> ParseResult<Expression> {
        let operator = match self.current.token_type {
            TokenType::Plus => InfixOp::Add,
            TokenType::Minus => InfixOp::Subtract,
            TokenType::Star => InfixOp::Multiply,
            TokenType::Slash => InfixOp::Divide,
            TokenType::Less => InfixOp::Less,
            TokenType::Greater => InfixOp::Greater,
            TokenType::EqualEqual => InfixOp::Equal,
            TokenType::BangEqual => InfixOp::NotEqual,
            TokenType::LeftParen => return self.parse_call_expression(left),
            TokenType::LeftBracket => return self.parse_index_expression(left),
            _ => return Ok(left),
        };

        let token = self.current.clone();
        let precedence = self.current_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;

        Ok(Expression::Infix {
            token,
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_integer_literal(&mut self) -> ParseResult<Expression> {
        let token = self.current.clone();
        let value = token.literal.parse::<i64>().map_err(|_| {
            ParseError::new(
                format!("could not parse {:?} as integer", token.literal),
                token.span,
            )
        })?;
        Ok(Expression::IntegerLiteral { token, value })
    }

    fn parse_prefix_expression(&mut self) -> ParseResult<Expression> {
        let token = self.current.clone();
        let operator = match token.token_type {
            TokenType::Bang => PrefixOp::Not,
            _ => PrefixOp::Negate,
        };

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Ok(Expression::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> ParseResult<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::RightParen)?;
        Ok(expression)
    }

    fn parse_if_expression(&mut self) -> ParseResult<Expression> {
        let token = self.current.clone();

        self.expect_peek(TokenType::LeftParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::RightParen)?;

        self.expect_peek(TokenType::LeftBrace)?;
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenType::Else) {
            self.next_token();
            self.expect_peek(TokenType::LeftBrace)?;
            Some(self.parse_block_statement())
        } else {
            None
        };

        Ok(Expression::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> ParseResult<Expression> {
        let token = self.current.clone();

        self.expect_peek(TokenType::LeftParen)?;
        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenType::LeftBrace)?;
        let body = self.parse_block_statement();

        Ok(Expression::FunctionLiteral(Rc::new(FunctionLiteral {
            token,
            parameters,
            body,
        })))
    }

    fn parse_function_parameters(&mut self) -> ParseResult<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenType::RightParen) {
            self.next_token();
            return Ok(parameters);
        }

        self.expect_peek(TokenType::Identifier)?;
        parameters.push(Identifier::new(self.current.clone()));

        while self.peek_is(TokenType::Comma) {
            self.next_token();
            self.expect_peek(TokenType::Identifier)?;
            parameters.push(Identifier::new(self.current.clone()));
        }

        self.expect_peek(TokenType::RightParen)?;
        Ok(parameters)
    }

    fn parse_call_expression(&mut self, function: Expression) -> ParseResult<Expression> {
        let token = self.current.clone();
        let arguments = self.parse_expression_list(TokenType::RightParen)?;
        Ok(Expression::Call {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_index_expression(&mut self, left: Expression) -> ParseResult<Expression> {
        let token = self.current.clone();

        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::RightBracket)?;

        Ok(Expression::Index {
            token,
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    /// Comma-separated expressions up to `end`, for call arguments and array
    /// elements. The current token is the opening delimiter.
    fn parse_expression_list(&mut self, end: TokenType) -> ParseResult<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.next_token();
            return Ok(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;
        Ok(list)
    }

    fn parse_hash_literal(&mut self) -> ParseResult<Expression> {
        let token = self.current.clone();
        let mut pairs = Vec::new();

        while !self.peek_is(TokenType::RightBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            self.expect_peek(TokenType::Colon)?;
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if !self.peek_is(TokenType::RightBrace) {
                self.expect_peek(TokenType::Comma)?;
            }
        }

        self.expect_peek(TokenType::RightBrace)?;
        Ok(Expression::HashLiteral { token, pairs })
    }

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn current_is(&self, token_type: TokenType) -> bool {
        self.current.token_type == token_type
    }

    fn peek_is(&self, token_type: TokenType) -> bool {
        self.peek.token_type == token_type
    }

    /// Advances only when the next token has the expected type.
    fn expect_peek(&mut self, token_type: TokenType) -> ParseResult<()> {
        if self.peek_is(token_type) {
            self.next_token();
            Ok(())
        } else {
            Err(ParseError::new(
                format!(
                    "expected next token to be {}, got {} instead",
                    token_type, self.peek.token_type
                ),
                self.peek.span,
            ))
        }
    }

    fn current_precedence(&self) -> Precedence {
        Precedence::of(self.current.token_type)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.token_type)
    }
}

/// Convenience entry point: scan and parse `source` in one go.
pub fn parse(source: &str) -> (Program, Vec<ParseError>) {
    Parser::new(Lexer::new(source)).parse_program()
}
