use std::rc::Rc;
use crate::interpreter::ast::{Expr, FunctionDecl, LiteralValue, Stmt};
use crate::interpreter::diagnostic::Reporter;
use crate::interpreter::lexer::{Literal, Token, TokenType};
use crate::util::ensure_sufficient_stack;


pub const MAX_ARGUMENTS: usize = 255;

/// Unwinds the current declaration after a syntax error has been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError;

type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'r> {
    tokens: Vec<Token>,
    current: usize,

    reporter: &'r mut dyn Reporter,
    function_depth: usize,

    had_error: bool,
}

impl<'r> Parser<'r> {
    pub fn new(mut tokens: Vec<Token>, reporter: &'r mut dyn Reporter) -> Parser<'r> {
        if tokens.last().map(|token| token.token_type()) != Some(TokenType::Eof) {
            let line = tokens.last().map(|token| token.end().line).unwrap_or(1);
            tokens.push(Token::synthetic(TokenType::Eof, "", line));
        }

        Parser {
            tokens,
            current: 0,
            reporter,
            function_depth: 0,
            had_error: false,
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    // Declaration parsing

    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_eof() {
            if let Some(stmt) = self.parse_declaration() {
                statements.push(stmt);
            }
        }

        tracing::debug!(count = statements.len(), had_error = self.had_error, "parsed program");
        statements
    }

    fn parse_declaration(&mut self) -> Option<Stmt> {
        ensure_sufficient_stack(|| self.parse_declaration_impl())
    }

    fn parse_declaration_impl(&mut self) -> Option<Stmt> {
        let start = self.current;

        let result = if self.matches(TokenType::Fun) {
            self.parse_function_declaration()
        } else if self.matches(TokenType::Var) {
            self.parse_variable_declaration()
        } else {
            self.parse_statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(ParseError) => {
                self.synchronize(start);
                None
            },
        }
    }

    fn parse_function_declaration(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::Identifier, "Expected function name after 'fun'")?;
        let name = self.previous().clone();

        self.expect(TokenType::ParenthesisLeft, "Expected '(' after function name")?;
        let mut params: Vec<Token> = vec![];

        if !self.check(TokenType::ParenthesisRight) {
            loop {
                if params.len() >= MAX_ARGUMENTS {
                    self.error_at_current(&format!("Can't have more than {} parameters", MAX_ARGUMENTS));
                }

                self.expect(TokenType::Identifier, "Expected parameter name")?;
                params.push(self.previous().clone());

                if !self.matches(TokenType::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenType::ParenthesisRight, "Expected ')' after parameters")?;
        self.expect(TokenType::BracketLeft, "Expected '{' before function body")?;

        self.function_depth += 1;
        let body = self.parse_block();
        self.function_depth -= 1;

        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body: body? })))
    }

    fn parse_variable_declaration(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::Identifier, "Expected variable name after 'var'")?;
        let name = self.previous().clone();

        let initializer = if self.matches(TokenType::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect(TokenType::Semicolon, "Expected ';' after variable declaration")?;
        Ok(Stmt::Variable { name, initializer })
    }

    // Statement parsing

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        ensure_sufficient_stack(|| self.parse_statement_impl())
    }

    fn parse_statement_impl(&mut self) -> ParseResult<Stmt> {
        if self.matches(TokenType::Print) {
            self.parse_print_statement()
        } else if self.matches(TokenType::If) {
            self.parse_if_statement()
        } else if self.matches(TokenType::While) {
            self.parse_while_statement()
        } else if self.matches(TokenType::For) {
            self.parse_for_statement()
        } else if self.matches(TokenType::Return) {
            self.parse_return_statement()
        } else if self.matches(TokenType::BracketLeft) {
            Ok(Stmt::Block(self.parse_block()?))
        } else {
            self.parse_expression_statement()
        }
    }

    fn parse_print_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        let expr = self.parse_expression()?;

        self.expect_statement_end()?;
        Ok(Stmt::Print { keyword, expr })
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::ParenthesisLeft, "Expected '(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenType::ParenthesisRight, "Expected ')' after 'if' condition")?;

        let then = Box::new(self.parse_statement()?);
        let otherwise = if self.matches(TokenType::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If { condition, then, otherwise })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::ParenthesisLeft, "Expected '(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenType::ParenthesisRight, "Expected ')' after 'while' condition")?;

        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::While { condition, body })
    }

    /// `for (init; cond; incr) body` becomes `{ init; while (cond) { body; incr; } }`.
    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::ParenthesisLeft, "Expected '(' after 'for'")?;

        let initializer = if self.matches(TokenType::Semicolon) {
            None
        } else if self.matches(TokenType::Var) {
            Some(self.parse_variable_declaration()?)
        } else {
            Some(self.parse_expression_statement()?)
        };

        let condition = if self.check(TokenType::Semicolon) {
            Expr::Literal(LiteralValue::Boolean(true))
        } else {
            self.parse_expression()?
        };
        self.expect(TokenType::Semicolon, "Expected ';' after loop condition")?;

        let increment = if self.check(TokenType::ParenthesisRight) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenType::ParenthesisRight, "Expected ')' after for clauses")?;

        let mut body = self.parse_statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        let mut statements = Vec::with_capacity(2);
        statements.extend(initializer);
        statements.push(Stmt::While { condition, body: Box::new(body) });

        Ok(Stmt::Block(statements))
    }

    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        if self.function_depth == 0 {
            self.error_at(&keyword, "Can't return from top-level code");
        }

        let value = if self.check(TokenType::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect(TokenType::Semicolon, "Expected ';' after return value")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenType::BracketRight) && !self.is_eof() {
            if let Some(stmt) = self.parse_declaration() {
                statements.push(stmt);
            }
        }

        self.expect(TokenType::BracketRight, "Expected '}' after block")?;
        Ok(statements)
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expression()?;

        self.expect_statement_end()?;
        Ok(Stmt::Expression(expr))
    }

    // Expression parsing

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        ensure_sufficient_stack(|| self.parse_assignment())
    }

    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_or()?;

        if self.matches(TokenType::Assign) {
            let equals = self.previous().clone();
            let value = self.parse_expression()?;

            return match expr {
                Expr::Variable(name) => Ok(Expr::Assign { name, value: Box::new(value) }),
                other => {
                    self.error_at(&equals, "Invalid assignment target");
                    Ok(other)
                },
            };
        }

        Ok(expr)
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_and()?;

        while self.matches(TokenType::Or) {
            let operator = self.previous().clone();
            let right = self.parse_and()?;

            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_equality()?;

        while self.matches(TokenType::And) {
            let operator = self.previous().clone();
            let right = self.parse_equality()?;

            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_comparison()?;

        while self.matches_any(&[TokenType::NotEqual, TokenType::Equal]) {
            let operator = self.previous().clone();
            let right = self.parse_comparison()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_addition()?;

        while self.matches_any(&[TokenType::Greater, TokenType::GreaterEqual, TokenType::Less, TokenType::LessEqual]) {
            let operator = self.previous().clone();
            let right = self.parse_addition()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_addition(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_multiplication()?;

        while self.matches_any(&[TokenType::Minus, TokenType::Plus]) {
            let operator = self.previous().clone();
            let right = self.parse_multiplication()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_multiplication(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_unary()?;

        while self.matches_any(&[TokenType::Slash, TokenType::Star]) {
            let operator = self.previous().clone();
            let right = self.parse_unary()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        ensure_sufficient_stack(|| self.parse_unary_impl())
    }

    fn parse_unary_impl(&mut self) -> ParseResult<Expr> {
        if self.matches_any(&[TokenType::Not, TokenType::Minus]) {
            let operator = self.previous().clone();
            let right = self.parse_unary()?;

            return Ok(Expr::Unary { operator, right: Box::new(right) });
        }

        self.parse_call()
    }

    fn parse_call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        while self.matches(TokenType::ParenthesisLeft) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(TokenType::ParenthesisRight) {
            arguments.push(self.parse_expression()?);

            while self.matches(TokenType::Comma) {
                if arguments.len() >= MAX_ARGUMENTS {
                    self.error_at_current(&format!("Can't have more than {} arguments", MAX_ARGUMENTS));
                }

                arguments.push(self.parse_expression()?);
            }
        }

        self.expect(TokenType::ParenthesisRight, "Expected ')' after arguments")?;
        let paren = self.previous().clone();

        Ok(Expr::Call { callee: Box::new(callee), paren, args: arguments })
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        if self.matches(TokenType::False) {
            return Ok(Expr::Literal(LiteralValue::Boolean(false)));
        } else if self.matches(TokenType::True) {
            return Ok(Expr::Literal(LiteralValue::Boolean(true)));
        } else if self.matches(TokenType::Nil) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        } else if self.matches_any(&[TokenType::Number, TokenType::String]) {
            return match self.previous().literal() {
                Some(Literal::Number(value)) => Ok(Expr::Literal(LiteralValue::Number(*value))),
                Some(Literal::String(value)) => Ok(Expr::Literal(LiteralValue::String(value.clone()))),
                None => Err(self.error("Literal token without a value")),
            };
        } else if self.matches(TokenType::Identifier) {
            return Ok(Expr::Variable(self.previous().clone()));
        } else if self.matches(TokenType::ParenthesisLeft) {
            let expr = self.parse_expression()?;
            self.expect(TokenType::ParenthesisRight, "Expected ')' after expression")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        Err(self.error_at_current("Expected expression"))
    }

    fn consume(&mut self) -> &Token {
        if !self.is_eof() {
            self.current += 1;
        }

        self.previous()
    }

    fn expect(&mut self, token_type: TokenType, message: &str) -> ParseResult<()> {
        if self.check(token_type) {
            self.consume();
            return Ok(());
        }

        Err(self.error_at_current(message))
    }

    #[inline]
    fn expect_statement_end(&mut self) -> ParseResult<()> {
        self.expect(TokenType::Semicolon, "Expected ';' after statement")
    }

    fn matches(&mut self, token_type: TokenType) -> bool { // Should be called "match", but that's a keyword
        if !self.check(token_type) {
            return false;
        }

        self.consume();
        true
    }

    fn matches_any(&mut self, token_types: &[TokenType]) -> bool {
        for token_type in token_types {
            if self.check(*token_type) {
                self.consume();
                return true;
            }
        }

        false
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.peek().token_type() == token_type
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn is_eof(&self) -> bool {
        self.peek().token_type() == TokenType::Eof
    }

    // Error handling

    /// Skips to the next statement boundary. Always moves past at least one
    /// token when the failed declaration consumed nothing.
    fn synchronize(&mut self, declaration_start: usize) {
        if self.current == declaration_start {
            self.consume();
        }

        while !self.is_eof() {
            if self.previous().token_type() == TokenType::Semicolon {
                return;
            }

            match self.peek().token_type() {
                TokenType::Class | TokenType::Fun | TokenType::Var | TokenType::For
                | TokenType::If | TokenType::While | TokenType::Print | TokenType::Return => return,
                _ => {},
            };

            self.consume();
        }
    }

    fn error_at_current(&mut self, message: &str) -> ParseError {
        Self::error_at_impl(&mut *self.reporter, &mut self.had_error, &self.tokens[self.current], message)
    }

    fn error(&mut self, message: &str) -> ParseError {
        let previous = self.current.saturating_sub(1);
        Self::error_at_impl(&mut *self.reporter, &mut self.had_error, &self.tokens[previous], message)
    }

    fn error_at(&mut self, token: &Token, message: &str) -> ParseError {
        Self::error_at_impl(&mut *self.reporter, &mut self.had_error, token, message)
    }

    fn error_at_impl(reporter: &mut dyn Reporter, had_error: &mut bool, token: &Token, message: &str) -> ParseError {
        let location = if token.token_type() == TokenType::Eof {
            String::from(" at end")
        } else {
            format!(" at '{}'", token.source())
        };

        reporter.report(token.line(), &location, message);
        *had_error = true;

        ParseError
    }
}
