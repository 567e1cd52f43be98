use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::Chars;
use lazy_static::lazy_static;
use crate::interpreter::diagnostic::Reporter;
use crate::util;

#[cfg(test)]
mod tests;

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("and", TokenType::And),
        ("class", TokenType::Class),
        ("else", TokenType::Else),
        ("false", TokenType::False),
        ("for", TokenType::For),
        ("fun", TokenType::Fun),
        ("if", TokenType::If),
        ("nil", TokenType::Nil),
        ("or", TokenType::Or),
        ("print", TokenType::Print),
        ("return", TokenType::Return),
        ("super", TokenType::Super),
        ("this", TokenType::This),
        ("true", TokenType::True),
        ("var", TokenType::Var),
        ("while", TokenType::While),
    ]);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    ParenthesisLeft, ParenthesisRight,
    BracketLeft, BracketRight,
    Comma, Dot, Minus, Plus, Semicolon, Slash, Star,

    Not, NotEqual,
    Assign, Equal,
    Greater, GreaterEqual,
    Less, LessEqual,

    Identifier,
    String,
    Number,

    // Keywords
    And, Class, Else, False, For, Fun, If, Nil, Or,
    Print, Return, Super, This, True, Var, While,

    Eof,
}

/// Literal payload carried by `Number` and `String` tokens.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    literal: Option<Literal>,
    start: TokenPos, end: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, literal: Option<Literal>, start: TokenPos, end: TokenPos) -> Token {
        Token {
            token_type, source, literal,
            start, end,
        }
    }

    /// A token with no literal that starts and ends at `line`, column 1.
    pub fn synthetic(token_type: TokenType, source: &str, line: i32) -> Token {
        Token::new(token_type, source.to_owned(), None, TokenPos::new(line, 1), TokenPos::new(line, 1))
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn literal(&self) -> Option<&Literal> { self.literal.as_ref() }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn end(&self) -> &TokenPos { &self.end }
    pub fn line(&self) -> i32 { self.start.line }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LexerError {
    UnexpectedEof,

    UnexpectedCharacter(TokenPos, char),
    UnterminatedString {
        pos: TokenPos,
    },
}

impl LexerError {
    pub fn get_pos(&self) -> Option<TokenPos> {
        match self {
            LexerError::UnexpectedCharacter(pos, _) => Some(*pos),
            LexerError::UnterminatedString { pos } => Some(*pos),
            LexerError::UnexpectedEof => None,
        }
    }
}

impl Display for LexerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LexerError::UnexpectedEof => write!(f, "Unexpected EOF."),
            LexerError::UnexpectedCharacter(_, c) => write!(f, "Unexpected character '{}'.", c),
            LexerError::UnterminatedString { .. } => write!(f, "Unterminated string."),
        }
    }
}

type LexerResult<T> = Result<T, LexerError>;

pub struct Lexer<'source> {
    input: &'source str,

    chars: Chars<'source>,
    peek_1: Option<char>,
    peek_2: Option<char>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            chars: source.chars(),
            peek_1: None,
            peek_2: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),
        }
    }

    /// Scans the whole input. Every lexical error is passed to `reporter` and
    /// scanning resumes after it; the result always ends with one `Eof` token.
    pub fn tokenize(mut self, reporter: &mut dyn Reporter) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            match self.scan_token() {
                Ok(token) => {
                    let is_eof = token.token_type() == TokenType::Eof;
                    tokens.push(token);

                    if is_eof {
                        break;
                    }
                },
                Err(err) => {
                    let line = err.get_pos().unwrap_or(self.current_pos).line;
                    reporter.report(line, "", &err.to_string());
                },
            }
        }

        tracing::debug!(count = tokens.len(), "scanned tokens");
        tokens
    }

    pub fn scan_token(&mut self) -> LexerResult<Token> {
        loop {
            self.skip_whitespace();
            self.start_index = self.current_index;
            self.start_pos = self.current_pos;

            if self.is_eof() {
                return Ok(self.make_token(TokenType::Eof));
            }

            let c = self.consume()?;

            return match c {
                '(' => Ok(self.make_token(TokenType::ParenthesisLeft)),
                ')' => Ok(self.make_token(TokenType::ParenthesisRight)),
                '{' => Ok(self.make_token(TokenType::BracketLeft)),
                '}' => Ok(self.make_token(TokenType::BracketRight)),
                ',' => Ok(self.make_token(TokenType::Comma)),
                '.' => Ok(self.make_token(TokenType::Dot)),
                '-' => Ok(self.make_token(TokenType::Minus)),
                '+' => Ok(self.make_token(TokenType::Plus)),
                ';' => Ok(self.make_token(TokenType::Semicolon)),
                '*' => Ok(self.make_token(TokenType::Star)),

                '=' => Ok(if self.expect('=') { self.make_token(TokenType::Equal) } else {
                    self.make_token(TokenType::Assign)
                }),
                '!' => Ok(if self.expect('=') { self.make_token(TokenType::NotEqual) } else {
                    self.make_token(TokenType::Not)
                }),
                '>' => Ok(if self.expect('=') { self.make_token(TokenType::GreaterEqual) } else {
                    self.make_token(TokenType::Greater)
                }),
                '<' => Ok(if self.expect('=') { self.make_token(TokenType::LessEqual) } else {
                    self.make_token(TokenType::Less)
                }),
                '/' => if self.expect('/') {
                    self.skip_line();
                    continue;
                } else {
                    Ok(self.make_token(TokenType::Slash))
                },

                '"' => self.scan_string(),
                c if util::is_numeric(c) => Ok(self.scan_number()),
                c if util::is_alphabetic(c) => Ok(self.scan_identifier()),

                _ => Err(LexerError::UnexpectedCharacter(self.start_pos, c)),
            };
        }
    }

    fn scan_string(&mut self) -> LexerResult<Token> {
        while let Ok(c) = self.peek() {
            if c == '"' {
                break;
            }

            let _ = self.consume();
        }

        if self.is_eof() {
            Err(LexerError::UnterminatedString { pos: self.start_pos })
        } else {
            let _ = self.consume(); // the trailing '"'

            // The lexeme keeps its quotes, the literal doesn't
            let value = self.input[(self.start_index + 1)..(self.current_index - 1)].to_owned();
            Ok(self.make_literal_token(TokenType::String, Some(Literal::String(value))))
        }
    }

    fn scan_number(&mut self) -> Token {
        while let Ok('0'..='9') = self.peek() {
            let _ = self.consume();
        }

        if let Ok('.') = self.peek() {
            if let Ok('0'..='9') = self.peek_next() {
                let _ = self.consume();

                while let Ok('0'..='9') = self.peek() {
                    let _ = self.consume();
                }
            }
        }

        let source = &self.input[self.start_index..self.current_index];
        // `digits` or `digits.digits` always parses; out-of-range values become infinity.
        let value: f64 = source.parse().unwrap_or(f64::INFINITY);

        self.make_literal_token(TokenType::Number, Some(Literal::Number(value)))
    }

    fn scan_identifier(&mut self) -> Token {
        while let Ok(c) = self.peek() {
            if !util::is_alphanumeric(c) {
                break;
            }

            let _ = self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        let token_type = KEYWORDS.get(name).copied().unwrap_or(TokenType::Identifier);

        self.make_token(token_type)
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        self.make_literal_token(token_type, None)
    }

    fn make_literal_token(&self, token_type: TokenType, literal: Option<Literal>) -> Token {
        Token {
            token_type,
            source: self.input[self.start_index..self.current_index].to_owned(),
            literal,

            start: self.start_pos, end: self.current_pos,
        }
    }

    fn consume(&mut self) -> LexerResult<char> {
        (if let Some(c) = self.peek_1.take() {
            self.peek_1 = self.peek_2.take();
            Ok(c)
        } else {
            self.chars.next().ok_or(LexerError::UnexpectedEof)
        }).map(|c| {
            self.current_index += c.len_utf8();

            if c == '\n' {
                self.current_pos.line += 1;
                self.current_pos.column = 1;
            } else {
                self.current_pos.column += 1;
            }

            c
        })
    }

    fn peek(&mut self) -> LexerResult<char> {
        if let Some(c) = self.peek_1 {
            Ok(c)
        } else if let Some(c) = self.chars.next() {
            self.peek_1 = Some(c);
            Ok(c)
        } else {
            Err(LexerError::UnexpectedEof)
        }
    }

    fn peek_next(&mut self) -> LexerResult<char> {
        if let Some(c) = self.peek_2 {
            return Ok(c);
        }

        self.peek()?;

        match self.chars.next() {
            Some(c) => {
                self.peek_2 = Some(c);
                Ok(c)
            },
            None => Err(LexerError::UnexpectedEof),
        }
    }

    fn expect(&mut self, expected: char) -> bool {
        match self.peek() {
            Ok(actual) if actual == expected => self.consume().is_ok(),
            _ => false,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Ok(' ' | '\t' | '\r' | '\n') = self.peek() {
            let _ = self.consume();
        }
    }

    fn skip_line(&mut self) {
        while let Ok(c) = self.peek() {
            if c == '\n' {
                return;
            }

            let _ = self.consume();
        }
    }

    fn is_eof(&self) -> bool {
        self.current_index >= self.input.len()
    }
}
