
use std::io::{BufReader, Read};
use std::rc::Rc;
use std::{fmt, io};

use derive_more::Display;
use matches::assert_matches;
use num_bigint::BigInt;

use super::char_reader::CharReader;
use super::char_reader::ExtChar;
use super::char_reader::ExtChar::*;
use crate::shared::error;

#[derive(Debug, Display)]
pub enum ErrorKind {
    #[display(fmt = "unexpected character '{}' at {}", _0, _1)]
    UnexpectedCharacter(char, Location),
    #[display(fmt = "invalid number literal '{}' at {}", _0, _1)]
    InvalidNumberLiteral(String, Location),
    #[display(fmt = "failed to read source")]
    Io,
}

pub type Error = error::Error<ErrorKind>;

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::with_source(ErrorKind::Io, err)
    }
}

/// Trait for the Lexer to implement.
///
/// The parser is generic over this so it can be driven by a scripted token
/// stream in tests.
pub trait ILexer {
    fn get_token(&mut self) -> Result<Token, Error>;
}

/// Source position of a token or syntax tree node: file name and 1-based
/// line number.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub file: Rc<str>,
    pub line: usize,
}

impl Location {
    pub fn new(file: Rc<str>, line: usize) -> Location {
        Location {
            file,
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// All the possible token types
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum TokenKind {
    EndOfFile,

    Identifier,
    Number,
    UnsizedNumber,

    Equals,
    EqualEqual,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    Colon,
    Semicolon,

    LeftBrace,
    RightBrace,
    LeftParenthesis,
    RightParenthesis,

    ModuleKeyword,
    IntKeyword,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, PartialEq)]
pub enum TokenData {
    None,
    Identifier(String),
    Number(BigInt),
}

/// Tokens of this type are emitted by the lexer
#[derive(Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub data: TokenData,
    pub location: Location,
}

impl Token {
    fn new(kind: TokenKind, location: Location) -> Token {
        Token {
            kind,
            data: TokenData::None,
            location,
        }
    }

    fn new_with_data(kind: TokenKind, data: TokenData, location: Location) -> Token {
        // Verify that the data matches the token kind
        match kind {
            TokenKind::Identifier => assert_matches!(data, TokenData::Identifier(_)),
            TokenKind::Number | TokenKind::UnsizedNumber => assert_matches!(data, TokenData::Number(_)),
            _ => assert_matches!(data, TokenData::None),
        }

        Token {
            kind,
            data,
            location,
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lexer implementation
pub struct Lexer<R: Read> {
    reader: CharReader<BufReader<R>>,

    /// Name of the source unit, shared by every emitted location
    file: Rc<str>,
    /// Current 1-based line number
    line: usize,

    /// If this field is `Some(_)`, it is returned by `get_char()` before a
    /// new character is read from `reader`
    next_char: Option<ExtChar>,

    /// Character returned by the last call to `get_char()`, used by
    /// `unget_char()`
    previous_char: Option<ExtChar>,
    /// Line number before `previous_char` was read
    previous_line: usize,
}

impl<R: Read> Lexer<R> {
    pub fn new(file: &str, source: R) -> Lexer<R> {
        Lexer {
            reader: CharReader::new(BufReader::new(source)),
            file: Rc::from(file),
            line: 1,
            next_char: None,
            previous_char: None,
            previous_line: 1,
        }
    }

    fn location(&self) -> Location {
        Location::new(Rc::clone(&self.file), self.line)
    }

    fn get_char(&mut self) -> Result<ExtChar, Error> {
        let c = match self.next_char.take() {
            Some(c) => c,
            None => self.reader.read_char()?,
        };

        self.previous_line = self.line;
        self.previous_char = Some(c);

        if c == Char('\n') {
            self.line += 1;
        }

        Ok(c)
    }

    /// Undo the last call to `get_char()`.
    ///
    /// Panics when called twice in a row.
    fn unget_char(&mut self) {
        if self.next_char.is_some() {
            panic!("unget_char() called twice in a row");
        }

        match self.previous_char.take() {
            Some(c) => {
                self.next_char = Some(c);
                self.line = self.previous_line;
            },
            None => panic!("unget_char() called but no char to unget"),
        }
    }

    /// Collect an identifier-shaped run of characters starting with `first`
    fn get_word(&mut self, first: char) -> Result<String, Error> {
        let mut s = first.to_string();

        loop {
            match self.get_char()? {
                Char(c) if is_identifier_char(c) => s.push(c),
                Char(_) => {
                    self.unget_char();
                    break;
                },
                EOF => break,
            }
        }

        Ok(s)
    }

    /// Parse a number literal.
    ///
    /// `0x`, `0o` and `0b` prefixes select the radix and `_` separators are
    /// ignored, so `0xdead_beef` and `1_000_000` are valid spellings.
    fn parse_number(&mut self, first: char, location: Location) -> Result<Token, Error> {
        let mut s = String::new();

        // The whole identifier-shaped run belongs to the literal; hex digits
        // are identifier characters anyway
        let mut c = Char(first);
        loop {
            match c {
                Char(x) if is_identifier_char(x) => {
                    if x != '_' {
                        s.push(x);
                    }
                },
                Char(_) => {
                    self.unget_char();
                    break;
                },
                EOF => break,
            }

            c = self.get_char()?;
        }

        let (digits, radix) = match s.get(..2) {
            Some("0x") | Some("0X") => (&s[2..], 16),
            Some("0o") | Some("0O") => (&s[2..], 8),
            Some("0b") | Some("0B") => (&s[2..], 2),
            _ => (&s[..], 10),
        };

        match BigInt::parse_bytes(digits.as_bytes(), radix) {
            Some(value) => Ok(Token::new_with_data(TokenKind::Number, TokenData::Number(value), location)),
            None => Err(ErrorKind::InvalidNumberLiteral(s, location).into()),
        }
    }

    /// Classify an identifier-shaped word: keyword, `u<N>` literal or plain
    /// identifier
    fn classify_word(word: String, location: Location) -> Token {
        match word.as_ref() {
            "module" => return Token::new(TokenKind::ModuleKeyword, location),
            "int" => return Token::new(TokenKind::IntKeyword, location),
            _ => {},
        }

        if let Some(tail) = word.strip_prefix('u') {
            if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
                let value = BigInt::parse_bytes(tail.as_bytes(), 10).unwrap();
                return Token::new_with_data(TokenKind::UnsizedNumber, TokenData::Number(value), location);
            }
        }

        Token::new_with_data(TokenKind::Identifier, TokenData::Identifier(word), location)
    }
}

impl<R: Read> ILexer for Lexer<R> {
    /// Reads from the source stream until a token is complete and returns it
    fn get_token(&mut self) -> Result<Token, Error> {
        let mut c;

        // Skip whitespace and '//' comments
        loop {
            c = self.get_char()?;

            if c == Char('/') {
                c = self.get_char()?;

                if c == Char('/') {
                    // Comments end with a line break
                    while c != Char('\n') && c != EOF {
                        c = self.get_char()?;
                    }
                } else {
                    self.unget_char();
                    c = Char('/');
                }
            }

            match c {
                Char(x) if !x.is_whitespace() => break,
                EOF => break,
                Char(_) => {},
            }
        }

        let token_location = self.location();

        match c {
            Char('+') => Ok(Token::new(TokenKind::Plus, token_location)),
            Char('-') => Ok(Token::new(TokenKind::Minus, token_location)),
            Char('*') => Ok(Token::new(TokenKind::Star, token_location)),
            Char('/') => Ok(Token::new(TokenKind::Slash, token_location)),
            Char('%') => Ok(Token::new(TokenKind::Percent, token_location)),
            Char(':') => Ok(Token::new(TokenKind::Colon, token_location)),
            Char(';') => Ok(Token::new(TokenKind::Semicolon, token_location)),
            Char('{') => Ok(Token::new(TokenKind::LeftBrace, token_location)),
            Char('}') => Ok(Token::new(TokenKind::RightBrace, token_location)),
            Char('(') => Ok(Token::new(TokenKind::LeftParenthesis, token_location)),
            Char(')') => Ok(Token::new(TokenKind::RightParenthesis, token_location)),
            Char('=') => {
                if self.get_char()? == Char('=') {
                    Ok(Token::new(TokenKind::EqualEqual, token_location))
                } else {
                    self.unget_char();
                    Ok(Token::new(TokenKind::Equals, token_location))
                }
            },
            Char(x) if x.is_ascii_digit() => self.parse_number(x, token_location),
            Char(x) if is_identifier_start(x) => {
                let word = self.get_word(x)?;

                Ok(Self::classify_word(word, token_location))
            },
            Char(x) => Err(ErrorKind::UnexpectedCharacter(x, token_location).into()),
            EOF => Ok(Token::new(TokenKind::EndOfFile, token_location)),
        }
    }
}
