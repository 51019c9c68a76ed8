
use derive_more::Display;

use super::ast::{AstNode, BinaryOp};
use super::lexer;
use super::lexer::{ILexer, Location, Token, TokenData, TokenKind};
use crate::shared::error;

#[derive(Debug, Display)]
pub enum ErrorKind {
    #[display(fmt = "expected {} but got {} at {}", _1, _2, _0)]
    UnexpectedToken(Location, TokenKind, TokenKind),
    #[display(fmt = "expected {} but got {} at {}", _1, _2, _0)]
    ExpectedConstruct(Location, String, TokenKind),
    #[display(fmt = "failed to read next token")]
    Lexer,
}

pub type Error = error::Error<ErrorKind>;

impl From<lexer::Error> for Error {
    fn from(err: lexer::Error) -> Self {
        Error::with_source(ErrorKind::Lexer, err)
    }
}

/// Recursive-descent parser with a lookahead of one token.
///
/// Grammar (EBNF):
///
/// ```ebnf
/// program        = { statement }, EndOfFile ;
/// statement      = expression, ';' ;
/// expression     = assignment ;
/// assignment     = equality, [ '=', assignment ] ;
/// equality       = additive, { '==', additive } ;
/// additive       = multiplicative, { ( '+' | '-' ), multiplicative } ;
/// multiplicative = primary, { ( '*' | '/' | '%' ), primary } ;
/// primary        = Number | UnsizedNumber
///                | Identifier, [ ':', [ type ] ]
///                | 'module', '{', { statement }, '}'
///                | '(', expression, ')' ;
/// type           = 'int' | UnsizedNumber | Identifier ;
/// ```
///
/// An `Identifier` followed by `:` parses as a declaration; the type is
/// absent when the token after the colon does not start a type.
pub struct Parser<L: ILexer> {
    lexer: L,
    lookahead: Box<Token>,
}

impl<L: ILexer> Parser<L> {
    pub fn new(mut lexer: L) -> Result<Parser<L>, Error> {
        // Read first lookahead token
        let lookahead = lexer.get_token()?;

        Ok(Parser {
            lexer,
            lookahead: Box::new(lookahead),
        })
    }

    fn match_token(&mut self, expected_kind: TokenKind) -> Result<Box<Token>, Error> {
        if self.lookahead.kind == expected_kind {
            // Read next lookahead token
            let mut token = Box::new(self.lexer.get_token()?);
            // Swap the new and the old lookahead tokens
            std::mem::swap(&mut self.lookahead, &mut token);
            // `token` now holds the old lookahead token which is the token we just matched against
            Ok(token)
        } else {
            Err(ErrorKind::UnexpectedToken(self.lookahead.location.clone(), expected_kind, self.lookahead.kind).into())
        }
    }

    fn parse_identifier(&mut self) -> Result<(String, Location), Error> {
        let token = self.match_token(TokenKind::Identifier)?;

        if let TokenData::Identifier(name) = token.data {
            Ok((name, token.location))
        } else {
            panic!("Token `kind` and `data` do not match up");
        }
    }

    /// Parse the list of top-level statements of one source unit.
    ///
    /// The driver wraps the result into the outermost module expression.
    pub fn parse(&mut self) -> Result<Vec<AstNode>, Error> {
        let mut statements = Vec::new();

        while self.lookahead.kind != TokenKind::EndOfFile {
            statements.push(self.parse_statement()?);
        }

        // Make sure there are no tokens left over
        self.match_token(TokenKind::EndOfFile)?;

        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<AstNode, Error> {
        let expression = self.parse_expression()?;

        self.match_token(TokenKind::Semicolon)?;

        Ok(expression)
    }

    fn parse_expression(&mut self) -> Result<AstNode, Error> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<AstNode, Error> {
        let left = self.parse_equality()?;

        if self.lookahead.kind == TokenKind::Equals {
            let equals = self.match_token(TokenKind::Equals)?;

            // Right associative: a = b = c is a = (b = c)
            let right = self.parse_assignment()?;

            Ok(AstNode::assignment(equals.location, left, right))
        } else {
            Ok(left)
        }
    }

    fn parse_equality(&mut self) -> Result<AstNode, Error> {
        let mut left = self.parse_additive()?;

        while self.lookahead.kind == TokenKind::EqualEqual {
            let operator = self.match_token(TokenKind::EqualEqual)?;

            let right = self.parse_additive()?;

            left = AstNode::binary(operator.location, BinaryOp::Equality, left, right);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<AstNode, Error> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.lookahead.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Subtract,
                _ => break,
            };

            let operator = self.match_token(self.lookahead.kind)?;

            let right = self.parse_multiplicative()?;

            left = AstNode::binary(operator.location, op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<AstNode, Error> {
        let mut left = self.parse_primary()?;

        loop {
            let op = match self.lookahead.kind {
                TokenKind::Star => BinaryOp::Multiply,
                TokenKind::Slash => BinaryOp::Divide,
                TokenKind::Percent => BinaryOp::Modulo,
                _ => break,
            };

            let operator = self.match_token(self.lookahead.kind)?;

            let right = self.parse_primary()?;

            left = AstNode::binary(operator.location, op, left, right);
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<AstNode, Error> {
        match self.lookahead.kind {
            TokenKind::Number => {
                let token = self.match_token(TokenKind::Number)?;

                if let TokenData::Number(value) = token.data {
                    Ok(AstNode::number(token.location, value))
                } else {
                    panic!("Token `kind` and `data` do not match up");
                }
            },
            TokenKind::UnsizedNumber => {
                let token = self.match_token(TokenKind::UnsizedNumber)?;

                if let TokenData::Number(value) = token.data {
                    Ok(AstNode::unsized_number(token.location, value))
                } else {
                    panic!("Token `kind` and `data` do not match up");
                }
            },
            TokenKind::Identifier => {
                let (name, location) = self.parse_identifier()?;

                if self.lookahead.kind == TokenKind::Colon {
                    self.match_token(TokenKind::Colon)?;

                    let typ = self.parse_optional_type()?;

                    // Attributes have no surface syntax yet
                    Ok(AstNode::declaration(location, name, typ, Vec::new()))
                } else {
                    Ok(AstNode::identifier(location, name))
                }
            },
            TokenKind::ModuleKeyword => {
                let module = self.match_token(TokenKind::ModuleKeyword)?;

                self.match_token(TokenKind::LeftBrace)?;

                let mut members = Vec::new();

                while self.lookahead.kind != TokenKind::RightBrace {
                    members.push(self.parse_statement()?);
                }

                self.match_token(TokenKind::RightBrace)?;

                Ok(AstNode::module(module.location, members))
            },
            TokenKind::LeftParenthesis => {
                self.match_token(TokenKind::LeftParenthesis)?;

                let subexpression = self.parse_expression()?;

                self.match_token(TokenKind::RightParenthesis)?;

                Ok(subexpression)
            },
            kind => Err(ErrorKind::ExpectedConstruct(self.lookahead.location.clone(), "expression".to_string(), kind).into()),
        }
    }

    fn parse_optional_type(&mut self) -> Result<Option<AstNode>, Error> {
        match self.lookahead.kind {
            TokenKind::IntKeyword => {
                let token = self.match_token(TokenKind::IntKeyword)?;

                Ok(Some(AstNode::identifier(token.location, "int".to_string())))
            },
            TokenKind::Identifier => {
                let (name, location) = self.parse_identifier()?;

                Ok(Some(AstNode::identifier(location, name)))
            },
            TokenKind::UnsizedNumber => {
                let token = self.match_token(TokenKind::UnsizedNumber)?;

                if let TokenData::Number(value) = token.data {
                    Ok(Some(AstNode::unsized_number(token.location, value)))
                } else {
                    panic!("Token `kind` and `data` do not match up");
                }
            },
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use matches::assert_matches;

    use super::super::ast::AstNodeData;
    use super::super::lexer::Lexer;

    fn parse(source_text: &str) -> Result<Vec<AstNode>, Error> {
        let lexer = Lexer::new("test.rtl", Cursor::new(source_text));

        Parser::new(lexer)?.parse()
    }

    fn parse_one(source_text: &str) -> AstNode {
        let mut statements = parse(source_text).unwrap();

        assert_eq!(statements.len(), 1);

        statements.pop().unwrap()
    }

    #[test]
    fn declaration_with_type() {
        let statement = parse_one("a: int;");

        match statement.data {
            AstNodeData::Declaration { name, typ, attributes } => {
                assert_eq!(name, "a");
                assert_eq!(typ.unwrap().data, AstNodeData::Identifier("int".to_string()));
                assert!(attributes.is_empty());
            },
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn declaration_without_type() {
        let statement = parse_one("a:;");

        match statement.data {
            AstNodeData::Declaration { name, typ, .. } => {
                assert_eq!(name, "a");
                assert!(typ.is_none());
            },
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn declaration_with_width_type() {
        let statement = parse_one("bus: u16;");

        assert_eq!(statement.pretty_print(false, 0, 0), "bus : u16");
    }

    #[test]
    fn assignment_is_right_associative() {
        let statement = parse_one("a = b = c;");

        assert_eq!(statement.pretty_print(false, 0, 0), "a = b = c");

        match statement.data {
            AstNodeData::Assignment(lhs, rhs) => {
                assert_eq!(lhs.data, AstNodeData::Identifier("a".to_string()));
                assert_matches!(rhs.data, AstNodeData::Assignment(_, _));
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn operator_precedence() {
        assert_eq!(parse_one("x = a + b * c;").pretty_print(false, 0, 0), "x = a + b * c");
        assert_eq!(parse_one("x = (a + b) * c;").pretty_print(false, 0, 0), "x = (a + b) * c");
        assert_eq!(parse_one("x = a == b % 2;").pretty_print(false, 0, 0), "x = a == b % 2");
        assert_eq!(parse_one("x = a - b - c;").pretty_print(false, 0, 0), "x = a - b - c");
    }

    #[test]
    fn module_expression() {
        let statement = parse_one("top = module { a: int; b: int; a = b; };");

        assert_eq!(statement.pretty_print(false, 0, 0),
            "top = module {\n\ta : int;\n\tb : int;\n\ta = b;\n}");
    }

    #[test]
    fn nested_modules() {
        let statement = parse_one("top = module { inner:; inner = module { a: int; }; };");

        match statement.data {
            AstNodeData::Assignment(_, rhs) => {
                match rhs.data {
                    AstNodeData::Module(members) => assert_eq!(members.len(), 2),
                    other => panic!("expected module, got {:?}", other),
                }
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn multiple_top_level_statements() {
        let statements = parse("a: int;\nb: int;\na = b;\n").unwrap();

        assert_eq!(statements.len(), 3);
        assert_eq!(statements[2].location.line, 3);
    }

    #[test]
    fn missing_semicolon() {
        let result = parse("a = b");

        assert_matches!(result, Err(_));
        if let Err(err) = result {
            assert_matches!(err.kind, ErrorKind::UnexpectedToken(_, TokenKind::Semicolon, TokenKind::EndOfFile));
        }
    }

    #[test]
    fn keyword_in_expression_position() {
        let result = parse("a = int;");

        assert_matches!(result, Err(_));
        if let Err(err) = result {
            assert_matches!(err.kind, ErrorKind::ExpectedConstruct(_, _, TokenKind::IntKeyword));
        }
    }
}
