
pub mod json;
pub mod verilog;

use std::io;

use derive_more::Display;

use crate::frontend::lexer::Location;
use crate::frontend::symbol_table::ScopeArena;
use crate::shared::error;
use crate::shared::intermediate::{SemNode, SemNodeData};

#[derive(Debug, Display)]
pub enum ErrorKind {
    #[display(fmt = "internal error: {} statement is not representable at {}", _0, _1)]
    UnsupportedStatement(&'static str, Location),
    #[display(fmt = "internal error: {} operand is not representable at {}", _0, _1)]
    UnsupportedOperand(&'static str, Location),
    #[display(fmt = "failed to write output")]
    Io,
    #[display(fmt = "failed to serialize netlist")]
    Json,
}

pub type Error = error::Error<ErrorKind>;

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::with_source(ErrorKind::Io, err)
    }
}

/// Supported output formats
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EmitFormat {
    Verilog,
    Json,
}

/// Lower an assignment operand to its textual form.
///
/// Symbols emit their bare name; the emitted unit is always scoped locally
/// to its own declaration block, so qualified names never appear here.
fn lower_operand(node: &SemNode, scopes: &ScopeArena) -> Result<String, Error> {
    match &node.data {
        SemNodeData::Symbol(id) => Ok(scopes.symbol(*id).name.clone()),
        SemNodeData::Number(value) => Ok(value.to_string()),
        _ => Err(ErrorKind::UnsupportedOperand(node.kind_name(), node.location.clone()).into()),
    }
}

/// Lower a module body statement to an assignment, or `None` for statement
/// kinds that are rendered elsewhere.
///
/// Bare symbols are declaration echoes already covered by the signal list,
/// and module references are bound children emitted through the registry.
/// Anything else reaching the emitter is a contract violation and is never
/// silently dropped.
fn lower_statement(statement: &SemNode, scopes: &ScopeArena) -> Result<Option<(String, String)>, Error> {
    match &statement.data {
        SemNodeData::Assignment(lhs, rhs) => {
            Ok(Some((lower_operand(lhs, scopes)?, lower_operand(rhs, scopes)?)))
        },
        SemNodeData::Symbol(_) | SemNodeData::Module(_) => Ok(None),
        SemNodeData::Nil | SemNodeData::Number(_) => {
            Err(ErrorKind::UnsupportedStatement(statement.kind_name(), statement.location.clone()).into())
        },
    }
}
