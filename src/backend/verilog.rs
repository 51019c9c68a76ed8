
use std::io::Write;

use super::{lower_statement, Error};
use crate::frontend::symbol_table::ScopeArena;
use crate::shared::intermediate::{Elaboration, Module};

/// Render every registered module as a structural text block, in
/// registration order.
pub fn emit<W: Write>(elaboration: &Elaboration, scopes: &ScopeArena, writer: &mut W) -> Result<(), Error> {
    for module in elaboration.modules() {
        emit_module(module, scopes, writer)?;
    }

    Ok(())
}

fn emit_module<W: Write>(module: &Module, scopes: &ScopeArena, writer: &mut W) -> Result<(), Error> {
    writeln!(writer, "module {}(", module.name)?;

    for &signal in &module.signals {
        writeln!(writer, "{}", scopes.symbol(signal).name)?;
    }

    writeln!(writer, ");")?;

    for statement in &module.statements {
        if let Some((lhs, rhs)) = lower_statement(statement, scopes)? {
            writeln!(writer, "\tassign {} = {};", lhs, rhs)?;
        }
    }

    writeln!(writer, "endmodule")?;
    writeln!(writer)?;

    Ok(())
}
