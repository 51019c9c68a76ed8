
use std::io::Write;

use serde::Serialize;

use super::{lower_statement, Error, ErrorKind};
use crate::frontend::symbol_table::ScopeArena;
use crate::shared::intermediate::Elaboration;

#[derive(Debug, Serialize)]
struct StatementData {
    lhs: String,
    rhs: String,
}

#[derive(Debug, Serialize)]
struct ModuleData {
    name: String,
    signals: Vec<String>,
    statements: Vec<StatementData>,
}

#[derive(Debug, Serialize)]
struct NetlistData {
    modules: Vec<ModuleData>,
}

/// Serialize the module registry as a JSON netlist for other tooling.
///
/// Same content as the structural text emitter, same statement dispatch
/// rules, different surface.
pub fn emit<W: Write>(elaboration: &Elaboration, scopes: &ScopeArena, writer: &mut W) -> Result<(), Error> {
    let mut modules = Vec::new();

    for module in elaboration.modules() {
        let signals = module.signals.iter()
            .map(|&id| scopes.symbol(id).name.clone())
            .collect();

        let mut statements = Vec::new();

        for statement in &module.statements {
            if let Some((lhs, rhs)) = lower_statement(statement, scopes)? {
                statements.push(StatementData {
                    lhs,
                    rhs,
                });
            }
        }

        modules.push(ModuleData {
            name: module.name.clone(),
            signals,
            statements,
        });
    }

    serde_json::to_writer_pretty(writer, &NetlistData { modules })
        .map_err(|err| Error::with_source(ErrorKind::Json, err))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::rc::Rc;

    use serde_json::Value;

    use crate::frontend::ast::AstNode;
    use crate::frontend::elaborator::Elaborator;
    use crate::frontend::lexer::{Lexer, Location};
    use crate::frontend::parser::Parser;
    use crate::shared::diagnostics::Reporter;

    fn compile(source: &str) -> Value {
        let lexer = Lexer::new("test.rtl", Cursor::new(source));
        let statements = Parser::new(lexer).unwrap().parse().unwrap();
        let root = AstNode::module(Location::new(Rc::from("test.rtl"), 1), statements);

        let mut reporter = Reporter::new(Vec::new());
        let (scopes, elaboration) = Elaborator::new(&mut reporter).run(&root).unwrap();

        let mut output = Vec::new();
        emit(&elaboration, &scopes, &mut output).unwrap();

        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn netlist_structure() {
        let value = compile("top: int; top = module { a: int; b: int; a = b; };");

        let modules = value["modules"].as_array().unwrap();
        assert_eq!(modules.len(), 2);

        assert_eq!(modules[0]["name"], "top");
        assert_eq!(modules[0]["signals"], serde_json::json!(["a", "b"]));
        assert_eq!(modules[0]["statements"][0]["lhs"], "a");
        assert_eq!(modules[0]["statements"][0]["rhs"], "b");

        assert_eq!(modules[1]["name"], "__top");
        assert_eq!(modules[1]["statements"].as_array().unwrap().len(), 0);
    }
}
