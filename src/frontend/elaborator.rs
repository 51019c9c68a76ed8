
use std::io::Write;

use derive_more::Display;

use super::ast::{AstNode, AstNodeData};
use super::lexer::Location;
use super::symbol_table::{ScopeArena, ScopeId};
use crate::shared::diagnostics::Reporter;
use crate::shared::error;
use crate::shared::intermediate::{Elaboration, Module, SemNode, SemNodeData};

#[derive(Debug, Display)]
pub enum ErrorKind {
    #[display(fmt = "internal error: cannot elaborate {} at {}", _0, _1)]
    UnsupportedConstruct(&'static str, Location),
    #[display(fmt = "internal error: declaration outside of a module at {}", _0)]
    DeclarationOutsideModule(Location),
}

pub type Error = error::Error<ErrorKind>;

/// Recursively evaluates the syntax tree under lexical scopes into the
/// semantic tree, deciding module identity and naming along the way.
///
/// All per-run mutable state lives here: the scope tree, the ordered module
/// registry, the temporary-name counter and the diagnostics reporter.
/// Undefined references are reported and elaboration carries on with a
/// placeholder; a syntax tree variant this stage has no case for is a
/// contract violation with the parser and aborts the run.
pub struct Elaborator<'a, W: Write> {
    scopes: ScopeArena,
    elaboration: Elaboration,
    temp_index: usize,
    reporter: &'a mut Reporter<W>,
}

impl<'a, W: Write> Elaborator<'a, W> {
    pub fn new(reporter: &'a mut Reporter<W>) -> Elaborator<'a, W> {
        Elaborator {
            scopes: ScopeArena::new(),
            elaboration: Elaboration::new(),
            temp_index: 0,
            reporter,
        }
    }

    /// Elaborate the root node (the outermost module expression) and hand
    /// back the scope tree and the module registry
    pub fn run(mut self, root: &AstNode) -> Result<(ScopeArena, Elaboration), Error> {
        let global = self.scopes.global();

        self.elaborate(root, global, None)?;

        Ok((self.scopes, self.elaboration))
    }

    fn temp_name(&mut self) -> String {
        self.temp_index += 1;

        format!("__{}", self.temp_index)
    }

    fn elaborate(&mut self, node: &AstNode, scope: ScopeId, mut module: Option<&mut Module>) -> Result<SemNode, Error> {
        match &node.data {
            AstNodeData::Nil => Ok(SemNode::nil(node.location.clone())),
            // Literals are carried through unchanged, no evaluation
            AstNodeData::Number(value) => Ok(SemNode::number(node.location.clone(), value.clone())),
            AstNodeData::Identifier(name) => {
                let symbol = match self.scopes.lookup(scope, name) {
                    Some(symbol) => symbol,
                    None => {
                        self.reporter.report(&node.location, format_args!("{} undefined", name));

                        // Continue with a placeholder carrying the attempted
                        // name so later statements are still checked
                        self.scopes.placeholder(scope, node.location.clone(), name)
                    },
                };

                Ok(SemNode::symbol(node.location.clone(), symbol))
            },
            AstNodeData::Module(members) => {
                let module_scope = self.scopes.new_scope(scope);

                let name = if scope == self.scopes.global() {
                    "__top".to_string()
                } else {
                    self.temp_name()
                };
                self.scopes.set_scope_name(module_scope, name.clone());

                let mut new_module = Module::new(name, module_scope);

                for member in members {
                    let statement = self.elaborate(member, module_scope, Some(&mut new_module))?;

                    if !statement.is_nil() {
                        new_module.statements.push(statement);
                    }
                }

                // Children registered themselves while the body was
                // elaborated, so they precede their parent
                let id = self.elaboration.register(new_module);

                Ok(SemNode::module(node.location.clone(), id))
            },
            AstNodeData::Assignment(lhs_node, rhs_node) => {
                let lhs = self.elaborate(lhs_node, scope, module.as_deref_mut())?;
                let rhs = self.elaborate(rhs_node, scope, module.as_deref_mut())?;

                if let (&SemNodeData::Symbol(symbol), &SemNodeData::Module(module_id)) = (&lhs.data, &rhs.data) {
                    // Binding assignment: the module takes the symbol's
                    // qualified name as computed right now, and the
                    // assignment itself is absorbed into naming
                    let qualified = self.scopes.qualified_name(symbol);

                    self.elaboration.module_mut(module_id).name = qualified.clone();

                    let module_scope = self.elaboration.module(module_id).scope;
                    self.scopes.set_scope_name(module_scope, qualified);

                    self.scopes.symbol_mut(symbol).value = Some(module_id);

                    return Ok(rhs);
                }

                Ok(SemNode::assignment(node.location.clone(), lhs, rhs))
            },
            AstNodeData::Declaration { name, .. } => {
                let module = match module {
                    Some(module) => module,
                    None => return Err(ErrorKind::DeclarationOutsideModule(node.location.clone()).into()),
                };

                let symbol = self.scopes.define(scope, node.location.clone(), name);

                // Declaration order is signal order
                module.signals.push(symbol);

                Ok(SemNode::symbol(node.location.clone(), symbol))
            },
            // Type/attribute analysis has not lowered these yet; reaching
            // them here is a contract violation, not a user error
            AstNodeData::Binary(..) | AstNodeData::UnsizedNumber(_) => {
                Err(ErrorKind::UnsupportedConstruct(node.kind_name(), node.location.clone()).into())
            },
        }
    }
}
