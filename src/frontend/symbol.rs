
use super::lexer::Location;
use super::symbol_table::ScopeId;
use crate::shared::intermediate::ModuleId;

/// One declared name.
///
/// `scope` is the scope the symbol was declared within; qualified names are
/// derived from it on demand. `value` is only set when the symbol is later
/// bound to a module by a binding assignment.
#[derive(Debug)]
pub struct Symbol {
    pub location: Location,
    pub name: String,
    pub value: Option<ModuleId>,
    pub scope: ScopeId,
}

/// Handle into the symbol arena of a `ScopeArena`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SymbolId(pub(super) usize);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0
    }
}
