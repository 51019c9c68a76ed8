
use num_bigint::BigInt;

use crate::frontend::lexer::Location;
use crate::frontend::symbol::SymbolId;
use crate::frontend::symbol_table::ScopeId;

/// Handle into the module registry of an `Elaboration`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModuleId(usize);

/// Scope-resolved counterpart of the syntax tree.
///
/// Unlike `AstNode`, identifiers are resolved to symbols and module
/// expressions to registered modules.
#[derive(Debug)]
pub enum SemNodeData {
    Nil,
    Number(BigInt),
    Symbol(SymbolId),
    Assignment(Box<SemNode>, Box<SemNode>),
    Module(ModuleId),
}

#[derive(Debug)]
pub struct SemNode {
    pub data: SemNodeData,
    pub location: Location,
}

impl SemNode {
    pub fn nil(location: Location) -> SemNode {
        SemNode {
            data: SemNodeData::Nil,
            location,
        }
    }

    pub fn number(location: Location, value: BigInt) -> SemNode {
        SemNode {
            data: SemNodeData::Number(value),
            location,
        }
    }

    pub fn symbol(location: Location, symbol: SymbolId) -> SemNode {
        SemNode {
            data: SemNodeData::Symbol(symbol),
            location,
        }
    }

    pub fn assignment(location: Location, lhs: SemNode, rhs: SemNode) -> SemNode {
        SemNode {
            data: SemNodeData::Assignment(Box::new(lhs), Box::new(rhs)),
            location,
        }
    }

    pub fn module(location: Location, module: ModuleId) -> SemNode {
        SemNode {
            data: SemNodeData::Module(module),
            location,
        }
    }

    pub fn is_nil(&self) -> bool {
        match self.data {
            SemNodeData::Nil => true,
            _ => false,
        }
    }

    /// Variant name for internal-consistency diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self.data {
            SemNodeData::Nil => "nil",
            SemNodeData::Number(_) => "number",
            SemNodeData::Symbol(_) => "symbol",
            SemNodeData::Assignment(..) => "assignment",
            SemNodeData::Module(_) => "module reference",
        }
    }
}

/// One unit of hierarchy.
///
/// `name` starts out as `__top` or a generated temporary and may be
/// overwritten exactly once when the module expression is bound to a
/// symbol. `signals` holds the declared symbols in declaration order.
#[derive(Debug)]
pub struct Module {
    pub name: String,
    pub scope: ScopeId,
    pub statements: Vec<SemNode>,
    pub signals: Vec<SymbolId>,
}

impl Module {
    pub fn new(name: String, scope: ScopeId) -> Module {
        Module {
            name,
            scope,
            statements: Vec::new(),
            signals: Vec::new(),
        }
    }
}

/// Ordered registry of every module discovered during one elaboration
/// pass. Registration order is emission order; a module body finishes
/// elaborating before its parent, so children precede their parents.
#[derive(Debug)]
pub struct Elaboration {
    modules: Vec<Module>,
}

impl Elaboration {
    pub fn new() -> Elaboration {
        Elaboration {
            modules: Vec::new(),
        }
    }

    pub fn register(&mut self, module: Module) -> ModuleId {
        self.modules.push(module);

        ModuleId(self.modules.len() - 1)
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0]
    }

    pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.0]
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }
}
