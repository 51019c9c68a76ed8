
use std::collections::HashMap;

use super::lexer::Location;
use super::symbol::{Symbol, SymbolId};

/// Handle into the scope arena
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScopeId(usize);

/// A single lexical scope: a name-to-symbol mapping, a parent link and a
/// display name used to build qualified names.
#[derive(Debug)]
struct Scope {
    name: Option<String>,
    parent: Option<ScopeId>,
    symbols: HashMap<String, SymbolId>,
}

/// All scopes and symbols of one compilation run.
///
/// Scopes form a tree rooted in the single global scope, linked by handles
/// instead of back-references so that renaming a scope is a plain field
/// write. Symbols live in the same arena and outlive any rebinding of their
/// name.
#[derive(Debug)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
}

impl ScopeArena {
    /// Create an arena holding only the unnamed global scope
    pub fn new() -> ScopeArena {
        ScopeArena {
            scopes: vec![Scope {
                name: None,
                parent: None,
                symbols: HashMap::new(),
            }],
            symbols: Vec::new(),
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            name: None,
            parent: Some(parent),
            symbols: HashMap::new(),
        });

        ScopeId(self.scopes.len() - 1)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0].parent
    }

    pub fn scope_name(&self, scope: ScopeId) -> Option<&str> {
        self.scopes[scope.0].name.as_deref()
    }

    pub fn set_scope_name(&mut self, scope: ScopeId, name: String) {
        self.scopes[scope.0].name = Some(name);
    }

    /// Declare `name` in `scope` and return the new symbol.
    ///
    /// Redefinition in the same scope silently overwrites the previous
    /// binding; the earlier symbol stays alive for anything already
    /// referring to it.
    pub fn define(&mut self, scope: ScopeId, location: Location, name: &str) -> SymbolId {
        let id = self.alloc_symbol(scope, location, name);

        self.scopes[scope.0].symbols.insert(name.to_string(), id);

        id
    }

    /// Create a symbol that is recorded in no scope mapping.
    ///
    /// Used as the resilient result of a failed lookup: it carries the
    /// attempted name, so downstream stages can treat it like any other
    /// symbol, but no later lookup will ever find it.
    pub fn placeholder(&mut self, scope: ScopeId, location: Location, name: &str) -> SymbolId {
        self.alloc_symbol(scope, location, name)
    }

    fn alloc_symbol(&mut self, scope: ScopeId, location: Location, name: &str) -> SymbolId {
        self.symbols.push(Symbol {
            location,
            name: name.to_string(),
            value: None,
            scope,
        });

        SymbolId(self.symbols.len() - 1)
    }

    /// Find `name` in `scope` or the nearest ancestor defining it
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);

        while let Some(scope) = current {
            if let Some(&id) = self.scopes[scope.0].symbols.get(name) {
                return Some(id);
            }

            current = self.scopes[scope.0].parent;
        }

        None
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    /// Dot-joined path of enclosing scope display names leading to the
    /// symbol.
    ///
    /// The walk stops below the scope whose parent is the global scope, so
    /// neither the global scope nor the outermost module contribute a
    /// segment. A scope that has no display name yet contributes `???`.
    /// The result is computed from the current scope names on every call,
    /// never cached.
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let symbol = self.symbol(id);

        let mut result = symbol.name.clone();
        let mut scope = symbol.scope;

        loop {
            let parent = match self.scopes[scope.0].parent {
                Some(parent) => parent,
                None => break,
            };

            if parent == self.global() {
                break;
            }

            let segment = self.scope_name(scope).unwrap_or("???");
            result = format!("{}.{}", segment, result);

            scope = parent;
        }

        result
    }
}
