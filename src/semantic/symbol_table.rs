use std::collections::HashMap;

use thiserror::Error;

use crate::core::types::AstType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Variable { mutable: bool },
    Parameter,
    Function,
    Class,
    Interface,
    Import,
}

/// One declared name and every type ever observed for it. The `types` list
/// only grows within a pass, never shrinks.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub types: Vec<AstType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("`{name}` is not defined in any visible scope")]
    Undefined { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScopeId(usize);

/// One lexical binding environment. Scopes live in the table's arena and
/// reference their parent and children by index, so a popped scope stays
/// reachable from its parent for later introspection.
#[derive(Debug, Default)]
struct Scope {
    symbols: HashMap<String, Symbol>,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
}

#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    active: ScopeId,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            active: ScopeId(0),
        }
    }

    /// Create a child of the active scope and make it active.
    pub fn push_scope(&mut self) {
        let child = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(self.active),
            ..Scope::default()
        });
        let active = self.active;
        self.scopes[active.0].children.push(child);
        self.active = child;
    }

    /// Activate the parent of the active scope. At the top, a fresh root is
    /// created lazily and the old root becomes its first child.
    pub fn pop_scope(&mut self) {
        match self.scopes[self.active.0].parent {
            Some(parent) => self.active = parent,
            None => {
                let root = ScopeId(self.scopes.len());
                self.scopes.push(Scope {
                    children: vec![self.active],
                    ..Scope::default()
                });
                self.scopes[self.active.0].parent = Some(root);
                self.active = root;
            }
        }
    }

    /// Record a name in the active scope. Redeclaring a name in the same
    /// scope replaces the previous binding.
    pub fn define(&mut self, name: impl Into<String>, kind: SymbolKind, types: Vec<AstType>) {
        let name = name.into();
        let symbol = Symbol {
            name: name.clone(),
            kind,
            types,
        };
        self.scopes[self.active.0].symbols.insert(name, symbol);
    }

    pub fn assign_kind(&mut self, name: &str, kind: SymbolKind) -> Result<(), SymbolError> {
        let symbol = self.lookup_mut(name)?;
        symbol.kind = kind;
        Ok(())
    }

    /// Extend a symbol's observed types; duplicates are dropped so the list
    /// stays a set. The list never shrinks.
    pub fn append_types(&mut self, name: &str, types: &[AstType]) -> Result<(), SymbolError> {
        let symbol = self.lookup_mut(name)?;
        for type_ in types {
            if !symbol.types.contains(type_) {
                symbol.types.push(type_.clone());
            }
        }
        Ok(())
    }

    /// Resolve a name against the active scope, then each ancestor outward.
    pub fn lookup(&self, name: &str) -> Result<&Symbol, SymbolError> {
        let mut current = Some(self.active);
        while let Some(scope_id) = current {
            let scope = &self.scopes[scope_id.0];
            if let Some(symbol) = scope.symbols.get(name) {
                return Ok(symbol);
            }
            current = scope.parent;
        }
        Err(SymbolError::Undefined {
            name: name.to_string(),
        })
    }

    fn lookup_mut(&mut self, name: &str) -> Result<&mut Symbol, SymbolError> {
        let mut current = Some(self.active);
        let mut found = None;
        while let Some(scope_id) = current {
            if self.scopes[scope_id.0].symbols.contains_key(name) {
                found = Some(scope_id);
                break;
            }
            current = self.scopes[scope_id.0].parent;
        }
        match found.and_then(|scope_id| self.scopes[scope_id.0].symbols.get_mut(name)) {
            Some(symbol) => Ok(symbol),
            None => Err(SymbolError::Undefined {
                name: name.to_string(),
            }),
        }
    }

    /// Number of scopes ever created, including popped ones.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
