use codespan::Span;

use crate::cst::CstKind;

/// One node of the parser's concrete syntax tree.
///
/// Child presence, order and arity vary per construct; the lowering engine
/// validates them against a declarative shape description. The tree is never
/// mutated by this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct CstNode {
    pub kind: CstKind,
    /// Literal text for leaf nodes (identifier names, literal values,
    /// operator symbols, declaration keywords).
    pub value: Option<String>,
    pub span: Span,
    pub children: Vec<CstNode>,
}

impl CstNode {
    pub fn new(kind: CstKind, span: Span) -> Self {
        Self {
            kind,
            value: None,
            span,
            children: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<CstNode>) -> Self {
        self.children = children;
        self
    }

    /// Literal text of the node, or `""` when absent.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}
