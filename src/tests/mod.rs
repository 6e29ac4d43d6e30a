mod analyzer_tests;

use codespan::{Files, Span};

use crate::cst::{CstKind, CstNode};
use crate::semantic::SemanticAnalyzer;

pub(crate) fn span(start: u32, end: u32) -> Span {
    Span::new(start, end)
}

pub(crate) fn leaf(kind: CstKind, value: &str, start: u32, end: u32) -> CstNode {
    CstNode::new(kind, span(start, end)).with_value(value)
}

pub(crate) fn branch(kind: CstKind, start: u32, end: u32, children: Vec<CstNode>) -> CstNode {
    CstNode::new(kind, span(start, end)).with_children(children)
}

pub(crate) fn analyzer(source: &str) -> SemanticAnalyzer<'_> {
    let mut files = Files::new();
    let file_id = files.add("test.gn", source.to_string());
    SemanticAnalyzer::new(source, file_id)
}
