use codespan::Span;

use crate::core::ast::AstNode;

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<AstNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub values: Vec<AstNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStatement {
    pub values: Vec<AstNode>,
    pub span: Span,
}
