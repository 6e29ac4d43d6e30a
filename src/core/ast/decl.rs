use std::fmt;

use codespan::Span;

use crate::core::ast::literal::{Identifier, PathLiteral};
use crate::core::ast::stmt::BlockStatement;
use crate::core::ast::AstNode;
use crate::core::types::{AstType, TypePath};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    Pub,
    Static,
    Abstract,
}

impl ModifierKind {
    pub fn from_name(name: &str) -> Option<ModifierKind> {
        let kind = match name {
            "pub" => ModifierKind::Pub,
            "static" => ModifierKind::Static,
            "abstract" => ModifierKind::Abstract,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModifierKind::Pub => "pub",
            ModifierKind::Static => "static",
            ModifierKind::Abstract => "abstract",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub mutable: bool,
    pub modifiers: Vec<Modifier>,
    pub identifier: Identifier,
    pub declared_type: Option<AstType>,
    pub initial_value: Option<Box<AstNode>>,
    /// Possible types of the initializer, computed by the inference engine.
    pub inferred_types: Vec<AstType>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub identifier: Identifier,
    pub declared_type: Option<AstType>,
    pub default_value: Option<Box<AstNode>>,
    pub inferred_types: Vec<AstType>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub modifiers: Vec<Modifier>,
    /// Absent for anonymous functions used as values.
    pub identifier: Option<Identifier>,
    pub type_params: Vec<AstType>,
    pub params: Vec<Parameter>,
    pub return_types: Vec<AstType>,
    pub body: BlockStatement,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration {
    pub modifiers: Vec<Modifier>,
    pub identifier: Identifier,
    pub type_params: Vec<AstType>,
    pub extends: Vec<TypePath>,
    pub implements: Vec<TypePath>,
    pub body: BlockStatement,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDeclaration {
    pub modifiers: Vec<Modifier>,
    pub identifier: Identifier,
    pub type_params: Vec<AstType>,
    pub extends: Vec<TypePath>,
    pub body: BlockStatement,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    pub identifier: Identifier,
    pub source: PathLiteral,
    pub span: Span,
}
