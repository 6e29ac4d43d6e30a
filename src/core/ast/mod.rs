pub mod decl;
pub mod expr;
pub mod literal;
pub mod stmt;

pub use decl::*;
pub use expr::*;
pub use literal::*;
pub use stmt::*;

use codespan::Span;

/// The closed set of lowered constructs. Each variant is produced exactly
/// once by its handler and is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Program(Program),

    // atoms
    Identifier(Identifier),
    NumberLiteral(NumberLiteral),
    StringLiteral(StringLiteral),
    BoolLiteral(BoolLiteral),
    PathLiteral(PathLiteral),
    RegexLiteral(RegexLiteral),

    // expressions
    ArrayExpression(ArrayExpression),
    BinaryExpression(BinaryExpression),
    CallExpression(CallExpression),
    MemberExpression(MemberExpression),
    ObjectExpression(ObjectExpression),
    Property(Property),
    RangeExpression(RangeExpression),
    TernaryExpression(TernaryExpression),
    TupleExpression(TupleExpression),
    TypeExpression(TypeExpression),
    UnaryExpression(UnaryExpression),
    WhenExpression(WhenExpression),
    WhenCase(WhenCase),

    // declarations
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    Parameter(Parameter),
    ClassDeclaration(ClassDeclaration),
    InterfaceDeclaration(InterfaceDeclaration),
    ImportDeclaration(ImportDeclaration),
    Modifier(Modifier),

    // statements
    BlockStatement(BlockStatement),
    ReturnStatement(ReturnStatement),
    PrintStatement(PrintStatement),

    /// Marker for comments and separators; filtered out by containers.
    Skip(Skip),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<AstNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skip {
    pub span: Span,
}

impl AstNode {
    pub fn span(&self) -> Span {
        match self {
            AstNode::Program(node) => node.span,
            AstNode::Identifier(node) => node.span,
            AstNode::NumberLiteral(node) => node.span,
            AstNode::StringLiteral(node) => node.span,
            AstNode::BoolLiteral(node) => node.span,
            AstNode::PathLiteral(node) => node.span,
            AstNode::RegexLiteral(node) => node.span,
            AstNode::ArrayExpression(node) => node.span,
            AstNode::BinaryExpression(node) => node.span,
            AstNode::CallExpression(node) => node.span,
            AstNode::MemberExpression(node) => node.span,
            AstNode::ObjectExpression(node) => node.span,
            AstNode::Property(node) => node.span,
            AstNode::RangeExpression(node) => node.span,
            AstNode::TernaryExpression(node) => node.span,
            AstNode::TupleExpression(node) => node.span,
            AstNode::TypeExpression(node) => node.span,
            AstNode::UnaryExpression(node) => node.span,
            AstNode::WhenExpression(node) => node.span,
            AstNode::WhenCase(node) => node.span,
            AstNode::VariableDeclaration(node) => node.span,
            AstNode::FunctionDeclaration(node) => node.span,
            AstNode::Parameter(node) => node.span,
            AstNode::ClassDeclaration(node) => node.span,
            AstNode::InterfaceDeclaration(node) => node.span,
            AstNode::ImportDeclaration(node) => node.span,
            AstNode::Modifier(node) => node.span,
            AstNode::BlockStatement(node) => node.span,
            AstNode::ReturnStatement(node) => node.span,
            AstNode::PrintStatement(node) => node.span,
            AstNode::Skip(node) => node.span,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, AstNode::Skip(_))
    }
}
