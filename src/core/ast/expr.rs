use std::fmt;

use codespan::Span;

use crate::core::ast::AstNode;
use crate::core::types::AstType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    Modulo,   // %
    Exponent, // ^e
    Eq,       // ==
    Ne,       // !=
    Lt,       // <
    Le,       // <=
    Gt,       // >
    Ge,       // >=
    And,      // &&
    Or,       // ||
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<BinaryOp> {
        let op = match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Modulo,
            "^e" => BinaryOp::Exponent,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Exponent => "^e",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Comparison and logical operators always produce bool.
    pub fn produces_bool(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::And
                | BinaryOp::Or
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Subtract
                | BinaryOp::Multiply
                | BinaryOp::Divide
                | BinaryOp::Modulo
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,    // -
    Not,       // !
    Increment, // ++
    Decrement, // --
}

impl UnaryOp {
    pub fn from_symbol(symbol: &str) -> Option<UnaryOp> {
        let op = match symbol {
            "-" => UnaryOp::Negate,
            "!" => UnaryOp::Not,
            "++" => UnaryOp::Increment,
            "--" => UnaryOp::Decrement,
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub op: BinaryOp,
    pub left: Box<AstNode>,
    pub right: Box<AstNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub op: UnaryOp,
    pub operand: Box<AstNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TernaryExpression {
    pub condition: Box<AstNode>,
    pub consequent: Box<AstNode>,
    pub alternate: Box<AstNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: Box<AstNode>,
    pub property: Box<AstNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Box<AstNode>,
    pub type_args: Vec<AstType>,
    pub args: Vec<AstNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpression {
    pub items: Vec<AstNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpression {
    pub properties: Vec<Property>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: Box<AstNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleExpression {
    pub items: Vec<AstNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpression {
    pub lower: Box<AstNode>,
    pub upper: Box<AstNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhenExpression {
    pub subject: Box<AstNode>,
    pub cases: Vec<WhenCase>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhenCase {
    pub values: Vec<AstNode>,
    pub consequent: Box<AstNode>,
    pub span: Span,
}

/// A type used in expression position, e.g. a bare type argument.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpression {
    pub type_: AstType,
    pub span: Span,
}
