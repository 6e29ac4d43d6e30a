use codespan::Span;

use crate::core::types::NumberSize;

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    Int,
    Decimal,
}

/// A numeric literal together with every size able to hold it losslessly.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub format: NumberFormat,
    /// Source text of the literal, underscores stripped, sign preserved.
    pub value: String,
    pub possible_sizes: Vec<NumberSize>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolLiteral {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathLiteral {
    pub value: String,
    pub span: Span,
}

/// A regex literal whose pattern compiled and whose flags were recognized.
#[derive(Debug, Clone, PartialEq)]
pub struct RegexLiteral {
    pub pattern: String,
    pub flags: String,
    pub span: Span,
}
