use std::fmt;

use crate::core::types::size::NumberSize;

/// The type language of the analyzer: primitives, concrete numeric sizes and
/// structural shapes. Equality is tag plus deep structural equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AstType {
    Bool,
    String,
    Path,
    Regex,
    Number(NumberSize),
    Array(Box<AstType>),
    Tuple(Vec<AstType>),
    Object(Vec<ObjectField>),
    Function(FunctionShape),
    Range,
    /// A user-defined type referenced by name or member path.
    Named(TypePath),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectField {
    pub name: String,
    pub type_: AstType,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub params: Vec<AstType>,
    pub returns: Vec<AstType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypePath {
    pub segments: Vec<String>,
}

impl TypePath {
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }
}

impl AstType {
    /// Resolve a primitive type name; `None` means the name is user-defined.
    pub fn from_name(name: &str) -> Option<AstType> {
        match name {
            "bool" => Some(AstType::Bool),
            "string" => Some(AstType::String),
            "path" => Some(AstType::Path),
            "regex" => Some(AstType::Regex),
            "range" => Some(AstType::Range),
            _ => NumberSize::from_name(name).map(AstType::Number),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, AstType::Number(_))
    }

    /// Whether a declared annotation accepts an inferred candidate. Numbers
    /// match at size granularity; structural types match by deep equality.
    pub fn accepts(&self, inferred: &AstType) -> bool {
        match (self, inferred) {
            (AstType::Array(declared), AstType::Array(candidate)) => declared.accepts(candidate),
            (declared, candidate) => declared == candidate,
        }
    }
}

impl fmt::Display for AstType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstType::Bool => write!(f, "bool"),
            AstType::String => write!(f, "string"),
            AstType::Path => write!(f, "path"),
            AstType::Regex => write!(f, "regex"),
            AstType::Range => write!(f, "range"),
            AstType::Number(size) => write!(f, "{size}"),
            AstType::Array(element) => write!(f, "{element}[]"),
            AstType::Tuple(items) => {
                write!(f, "(")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            AstType::Object(fields) => {
                write!(f, "{{")?;
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.type_)?;
                }
                write!(f, "}}")
            }
            AstType::Function(shape) => {
                write!(f, "f (")?;
                for (index, param) in shape.params.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ")")?;
                if !shape.returns.is_empty() {
                    write!(f, " -> ")?;
                    for (index, ret) in shape.returns.iter().enumerate() {
                        if index > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{ret}")?;
                    }
                }
                Ok(())
            }
            AstType::Named(path) => write!(f, "{}", path.segments.join(".")),
        }
    }
}
