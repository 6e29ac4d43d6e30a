use std::fmt;

/// Every node kind the parser can emit. Grammar shape is implicit in the
/// kind; it is enforced by the lowering handlers, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CstKind {
    ArgumentsList,
    ArrayExpression,
    ArrayOf,
    AssignmentOperator,
    BinaryExpression,
    BlockStatement,
    BoolLiteral,
    CallExpression,
    ClassDeclaration,
    ColonSeparator,
    CommaSeparator,
    Comment,
    ExtensionsList,
    FunctionDeclaration,
    FunctionReturns,
    Identifier,
    ImplementsList,
    ImportDeclaration,
    InterfaceDeclaration,
    MemberExpression,
    Modifier,
    ModifiersList,
    NumberLiteral,
    ObjectExpression,
    Parameter,
    ParametersList,
    Path,
    PrintStatement,
    Program,
    Property,
    RangeExpression,
    RegularExpression,
    ReturnStatement,
    SemicolonSeparator,
    StringLiteral,
    TernaryAlternate,
    TernaryCondition,
    TernaryConsequent,
    TernaryExpression,
    TupleExpression,
    Type,
    TypeArgumentsList,
    UnaryExpression,
    VariableDeclaration,
    WhenCase,
    WhenCaseConsequent,
    WhenCaseValues,
    WhenExpression,
}

impl CstKind {
    /// Kinds that may appear anywhere a value is expected.
    pub const ASSIGNABLE: &'static [CstKind] = &[
        CstKind::ArrayExpression,
        CstKind::BinaryExpression,
        CstKind::BoolLiteral,
        CstKind::CallExpression,
        CstKind::FunctionDeclaration,
        CstKind::Identifier,
        CstKind::MemberExpression,
        CstKind::NumberLiteral,
        CstKind::ObjectExpression,
        CstKind::Path,
        CstKind::RangeExpression,
        CstKind::RegularExpression,
        CstKind::StringLiteral,
        CstKind::TernaryExpression,
        CstKind::TupleExpression,
        CstKind::UnaryExpression,
        CstKind::WhenExpression,
    ];

    /// Kinds that may appear where a type annotation is expected.
    pub const TYPES: &'static [CstKind] = &[
        CstKind::Type,
        CstKind::ArrayOf,
        CstKind::Identifier,
        CstKind::MemberExpression,
    ];

    /// Kinds allowed as the lower/upper bound of a range.
    pub const RANGE_BOUNDS: &'static [CstKind] = &[
        CstKind::NumberLiteral,
        CstKind::Identifier,
        CstKind::MemberExpression,
        CstKind::CallExpression,
        CstKind::UnaryExpression,
    ];

    /// Separator and comment kinds that lower to a skip marker.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            CstKind::Comment
                | CstKind::CommaSeparator
                | CstKind::ColonSeparator
                | CstKind::SemicolonSeparator
        )
    }
}

impl fmt::Display for CstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
