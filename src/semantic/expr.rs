//! Per-construct lowering handlers for expressions and literals.

use regex::Regex;

use crate::core::ast::{
    ArrayExpression, AstNode, BinaryExpression, BinaryOp, BoolLiteral, CallExpression, Identifier,
    MemberExpression, NumberFormat, NumberLiteral, ObjectExpression, PathLiteral, Property,
    RangeExpression, RegexLiteral, StringLiteral, TernaryExpression, TupleExpression,
    UnaryExpression, UnaryOp, WhenCase, WhenExpression,
};
use crate::core::types::NumberSize;
use crate::cst::{CstKind, CstNode};
use crate::error::{AnalysisError, ErrorCode};
use crate::semantic::analyzer::SemanticAnalyzer;
use crate::semantic::shape::ChildDescriptor;

/// Regex flags the language recognizes.
const REGEX_FLAGS: &str = "gims";

const BINARY_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::required(
        CstKind::ASSIGNABLE,
        ErrorCode::MissingExpression,
        "a left-hand operand",
    ),
    ChildDescriptor::required(
        CstKind::ASSIGNABLE,
        ErrorCode::MissingExpression,
        "a right-hand operand",
    ),
];

const UNARY_SHAPE: &[ChildDescriptor] = &[ChildDescriptor::required(
    CstKind::ASSIGNABLE,
    ErrorCode::MissingExpression,
    "an operand",
)];

const TERNARY_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::required(
        &[CstKind::TernaryCondition],
        ErrorCode::MissingExpression,
        "a ternary condition",
    ),
    ChildDescriptor::required(
        &[CstKind::TernaryConsequent],
        ErrorCode::MissingExpression,
        "a ternary consequent",
    ),
    ChildDescriptor::required(
        &[CstKind::TernaryAlternate],
        ErrorCode::MissingExpression,
        "a ternary alternate",
    ),
];

const MEMBER_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::required(
        &[
            CstKind::Identifier,
            CstKind::MemberExpression,
            CstKind::CallExpression,
        ],
        ErrorCode::MissingExpression,
        "an object to access",
    ),
    ChildDescriptor::required(
        &[CstKind::Identifier, CstKind::NumberLiteral],
        ErrorCode::MissingIdentifier,
        "a property name or tuple index",
    ),
];

const CALL_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::required(
        &[CstKind::Identifier, CstKind::MemberExpression],
        ErrorCode::MissingExpression,
        "a callee",
    ),
    ChildDescriptor::optional(&[CstKind::TypeArgumentsList]),
    ChildDescriptor::optional(&[CstKind::ArgumentsList]),
];

const PROPERTY_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::required(
        &[CstKind::Identifier],
        ErrorCode::MissingIdentifier,
        "a property name",
    ),
    ChildDescriptor::required(
        CstKind::ASSIGNABLE,
        ErrorCode::MissingExpression,
        "a property value",
    ),
];

const RANGE_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::required(
        CstKind::RANGE_BOUNDS,
        ErrorCode::MissingExpression,
        "a lower bound",
    ),
    ChildDescriptor::required(
        CstKind::RANGE_BOUNDS,
        ErrorCode::MissingExpression,
        "an upper bound",
    ),
];

const WHEN_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::required(
        CstKind::ASSIGNABLE,
        ErrorCode::MissingExpression,
        "a subject to match on",
    ),
    ChildDescriptor::required(
        &[CstKind::BlockStatement],
        ErrorCode::MissingBody,
        "a block of when cases",
    ),
];

const WHEN_CASE_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::required(
        &[CstKind::WhenCaseValues],
        ErrorCode::MissingExpression,
        "the values of a when case",
    ),
    ChildDescriptor::required(
        &[CstKind::WhenCaseConsequent],
        ErrorCode::MissingExpression,
        "the consequent of a when case",
    ),
];

impl SemanticAnalyzer<'_> {
    // ---- atoms ----

    /// An identifier in expression position is a reference and must resolve
    /// to a symbol somewhere in the visible scope chain.
    pub(crate) fn lower_identifier_reference(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let identifier = self.identifier_from(node)?;
        if self.symbol_table().lookup(&identifier.name).is_err() {
            return Err(self.error(
                ErrorCode::UndefinedIdentifier,
                format!("`{}` is not defined in any visible scope", identifier.name),
                node.span,
            ));
        }
        Ok(AstNode::Identifier(identifier))
    }

    /// Build an identifier without resolving it, for declaration names and
    /// property names.
    pub(crate) fn identifier_from(&self, node: &CstNode) -> Result<Identifier, AnalysisError> {
        let name = node.text();
        if name.is_empty() {
            return Err(self.error(
                ErrorCode::MissingIdentifier,
                "an identifier must carry a name",
                node.span,
            ));
        }
        Ok(Identifier {
            name: name.to_string(),
            span: node.span,
        })
    }

    pub(crate) fn lower_number_literal(&self, node: &CstNode) -> Result<AstNode, AnalysisError> {
        let text = node.text().replace('_', "");
        let (format, possible_sizes) = if text.contains('.') {
            let value: f64 = text.parse().map_err(|_| {
                self.error(
                    ErrorCode::InvalidNumber,
                    format!("`{text}` is not a valid decimal literal"),
                    node.span,
                )
            })?;
            (NumberFormat::Decimal, NumberSize::sizes_for_decimal(value))
        } else {
            let value: i128 = text.parse().map_err(|_| {
                self.error(
                    ErrorCode::InvalidNumber,
                    format!("`{text}` is not a valid integer literal"),
                    node.span,
                )
            })?;
            (NumberFormat::Int, NumberSize::sizes_for_integer(value))
        };
        if possible_sizes.is_empty() {
            return Err(self.error(
                ErrorCode::InvalidNumber,
                format!("`{text}` does not fit any numeric size"),
                node.span,
            ));
        }
        Ok(AstNode::NumberLiteral(NumberLiteral {
            format,
            value: text,
            possible_sizes,
            span: node.span,
        }))
    }

    pub(crate) fn lower_string_literal(&self, node: &CstNode) -> Result<AstNode, AnalysisError> {
        Ok(AstNode::StringLiteral(StringLiteral {
            value: node.text().to_string(),
            span: node.span,
        }))
    }

    pub(crate) fn lower_bool_literal(&self, node: &CstNode) -> Result<AstNode, AnalysisError> {
        let value = match node.text() {
            "true" => true,
            "false" => false,
            other => {
                return Err(self.error(
                    ErrorCode::MissingKeyword,
                    format!("expected `true` or `false`, found `{other}`"),
                    node.span,
                ))
            }
        };
        Ok(AstNode::BoolLiteral(BoolLiteral {
            value,
            span: node.span,
        }))
    }

    pub(crate) fn lower_path_literal(&self, node: &CstNode) -> Result<AstNode, AnalysisError> {
        Ok(AstNode::PathLiteral(PathLiteral {
            value: node.text().to_string(),
            span: node.span,
        }))
    }

    /// Split `/pattern/flags`, check the flags against the recognized set
    /// and compile the pattern.
    pub(crate) fn lower_regex_literal(&self, node: &CstNode) -> Result<AstNode, AnalysisError> {
        let text = node.text();
        let body = text.strip_prefix('/').ok_or_else(|| {
            self.error(
                ErrorCode::InvalidRegularExpression,
                format!("`{text}` is not delimited by slashes"),
                node.span,
            )
        })?;
        let closing = body.rfind('/').ok_or_else(|| {
            self.error(
                ErrorCode::InvalidRegularExpression,
                format!("`{text}` is missing its closing slash"),
                node.span,
            )
        })?;
        let (pattern, flags) = (&body[..closing], &body[closing + 1..]);

        if let Some(flag) = flags.chars().find(|flag| !REGEX_FLAGS.contains(*flag)) {
            return Err(self.error(
                ErrorCode::InvalidRegularExpression,
                format!("`{flag}` is not a recognized regex flag"),
                node.span,
            ));
        }
        if let Err(source) = Regex::new(pattern) {
            return Err(self.error(
                ErrorCode::InvalidRegularExpression,
                format!("`{pattern}` does not compile: {source}"),
                node.span,
            ));
        }

        Ok(AstNode::RegexLiteral(RegexLiteral {
            pattern: pattern.to_string(),
            flags: flags.to_string(),
            span: node.span,
        }))
    }

    // ---- compound expressions ----

    pub(crate) fn lower_binary_expression(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let op = BinaryOp::from_symbol(node.text()).ok_or_else(|| {
            self.error(
                ErrorCode::UnknownOperator,
                format!("`{}` is not a binary operator", node.text()),
                node.span,
            )
        })?;
        let slots = self.shape(node, BINARY_SHAPE)?;
        let left = self.lower_slot(&slots, 0)?;
        let right = self.lower_slot(&slots, 1)?;
        Ok(AstNode::BinaryExpression(BinaryExpression {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span: node.span,
        }))
    }

    pub(crate) fn lower_unary_expression(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let op = UnaryOp::from_symbol(node.text()).ok_or_else(|| {
            self.error(
                ErrorCode::UnknownOperator,
                format!("`{}` is not a unary operator", node.text()),
                node.span,
            )
        })?;
        let slots = self.shape(node, UNARY_SHAPE)?;
        let operand = self.lower_slot(&slots, 0)?;
        Ok(AstNode::UnaryExpression(UnaryExpression {
            op,
            operand: Box::new(operand),
            span: node.span,
        }))
    }

    pub(crate) fn lower_ternary_expression(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let slots = self.shape(node, TERNARY_SHAPE)?;
        let condition = self.lower_slot(&slots, 0)?;
        let consequent = self.lower_slot(&slots, 1)?;
        let alternate = self.lower_slot(&slots, 2)?;
        Ok(AstNode::TernaryExpression(TernaryExpression {
            condition: Box::new(condition),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span: node.span,
        }))
    }

    pub(crate) fn lower_member_expression(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let slots = self.shape(node, MEMBER_SHAPE)?;
        let object = self.lower_slot(&slots, 0)?;
        // the property is a name on the object, not a scope reference
        let property_node = self.slot(&slots, 1);
        let property = match property_node.kind {
            CstKind::Identifier => AstNode::Identifier(self.identifier_from(property_node)?),
            _ => self.lower_number_literal(property_node)?,
        };
        Ok(AstNode::MemberExpression(MemberExpression {
            object: Box::new(object),
            property: Box::new(property),
            span: node.span,
        }))
    }

    pub(crate) fn lower_call_expression(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let slots = self.shape(node, CALL_SHAPE)?;
        let callee = self.lower_slot(&slots, 0)?;
        let type_args = self.lower_type_list(slots[1])?;
        let args = match slots[2] {
            Some(list) => self.lower_all(&list.children)?,
            None => Vec::new(),
        };
        Ok(AstNode::CallExpression(CallExpression {
            callee: Box::new(callee),
            type_args,
            args,
            span: node.span,
        }))
    }

    pub(crate) fn lower_array_expression(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        Ok(AstNode::ArrayExpression(ArrayExpression {
            items: self.lower_all(&node.children)?,
            span: node.span,
        }))
    }

    pub(crate) fn lower_tuple_expression(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        Ok(AstNode::TupleExpression(TupleExpression {
            items: self.lower_all(&node.children)?,
            span: node.span,
        }))
    }

    pub(crate) fn lower_object_expression(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let mut properties = Vec::new();
        for child in &node.children {
            if child.kind.is_trivia() {
                continue;
            }
            if child.kind != CstKind::Property {
                return Err(self.error(
                    ErrorCode::ExtraNodesFound,
                    format!("unexpected {} in an object expression", child.kind),
                    child.span,
                ));
            }
            properties.push(self.property_from(child)?);
        }
        Ok(AstNode::ObjectExpression(ObjectExpression {
            properties,
            span: node.span,
        }))
    }

    pub(crate) fn lower_property(&mut self, node: &CstNode) -> Result<AstNode, AnalysisError> {
        self.property_from(node).map(AstNode::Property)
    }

    fn property_from(&mut self, node: &CstNode) -> Result<Property, AnalysisError> {
        let slots = self.shape(node, PROPERTY_SHAPE)?;
        let name = self.identifier_from(self.slot(&slots, 0))?;
        let value = self.lower_slot(&slots, 1)?;
        Ok(Property {
            name: name.name,
            value: Box::new(value),
            span: node.span,
        })
    }

    pub(crate) fn lower_range_expression(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let slots = self.shape(node, RANGE_SHAPE)?;
        let lower = self.lower_slot(&slots, 0)?;
        let upper = self.lower_slot(&slots, 1)?;
        Ok(AstNode::RangeExpression(RangeExpression {
            lower: Box::new(lower),
            upper: Box::new(upper),
            span: node.span,
        }))
    }

    pub(crate) fn lower_when_expression(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let slots = self.shape(node, WHEN_SHAPE)?;
        let subject = self.lower_slot(&slots, 0)?;
        let block = self.slot(&slots, 1);

        let mut cases = Vec::new();
        for child in &block.children {
            if child.kind.is_trivia() {
                continue;
            }
            if child.kind != CstKind::WhenCase {
                return Err(self.error(
                    ErrorCode::ExtraNodesFound,
                    format!("unexpected {} in a when block", child.kind),
                    child.span,
                ));
            }
            cases.push(self.lower_when_case(child)?);
        }
        Ok(AstNode::WhenExpression(WhenExpression {
            subject: Box::new(subject),
            cases,
            span: node.span,
        }))
    }

    pub(crate) fn lower_when_case(&mut self, node: &CstNode) -> Result<WhenCase, AnalysisError> {
        let slots = self.shape(node, WHEN_CASE_SHAPE)?;
        let values_node = self.slot(&slots, 0);

        let mut values = Vec::new();
        for child in &values_node.children {
            if child.kind.is_trivia() {
                continue;
            }
            // `else` is the catch-all case, not a reference
            if child.kind == CstKind::Identifier && child.text() == "else" {
                values.push(AstNode::Identifier(self.identifier_from(child)?));
            } else {
                values.push(self.lower(child)?);
            }
        }

        let consequent = self.lower_wrapped(self.slot(&slots, 1))?;
        Ok(WhenCase {
            values,
            consequent: Box::new(consequent),
            span: node.span,
        })
    }

    // ---- slot helpers ----

    /// A matched child a required descriptor guarantees to exist. Panics on
    /// an empty slot: that is an internal invariant violation, never user
    /// input.
    pub(crate) fn slot<'cst>(&self, slots: &[Option<&'cst CstNode>], index: usize) -> &'cst CstNode {
        slots
            .get(index)
            .copied()
            .flatten()
            .unwrap_or_else(|| unreachable!("required shape slot {index} left empty"))
    }

    pub(crate) fn lower_slot(
        &mut self,
        slots: &[Option<&CstNode>],
        index: usize,
    ) -> Result<AstNode, AnalysisError> {
        let node = self.slot(slots, index);
        self.lower(node)
    }
}
