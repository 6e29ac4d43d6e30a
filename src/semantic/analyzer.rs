use codespan::{FileId, Span};

use crate::core::ast::{
    AstNode, BlockStatement, Modifier, ModifierKind, PrintStatement, Program, ReturnStatement,
    Skip, TypeExpression,
};
use crate::core::types::{AstType, TypePath};
use crate::cst::{CstKind, CstNode};
use crate::error::{AnalysisError, ErrorCode};
use crate::semantic::infer::infer_possible_types;
use crate::semantic::shape::{match_shape, ChildDescriptor};
use crate::semantic::symbol_table::SymbolTable;

/// Kinds a Program accepts at the top level outside inline mode.
const TOP_LEVEL: &[CstKind] = &[
    CstKind::ImportDeclaration,
    CstKind::VariableDeclaration,
    CstKind::FunctionDeclaration,
    CstKind::ClassDeclaration,
    CstKind::InterfaceDeclaration,
    CstKind::PrintStatement,
    CstKind::BlockStatement,
    CstKind::Comment,
    CstKind::SemicolonSeparator,
];

/// Walks the CST depth-first and lowers each node into its AST counterpart,
/// validating children against per-construct shape descriptions, annotating
/// declarations with inferred types and recording them in the symbol table.
///
/// One analyzer owns one in-progress lowering of one CST and one symbol
/// table; it is strictly single-threaded and recursive, with no partial-AST
/// recovery inside a failed declaration.
pub struct SemanticAnalyzer<'src> {
    source: &'src str,
    file_id: FileId,
    symbol_table: SymbolTable,
    inline: bool,
}

impl<'src> SemanticAnalyzer<'src> {
    pub fn new(source: &'src str, file_id: FileId) -> Self {
        Self {
            source,
            file_id,
            symbol_table: SymbolTable::new(),
            inline: false,
        }
    }

    /// Relax the Program-level allow-list for snippet/REPL analysis. Affects
    /// nothing else.
    pub fn set_inline(&mut self, inline: bool) {
        self.inline = inline;
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    /// Hand the finished table to the downstream consumer.
    pub fn into_symbol_table(self) -> SymbolTable {
        self.symbol_table
    }

    /// Lower a whole CST. The root is expected to be a `Program` node.
    pub fn analyze(&mut self, root: &CstNode) -> Result<AstNode, AnalysisError> {
        self.lower(root)
    }

    /// Dispatch one CST node to its per-construct handler.
    pub fn lower(&mut self, node: &CstNode) -> Result<AstNode, AnalysisError> {
        match node.kind {
            CstKind::Program => self.lower_program(node),

            // atoms
            CstKind::Identifier => self.lower_identifier_reference(node),
            CstKind::NumberLiteral => self.lower_number_literal(node),
            CstKind::StringLiteral => self.lower_string_literal(node),
            CstKind::BoolLiteral => self.lower_bool_literal(node),
            CstKind::Path => self.lower_path_literal(node),
            CstKind::RegularExpression => self.lower_regex_literal(node),

            // expressions
            CstKind::ArrayExpression => self.lower_array_expression(node),
            CstKind::BinaryExpression => self.lower_binary_expression(node),
            CstKind::CallExpression => self.lower_call_expression(node),
            CstKind::MemberExpression => self.lower_member_expression(node),
            CstKind::ObjectExpression => self.lower_object_expression(node),
            CstKind::Property => self.lower_property(node),
            CstKind::RangeExpression => self.lower_range_expression(node),
            CstKind::TernaryExpression => self.lower_ternary_expression(node),
            CstKind::TupleExpression => self.lower_tuple_expression(node),
            CstKind::UnaryExpression => self.lower_unary_expression(node),
            CstKind::WhenExpression => self.lower_when_expression(node),
            CstKind::WhenCase => self.lower_when_case(node).map(AstNode::WhenCase),

            // wrappers around a single expression
            CstKind::TernaryCondition
            | CstKind::TernaryConsequent
            | CstKind::TernaryAlternate
            | CstKind::WhenCaseConsequent => self.lower_wrapped(node),

            // declarations
            CstKind::VariableDeclaration => self.lower_variable_declaration(node),
            CstKind::FunctionDeclaration => self.lower_function_declaration(node),
            CstKind::Parameter => self.lower_parameter(node).map(AstNode::Parameter),
            CstKind::ClassDeclaration => self.lower_class_declaration(node),
            CstKind::InterfaceDeclaration => self.lower_interface_declaration(node),
            CstKind::ImportDeclaration => self.lower_import_declaration(node),
            CstKind::Modifier => self.lower_modifier(node).map(AstNode::Modifier),

            // statements
            CstKind::BlockStatement => self.lower_block_statement(node),
            CstKind::ReturnStatement => self.lower_return_statement(node),
            CstKind::PrintStatement => self.lower_print_statement(node),

            // types in expression position
            CstKind::Type | CstKind::ArrayOf => {
                let type_ = self.lower_type(node)?;
                Ok(AstNode::TypeExpression(TypeExpression {
                    type_,
                    span: node.span,
                }))
            }

            // trivia and structural kinds consumed by their parent's handler
            CstKind::Comment
            | CstKind::ColonSeparator
            | CstKind::CommaSeparator
            | CstKind::SemicolonSeparator
            | CstKind::AssignmentOperator
            | CstKind::ArgumentsList
            | CstKind::ExtensionsList
            | CstKind::FunctionReturns
            | CstKind::ImplementsList
            | CstKind::ModifiersList
            | CstKind::ParametersList
            | CstKind::TypeArgumentsList
            | CstKind::WhenCaseValues => Ok(AstNode::Skip(Skip { span: node.span })),
        }
    }

    fn lower_program(&mut self, node: &CstNode) -> Result<AstNode, AnalysisError> {
        let mut declarations = Vec::new();
        for child in &node.children {
            if !self.inline && !TOP_LEVEL.contains(&child.kind) {
                return Err(self.error(
                    ErrorCode::UnexpectedTopLevelStatement,
                    format!("`{}` is not allowed at the top level", child.kind),
                    child.span,
                ));
            }
            // earlier declarations stay lowered; the first failure aborts
            let lowered = self.lower(child)?;
            if !lowered.is_skip() {
                declarations.push(lowered);
            }
        }
        Ok(AstNode::Program(Program {
            declarations,
            span: node.span,
        }))
    }

    fn lower_block_statement(&mut self, node: &CstNode) -> Result<AstNode, AnalysisError> {
        self.symbol_table.push_scope();
        let statements = self.lower_all(&node.children);
        self.symbol_table.pop_scope();
        Ok(AstNode::BlockStatement(BlockStatement {
            statements: statements?,
            span: node.span,
        }))
    }

    fn lower_return_statement(&mut self, node: &CstNode) -> Result<AstNode, AnalysisError> {
        Ok(AstNode::ReturnStatement(ReturnStatement {
            values: self.lower_all(&node.children)?,
            span: node.span,
        }))
    }

    fn lower_print_statement(&mut self, node: &CstNode) -> Result<AstNode, AnalysisError> {
        Ok(AstNode::PrintStatement(PrintStatement {
            values: self.lower_all(&node.children)?,
            span: node.span,
        }))
    }

    /// Lower a wrapper node holding exactly one expression (or block).
    pub(crate) fn lower_wrapped(&mut self, node: &CstNode) -> Result<AstNode, AnalysisError> {
        match node.children.as_slice() {
            [child] => self.lower(child),
            [] => Err(self.error(
                ErrorCode::MissingExpression,
                format!("`{}` must hold an expression", node.kind),
                node.span,
            )),
            [_, extra, ..] => Err(self.error(
                ErrorCode::ExtraNodesFound,
                format!("unexpected {} after the wrapped expression", extra.kind),
                extra.span,
            )),
        }
    }

    // ---- types ----

    pub(crate) fn lower_type(&mut self, node: &CstNode) -> Result<AstType, AnalysisError> {
        match node.kind {
            CstKind::Type => {
                let name = node.text();
                Ok(AstType::from_name(name)
                    .unwrap_or_else(|| AstType::Named(TypePath::single(name))))
            }
            CstKind::ArrayOf => match node.children.as_slice() {
                [element] => Ok(AstType::Array(Box::new(self.lower_type(element)?))),
                _ => Err(self.error(
                    ErrorCode::MissingType,
                    "an array type must wrap exactly one element type",
                    node.span,
                )),
            },
            CstKind::Identifier | CstKind::MemberExpression => {
                self.lower_type_path(node).map(AstType::Named)
            }
            _ => Err(self.error(
                ErrorCode::MissingType,
                format!("expected a type, found {}", node.kind),
                node.span,
            )),
        }
    }

    /// A user-defined type reference: a bare identifier or a member path of
    /// identifiers, flattened to its segments.
    pub(crate) fn lower_type_path(&self, node: &CstNode) -> Result<TypePath, AnalysisError> {
        let mut segments = Vec::new();
        self.collect_type_segments(node, &mut segments)?;
        Ok(TypePath { segments })
    }

    fn collect_type_segments(
        &self,
        node: &CstNode,
        segments: &mut Vec<String>,
    ) -> Result<(), AnalysisError> {
        match node.kind {
            CstKind::Identifier | CstKind::Type => {
                segments.push(node.text().to_string());
                Ok(())
            }
            CstKind::MemberExpression => {
                for child in &node.children {
                    self.collect_type_segments(child, segments)?;
                }
                Ok(())
            }
            _ => Err(self.error(
                ErrorCode::MissingType,
                format!("expected a type name, found {}", node.kind),
                node.span,
            )),
        }
    }

    /// Types from a `TypeArgumentsList` or `FunctionReturns` node.
    pub(crate) fn lower_type_list(
        &mut self,
        list: Option<&CstNode>,
    ) -> Result<Vec<AstType>, AnalysisError> {
        let mut types = Vec::new();
        if let Some(list) = list {
            for child in &list.children {
                if child.kind.is_trivia() {
                    continue;
                }
                types.push(self.lower_type(child)?);
            }
        }
        Ok(types)
    }

    /// Type paths from an `ExtensionsList` or `ImplementsList` node.
    pub(crate) fn lower_type_paths(
        &self,
        list: Option<&CstNode>,
    ) -> Result<Vec<TypePath>, AnalysisError> {
        let mut paths = Vec::new();
        if let Some(list) = list {
            for child in &list.children {
                if child.kind.is_trivia() {
                    continue;
                }
                paths.push(self.lower_type_path(child)?);
            }
        }
        Ok(paths)
    }

    // ---- modifiers ----

    pub(crate) fn lower_modifier(&self, node: &CstNode) -> Result<Modifier, AnalysisError> {
        let name = node.text();
        let kind = ModifierKind::from_name(name).ok_or_else(|| {
            self.error(
                ErrorCode::UnknownModifier,
                format!("`{name}` is not a recognized modifier"),
                node.span,
            )
        })?;
        Ok(Modifier {
            kind,
            span: node.span,
        })
    }

    pub(crate) fn lower_modifiers(
        &self,
        list: Option<&CstNode>,
    ) -> Result<Vec<Modifier>, AnalysisError> {
        let mut modifiers = Vec::new();
        if let Some(list) = list {
            for child in &list.children {
                if child.kind.is_trivia() {
                    continue;
                }
                if child.kind != CstKind::Modifier {
                    return Err(self.error(
                        ErrorCode::ExtraNodesFound,
                        format!("unexpected {} in a modifiers list", child.kind),
                        child.span,
                    ));
                }
                modifiers.push(self.lower_modifier(child)?);
            }
        }
        Ok(modifiers)
    }

    // ---- shared plumbing ----

    /// Lower every non-trivia child in order.
    pub(crate) fn lower_all(&mut self, children: &[CstNode]) -> Result<Vec<AstNode>, AnalysisError> {
        let mut lowered = Vec::new();
        for child in children {
            let node = self.lower(child)?;
            if !node.is_skip() {
                lowered.push(node);
            }
        }
        Ok(lowered)
    }

    pub(crate) fn infer(&self, expr: &AstNode) -> Vec<AstType> {
        infer_possible_types(expr, &self.symbol_table)
    }

    pub(crate) fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbol_table
    }

    pub(crate) fn error(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> AnalysisError {
        AnalysisError::new(code, message, span, self.file_id, self.source)
    }

    /// Run the shape-matcher and promote a mismatch to an `AnalysisError`.
    pub(crate) fn shape<'cst>(
        &self,
        node: &'cst CstNode,
        descriptors: &[ChildDescriptor],
    ) -> Result<Vec<Option<&'cst CstNode>>, AnalysisError> {
        match_shape(node, descriptors).map_err(|mismatch| {
            let message = match (mismatch.code, mismatch.found) {
                (ErrorCode::ExtraNodesFound, Some(kind)) => {
                    format!("unexpected {kind} after the last expected child")
                }
                (_, Some(kind)) => format!("expected {}, found {kind}", mismatch.expected),
                (_, None) => format!("expected {}", mismatch.expected),
            };
            self.error(mismatch.code, message, mismatch.span)
        })
    }
}
