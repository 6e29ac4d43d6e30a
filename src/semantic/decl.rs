//! Per-construct lowering handlers for declarations.
//!
//! Declarations are where the inference engine and the symbol table meet:
//! every handler annotates its node with the initializer's possible types
//! and records the binding before returning.

use codespan::Span;

use crate::core::ast::{
    AstNode, BlockStatement, ClassDeclaration, FunctionDeclaration, Identifier, ImportDeclaration,
    InterfaceDeclaration, Parameter, PathLiteral, VariableDeclaration,
};
use crate::core::types::{AstType, FunctionShape, TypePath};
use crate::cst::{CstKind, CstNode};
use crate::error::{AnalysisError, ErrorCode};
use crate::semantic::analyzer::SemanticAnalyzer;
use crate::semantic::shape::{after_assignment, after_colon, ChildDescriptor};
use crate::semantic::symbol_table::SymbolKind;

const VARIABLE_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::optional(&[CstKind::ModifiersList]),
    ChildDescriptor::required(
        &[CstKind::Identifier],
        ErrorCode::MissingIdentifier,
        "an identifier after `const`/`let`",
    ),
    ChildDescriptor::optional(&[CstKind::ColonSeparator]),
    ChildDescriptor::required_if(
        CstKind::TYPES,
        after_colon,
        ErrorCode::MissingType,
        "a type after `:`",
    ),
    ChildDescriptor::optional(&[CstKind::AssignmentOperator]),
    ChildDescriptor::required_if(
        CstKind::ASSIGNABLE,
        after_assignment,
        ErrorCode::MissingExpression,
        "a value after `=`",
    ),
    ChildDescriptor::optional(&[CstKind::SemicolonSeparator]),
];

const PARAMETER_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::required(
        &[CstKind::Identifier],
        ErrorCode::MissingIdentifier,
        "a parameter name",
    ),
    ChildDescriptor::optional(&[CstKind::ColonSeparator]),
    ChildDescriptor::required_if(
        CstKind::TYPES,
        after_colon,
        ErrorCode::MissingType,
        "a parameter type after `:`",
    ),
    ChildDescriptor::optional(&[CstKind::AssignmentOperator]),
    ChildDescriptor::required_if(
        CstKind::ASSIGNABLE,
        after_assignment,
        ErrorCode::MissingExpression,
        "a default value after `=`",
    ),
];

const FUNCTION_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::optional(&[CstKind::ModifiersList]),
    ChildDescriptor::optional(&[CstKind::Identifier]),
    ChildDescriptor::optional(&[CstKind::TypeArgumentsList]),
    ChildDescriptor::optional(&[CstKind::ParametersList]),
    ChildDescriptor::optional(&[CstKind::FunctionReturns]),
    ChildDescriptor::required(
        &[CstKind::BlockStatement],
        ErrorCode::MissingBody,
        "a function body",
    ),
];

const CLASS_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::optional(&[CstKind::ModifiersList]),
    ChildDescriptor::required(
        &[CstKind::Identifier],
        ErrorCode::MissingIdentifier,
        "a class name",
    ),
    ChildDescriptor::optional(&[CstKind::TypeArgumentsList]),
    ChildDescriptor::optional(&[CstKind::ExtensionsList]),
    ChildDescriptor::optional(&[CstKind::ImplementsList]),
    ChildDescriptor::required(
        &[CstKind::BlockStatement],
        ErrorCode::MissingBody,
        "a class body",
    ),
];

const INTERFACE_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::optional(&[CstKind::ModifiersList]),
    ChildDescriptor::required(
        &[CstKind::Identifier],
        ErrorCode::MissingIdentifier,
        "an interface name",
    ),
    ChildDescriptor::optional(&[CstKind::TypeArgumentsList]),
    ChildDescriptor::optional(&[CstKind::ExtensionsList]),
    ChildDescriptor::required(
        &[CstKind::BlockStatement],
        ErrorCode::MissingBody,
        "an interface body",
    ),
];

const IMPORT_SHAPE: &[ChildDescriptor] = &[
    ChildDescriptor::required(
        &[CstKind::Identifier],
        ErrorCode::MissingIdentifier,
        "a name to import as",
    ),
    ChildDescriptor::required(
        &[CstKind::Path],
        ErrorCode::MissingExpression,
        "a source path",
    ),
    ChildDescriptor::optional(&[CstKind::SemicolonSeparator]),
];

impl SemanticAnalyzer<'_> {
    pub(crate) fn lower_variable_declaration(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let mutable = match node.text() {
            "let" => true,
            "const" => false,
            other => {
                return Err(self.error(
                    ErrorCode::MissingKeyword,
                    format!("expected `const` or `let`, found `{other}`"),
                    node.span,
                ))
            }
        };

        let slots = self.shape(node, VARIABLE_SHAPE)?;
        let modifiers = self.lower_modifiers(slots[0])?;
        let identifier = self.identifier_from(self.slot(&slots, 1))?;
        let declared_type = slots[3].map(|type_| self.lower_type(type_)).transpose()?;
        let initial_value = slots[5].map(|value| self.lower(value)).transpose()?;

        if !mutable && initial_value.is_none() {
            return Err(self.error(
                ErrorCode::MissingAssignmentOperator,
                format!("`{}` is a const and must be initialized", identifier.name),
                node.span,
            ));
        }

        let inferred_types = initial_value
            .as_ref()
            .map(|value| self.infer(value))
            .unwrap_or_default();
        self.check_annotations(
            &identifier,
            declared_type.as_ref(),
            &inferred_types,
            node.span,
        )?;

        let recorded = recorded_types(declared_type.as_ref(), &inferred_types);
        self.symbols_mut()
            .define(&identifier.name, SymbolKind::Variable { mutable }, Vec::new());
        let _ = self.symbols_mut().append_types(&identifier.name, &recorded);

        Ok(AstNode::VariableDeclaration(VariableDeclaration {
            mutable,
            modifiers,
            identifier,
            declared_type,
            initial_value: initial_value.map(Box::new),
            inferred_types,
            span: node.span,
        }))
    }

    pub(crate) fn lower_parameter(&mut self, node: &CstNode) -> Result<Parameter, AnalysisError> {
        let slots = self.shape(node, PARAMETER_SHAPE)?;
        let identifier = self.identifier_from(self.slot(&slots, 0))?;
        let declared_type = slots[2].map(|type_| self.lower_type(type_)).transpose()?;
        let default_value = slots[4].map(|value| self.lower(value)).transpose()?;

        let inferred_types = default_value
            .as_ref()
            .map(|value| self.infer(value))
            .unwrap_or_default();
        self.check_annotations(
            &identifier,
            declared_type.as_ref(),
            &inferred_types,
            node.span,
        )?;

        let recorded = recorded_types(declared_type.as_ref(), &inferred_types);
        self.symbols_mut()
            .define(&identifier.name, SymbolKind::Parameter, Vec::new());
        let _ = self.symbols_mut().append_types(&identifier.name, &recorded);

        Ok(Parameter {
            identifier,
            declared_type,
            default_value: default_value.map(Box::new),
            inferred_types,
            span: node.span,
        })
    }

    pub(crate) fn lower_function_declaration(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let slots = self.shape(node, FUNCTION_SHAPE)?;
        let modifiers = self.lower_modifiers(slots[0])?;
        let identifier = slots[1]
            .map(|name| self.identifier_from(name))
            .transpose()?;
        let type_params = self.lower_type_list(slots[2])?;
        let return_types = self.lower_type_list(slots[4])?;

        // the name goes in before the body so recursive references resolve
        if let Some(name) = &identifier {
            self.symbols_mut()
                .define(&name.name, SymbolKind::Function, Vec::new());
        }

        self.symbols_mut().push_scope();
        let scoped: Result<_, AnalysisError> = (|| {
            let params = self.lower_parameters(slots[3])?;
            let body = self.lower_function_body(self.slot(&slots, 5))?;
            Ok((params, body))
        })();
        self.symbols_mut().pop_scope();
        let (params, body) = scoped?;

        if let Some(name) = &identifier {
            let shape = AstType::Function(FunctionShape {
                params: params
                    .iter()
                    .filter_map(|param| {
                        param
                            .declared_type
                            .clone()
                            .or_else(|| param.inferred_types.first().cloned())
                    })
                    .collect(),
                returns: return_types.clone(),
            });
            let _ = self.symbols_mut().append_types(&name.name, &[shape]);
        }

        Ok(AstNode::FunctionDeclaration(FunctionDeclaration {
            modifiers,
            identifier,
            type_params,
            params,
            return_types,
            body,
            span: node.span,
        }))
    }

    fn lower_parameters(&mut self, list: Option<&CstNode>) -> Result<Vec<Parameter>, AnalysisError> {
        let mut params = Vec::new();
        if let Some(list) = list {
            for child in &list.children {
                if child.kind.is_trivia() {
                    continue;
                }
                if child.kind != CstKind::Parameter {
                    return Err(self.error(
                        ErrorCode::ExtraNodesFound,
                        format!("unexpected {} in a parameters list", child.kind),
                        child.span,
                    ));
                }
                params.push(self.lower_parameter(child)?);
            }
        }
        Ok(params)
    }

    fn lower_function_body(&mut self, node: &CstNode) -> Result<BlockStatement, AnalysisError> {
        match self.lower(node)? {
            AstNode::BlockStatement(block) => Ok(block),
            // the shape guarantees a block child
            other => unreachable!("function body lowered to {other:?}"),
        }
    }

    pub(crate) fn lower_class_declaration(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let slots = self.shape(node, CLASS_SHAPE)?;
        let modifiers = self.lower_modifiers(slots[0])?;
        let identifier = self.identifier_from(self.slot(&slots, 1))?;
        let type_params = self.lower_type_list(slots[2])?;
        let extends = self.lower_type_paths(slots[3])?;
        let implements = self.lower_type_paths(slots[4])?;

        self.symbols_mut().define(
            &identifier.name,
            SymbolKind::Class,
            vec![AstType::Named(TypePath::single(&identifier.name))],
        );
        let body = self.lower_function_body(self.slot(&slots, 5))?;

        Ok(AstNode::ClassDeclaration(ClassDeclaration {
            modifiers,
            identifier,
            type_params,
            extends,
            implements,
            body,
            span: node.span,
        }))
    }

    pub(crate) fn lower_interface_declaration(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let slots = self.shape(node, INTERFACE_SHAPE)?;
        let modifiers = self.lower_modifiers(slots[0])?;
        let identifier = self.identifier_from(self.slot(&slots, 1))?;
        let type_params = self.lower_type_list(slots[2])?;
        let extends = self.lower_type_paths(slots[3])?;

        self.symbols_mut().define(
            &identifier.name,
            SymbolKind::Interface,
            vec![AstType::Named(TypePath::single(&identifier.name))],
        );
        let body = self.lower_function_body(self.slot(&slots, 4))?;

        Ok(AstNode::InterfaceDeclaration(InterfaceDeclaration {
            modifiers,
            identifier,
            type_params,
            extends,
            body,
            span: node.span,
        }))
    }

    pub(crate) fn lower_import_declaration(
        &mut self,
        node: &CstNode,
    ) -> Result<AstNode, AnalysisError> {
        let slots = self.shape(node, IMPORT_SHAPE)?;
        let identifier = self.identifier_from(self.slot(&slots, 0))?;
        let source_node = self.slot(&slots, 1);
        let source = PathLiteral {
            value: source_node.text().to_string(),
            span: source_node.span,
        };

        self.symbols_mut()
            .define(&identifier.name, SymbolKind::Import, Vec::new());

        Ok(AstNode::ImportDeclaration(ImportDeclaration {
            identifier,
            source,
            span: node.span,
        }))
    }

    /// The `?`-suffix and declared-vs-inferred rules shared by variables and
    /// parameters.
    fn check_annotations(
        &self,
        identifier: &Identifier,
        declared: Option<&AstType>,
        inferred: &[AstType],
        span: Span,
    ) -> Result<(), AnalysisError> {
        if identifier.name.ends_with('?') {
            let declared_ok = declared.map_or(true, |type_| *type_ == AstType::Bool);
            let inferred_ok = inferred.is_empty() || inferred.contains(&AstType::Bool);
            if !declared_ok || !inferred_ok {
                return Err(self.error(
                    ErrorCode::BoolTypeExpected,
                    format!("`{}` is suffixed with `?` and must be bool", identifier.name),
                    span,
                ));
            }
        }

        if let Some(declared) = declared {
            if !inferred.is_empty() && !inferred.iter().any(|type_| declared.accepts(type_)) {
                return Err(self.error(
                    ErrorCode::TypeMismatch,
                    format!(
                        "`{}` is declared as {declared} but its value infers to {}",
                        identifier.name,
                        inferred
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(" | ")
                    ),
                    span,
                ));
            }
        }
        Ok(())
    }
}

/// The types recorded for a new binding: the declared annotation when
/// present, extended by whatever the initializer inferred.
fn recorded_types(declared: Option<&AstType>, inferred: &[AstType]) -> Vec<AstType> {
    let mut types = Vec::new();
    if let Some(declared) = declared {
        types.push(declared.clone());
    }
    for type_ in inferred {
        if !types.contains(type_) {
            types.push(type_.clone());
        }
    }
    types
}
