//! Possible-type inference over lowered expressions.
//!
//! `infer_possible_types` is a pure function from an expression to the set
//! of types it could have. It never errors: an empty result means "could not
//! infer", which is a legitimate outcome for member and call expressions,
//! not a failure.

use crate::core::ast::{AstNode, BinaryExpression, BinaryOp, NumberLiteral, UnaryOp};
use crate::core::types::{AstType, NumberSize, ObjectField};
use crate::semantic::symbol_table::SymbolTable;

pub fn infer_possible_types(expr: &AstNode, symbols: &SymbolTable) -> Vec<AstType> {
    match expr {
        AstNode::BoolLiteral(_) => vec![AstType::Bool],
        AstNode::StringLiteral(_) => vec![AstType::String],
        AstNode::PathLiteral(_) => vec![AstType::Path],
        AstNode::RegexLiteral(_) => vec![AstType::Regex],

        AstNode::NumberLiteral(literal) => to_number_types(&literal.possible_sizes),

        // a bare identifier inherits whatever the symbol table has observed
        // for its binding; unresolved names infer nothing
        AstNode::Identifier(identifier) => symbols
            .lookup(&identifier.name)
            .map(|symbol| symbol.types.clone())
            .unwrap_or_default(),

        AstNode::UnaryExpression(unary) => {
            let operand = infer_possible_types(&unary.operand, symbols);
            match unary.op {
                UnaryOp::Not => vec![AstType::Bool],
                UnaryOp::Negate => to_number_types(
                    &numeric_sizes(&operand)
                        .into_iter()
                        .filter(|size| size.is_signed())
                        .collect::<Vec<_>>(),
                ),
                UnaryOp::Increment | UnaryOp::Decrement => {
                    to_number_types(&numeric_sizes(&operand))
                }
            }
        }

        AstNode::BinaryExpression(binary) => infer_binary(binary, symbols),

        AstNode::ArrayExpression(array) => match array.items.first() {
            Some(first) => infer_possible_types(first, symbols)
                .into_iter()
                .map(|item| AstType::Array(Box::new(item)))
                .collect(),
            None => Vec::new(),
        },

        AstNode::ObjectExpression(object) => {
            let mut fields = Vec::with_capacity(object.properties.len());
            for property in &object.properties {
                let mut types = infer_possible_types(&property.value, symbols);
                if types.is_empty() {
                    // one uninferable field defeats the whole shape
                    return Vec::new();
                }
                fields.push(ObjectField {
                    name: property.name.clone(),
                    type_: types.remove(0),
                });
            }
            vec![AstType::Object(fields)]
        }

        AstNode::TupleExpression(tuple) => {
            let mut items = Vec::with_capacity(tuple.items.len());
            for item in &tuple.items {
                let mut types = infer_possible_types(item, symbols);
                if types.is_empty() {
                    return Vec::new();
                }
                items.push(types.remove(0));
            }
            vec![AstType::Tuple(items)]
        }

        AstNode::TernaryExpression(ternary) => {
            let consequent = infer_possible_types(&ternary.consequent, symbols);
            let alternate = infer_possible_types(&ternary.alternate, symbols);
            consequent
                .into_iter()
                .filter(|type_| alternate.contains(type_))
                .collect()
        }

        AstNode::RangeExpression(_) => vec![AstType::Range],

        // member, call and when expressions need resolution this analyzer
        // does not perform; inference yields nothing for them
        _ => Vec::new(),
    }
}

fn infer_binary(binary: &BinaryExpression, symbols: &SymbolTable) -> Vec<AstType> {
    if binary.op.produces_bool() {
        // comparisons and logicals are bool regardless of their operands
        return vec![AstType::Bool];
    }

    let left = numeric_sizes(&infer_possible_types(&binary.left, symbols));

    if binary.op.is_arithmetic() {
        let right = numeric_sizes(&infer_possible_types(&binary.right, symbols));
        let common: Vec<NumberSize> = left
            .into_iter()
            .filter(|size| right.contains(size))
            .collect();
        // an empty intersection means "cannot infer", not an error
        return to_number_types(&common);
    }

    debug_assert_eq!(binary.op, BinaryOp::Exponent);
    if is_negative_exponent(&binary.right) {
        // a negative exponent forces a decimal result wide enough for the
        // base's smallest candidate; an uninferable base infers nothing
        let Some(min_width) = left.iter().map(|size| size.bit_width()).min() else {
            return Vec::new();
        };
        let decimals: Vec<NumberSize> = NumberSize::DECIMALS
            .iter()
            .copied()
            .filter(|size| size.bit_width() >= min_width)
            .collect();
        to_number_types(&decimals)
    } else {
        to_number_types(&left)
    }
}

fn is_negative_exponent(exponent: &AstNode) -> bool {
    match exponent {
        AstNode::NumberLiteral(NumberLiteral { value, .. }) => value.starts_with('-'),
        AstNode::UnaryExpression(unary) => unary.op == UnaryOp::Negate,
        _ => false,
    }
}

fn numeric_sizes(types: &[AstType]) -> Vec<NumberSize> {
    types
        .iter()
        .filter_map(|type_| match type_ {
            AstType::Number(size) => Some(*size),
            _ => None,
        })
        .collect()
}

fn to_number_types(sizes: &[NumberSize]) -> Vec<AstType> {
    sizes.iter().copied().map(AstType::Number).collect()
}
