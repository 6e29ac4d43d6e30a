//! The reusable required/optional-child validation algorithm behind every
//! multi-child lowering handler.
//!
//! A handler describes its grammar as an ordered list of [`ChildDescriptor`]s
//! and the matcher consumes the node's real children left-to-right against
//! them. Descriptor order encodes the grammar and is never reordered; there
//! is no backtracking.

use codespan::Span;

use crate::cst::{CstKind, CstNode};
use crate::error::ErrorCode;

/// Whether a descriptor must match. `RequiredIf` evaluates a predicate over
/// the previously consumed sibling, e.g. "a type is required only if a colon
/// separator preceded it".
#[derive(Clone, Copy)]
pub enum Presence {
    Optional,
    Required(ErrorCode, &'static str),
    RequiredIf(fn(Option<&CstNode>) -> bool, ErrorCode, &'static str),
}

#[derive(Clone, Copy)]
pub struct ChildDescriptor {
    pub kinds: &'static [CstKind],
    pub presence: Presence,
}

impl ChildDescriptor {
    pub const fn optional(kinds: &'static [CstKind]) -> Self {
        Self {
            kinds,
            presence: Presence::Optional,
        }
    }

    pub const fn required(
        kinds: &'static [CstKind],
        code: ErrorCode,
        expected: &'static str,
    ) -> Self {
        Self {
            kinds,
            presence: Presence::Required(code, expected),
        }
    }

    pub const fn required_if(
        kinds: &'static [CstKind],
        predicate: fn(Option<&CstNode>) -> bool,
        code: ErrorCode,
        expected: &'static str,
    ) -> Self {
        Self {
            kinds,
            presence: Presence::RequiredIf(predicate, code, expected),
        }
    }
}

/// An unmet descriptor, or a leftover child after all descriptors matched.
/// Converted into an `AnalysisError` by the analyzer, which holds the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub code: ErrorCode,
    pub expected: &'static str,
    /// The unmatched child, when one exists.
    pub found: Option<CstKind>,
    /// Span of the unmatched child, or of the parent when no child exists.
    pub span: Span,
}

/// Match a node's children against descriptors, in order.
///
/// Returns one slot per descriptor: `Some` holds the consumed child, `None`
/// marks a skipped optional. An unmatched required descriptor fails
/// immediately; a leftover child after the last descriptor is a hard error.
pub fn match_shape<'cst>(
    parent: &'cst CstNode,
    descriptors: &[ChildDescriptor],
) -> Result<Vec<Option<&'cst CstNode>>, ShapeMismatch> {
    let mut children = parent.children.iter().peekable();
    let mut slots = Vec::with_capacity(descriptors.len());
    let mut previous: Option<&CstNode> = None;

    for descriptor in descriptors {
        match children.next_if(|child| descriptor.kinds.contains(&child.kind)) {
            Some(child) => {
                slots.push(Some(child));
                previous = Some(child);
            }
            None => {
                let required = match descriptor.presence {
                    Presence::Optional => None,
                    Presence::Required(code, expected) => Some((code, expected)),
                    Presence::RequiredIf(predicate, code, expected) => {
                        predicate(previous).then_some((code, expected))
                    }
                };
                if let Some((code, expected)) = required {
                    let unmatched = children.peek().copied();
                    return Err(ShapeMismatch {
                        code,
                        expected,
                        found: unmatched.map(|child| child.kind),
                        span: unmatched.map_or(parent.span, |child| child.span),
                    });
                }
                slots.push(None);
            }
        }
    }

    if let Some(extra) = children.next() {
        return Err(ShapeMismatch {
            code: ErrorCode::ExtraNodesFound,
            expected: "no further nodes",
            found: Some(extra.kind),
            span: extra.span,
        });
    }

    Ok(slots)
}

/// Predicate for `RequiredIf`: the previously consumed sibling was a colon.
pub fn after_colon(previous: Option<&CstNode>) -> bool {
    matches!(previous, Some(node) if node.kind == CstKind::ColonSeparator)
}

/// Predicate for `RequiredIf`: the previously consumed sibling was `=`.
pub fn after_assignment(previous: Option<&CstNode>) -> bool {
    matches!(previous, Some(node) if node.kind == CstKind::AssignmentOperator)
}
