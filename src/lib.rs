//! Semantic analysis for the Garnet language.
//!
//! This crate is the middle stage of the compiler front end. The upstream
//! parser hands it a concrete syntax tree rooted at a `Program` node; the
//! [`SemanticAnalyzer`](semantic::SemanticAnalyzer) lowers that tree into a
//! typed abstract syntax tree, validating the shape of every construct and
//! inferring the possible numeric sizes of literals and expressions along
//! the way. The finished AST (plus the populated symbol table) is consumed
//! by the code generator downstream.
//!
//! Lowering is fail-fast: the first grammatical or type violation aborts the
//! analysis and surfaces as a single [`AnalysisError`](error::AnalysisError)
//! carrying a stable error code and a source excerpt.

pub mod core;
pub mod cst;
pub mod error;
pub mod semantic;

pub use crate::core::ast::AstNode;
pub use crate::core::types::{AstType, NumberSize};
pub use crate::cst::{CstKind, CstNode};
pub use crate::error::{AnalysisError, ErrorCode};
pub use crate::semantic::SemanticAnalyzer;

#[cfg(test)]
mod tests;
