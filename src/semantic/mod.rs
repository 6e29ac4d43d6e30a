pub mod analyzer;
pub mod decl;
pub mod expr;
pub mod infer;
pub mod shape;
pub mod symbol_table;

pub use analyzer::SemanticAnalyzer;
pub use infer::infer_possible_types;
pub use shape::{match_shape, ChildDescriptor, Presence, ShapeMismatch};
pub use symbol_table::{Symbol, SymbolError, SymbolKind, SymbolTable};
