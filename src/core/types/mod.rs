pub mod size;
pub mod ty;

pub use size::NumberSize;
pub use ty::{AstType, FunctionShape, ObjectField, TypePath};
