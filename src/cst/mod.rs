pub mod kind;
pub mod node;

pub use kind::CstKind;
pub use node::CstNode;
