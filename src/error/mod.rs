pub mod diagnostic;
pub mod render;

pub use diagnostic::{AnalysisError, ErrorCode, SourceContext};
pub use render::{emit_error, to_diagnostic};
