use std::fmt;

use codespan::{FileId, Span};
use thiserror::Error;

/// One stable code per distinguishable expectation. The analyzer reports
/// exactly one of these per failed lowering; it never throws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorCode {
    #[error("missing identifier")]
    MissingIdentifier,
    #[error("missing keyword")]
    MissingKeyword,
    #[error("missing expression")]
    MissingExpression,
    #[error("missing type")]
    MissingType,
    #[error("missing assignment operator")]
    MissingAssignmentOperator,
    #[error("missing body")]
    MissingBody,
    #[error("bool type expected")]
    BoolTypeExpected,
    #[error("type mismatch")]
    TypeMismatch,
    #[error("unknown operator")]
    UnknownOperator,
    #[error("unknown modifier")]
    UnknownModifier,
    #[error("invalid number")]
    InvalidNumber,
    #[error("invalid regular expression")]
    InvalidRegularExpression,
    #[error("extra nodes found")]
    ExtraNodesFound,
    #[error("unexpected top-level statement")]
    UnexpectedTopLevelStatement,
    #[error("undefined identifier")]
    UndefinedIdentifier,
}

impl ErrorCode {
    pub fn code(self) -> &'static str {
        match self {
            ErrorCode::MissingIdentifier => "G0001",
            ErrorCode::MissingKeyword => "G0002",
            ErrorCode::MissingExpression => "G0003",
            ErrorCode::MissingType => "G0004",
            ErrorCode::MissingAssignmentOperator => "G0005",
            ErrorCode::MissingBody => "G0006",
            ErrorCode::BoolTypeExpected => "G0007",
            ErrorCode::TypeMismatch => "G0008",
            ErrorCode::UnknownOperator => "G0009",
            ErrorCode::UnknownModifier => "G0010",
            ErrorCode::InvalidNumber => "G0011",
            ErrorCode::InvalidRegularExpression => "G0012",
            ErrorCode::ExtraNodesFound => "G0013",
            ErrorCode::UnexpectedTopLevelStatement => "G0014",
            ErrorCode::UndefinedIdentifier => "G0015",
        }
    }
}

/// A failed lowering. Carries the offending span plus a prerendered source
/// excerpt so the error displays without access to the file store.
#[derive(Debug, Clone, Error)]
pub struct AnalysisError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    pub file_id: FileId,
    pub context: SourceContext,
}

impl AnalysisError {
    pub fn new(
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        file_id: FileId,
        source: &str,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            file_id,
            context: SourceContext::from_source(source, span),
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error[{}]: {}", self.code.code(), self.message)?;
        write!(f, "{}", self.context)
    }
}

/// The line holding the offending span plus its neighbours, with a caret
/// under the span itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    /// 1-based line number of the offending line.
    pub line_number: usize,
    pub before: Option<String>,
    pub line: String,
    pub after: Option<String>,
    /// 0-based column of the caret within `line`.
    pub caret_column: usize,
    pub caret_width: usize,
}

impl SourceContext {
    pub fn from_source(source: &str, span: Span) -> Self {
        let offset = (usize::from(span.start())).min(source.len());
        let length = usize::from(span.end()).saturating_sub(usize::from(span.start()));

        let line_start = source[..offset].rfind('\n').map_or(0, |at| at + 1);
        let line_number = source[..line_start].matches('\n').count() + 1;
        let line_end = source[line_start..]
            .find('\n')
            .map_or(source.len(), |at| line_start + at);

        let before = if line_start > 0 {
            let prev_end = line_start - 1;
            let prev_start = source[..prev_end].rfind('\n').map_or(0, |at| at + 1);
            Some(source[prev_start..prev_end].to_string())
        } else {
            None
        };
        let after = if line_end < source.len() {
            let next_start = line_end + 1;
            let next_end = source[next_start..]
                .find('\n')
                .map_or(source.len(), |at| next_start + at);
            Some(source[next_start..next_end].to_string())
        } else {
            None
        };

        let caret_column = source[line_start..offset].chars().count();
        let caret_width = length.min(line_end.saturating_sub(offset)).max(1);

        Self {
            line_number,
            before,
            line: source[line_start..line_end].to_string(),
            after,
            caret_column,
            caret_width,
        }
    }
}

impl fmt::Display for SourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gutter = (self.line_number + 1).to_string().len();
        if let Some(before) = &self.before {
            writeln!(f, "{:>gutter$} | {}", self.line_number - 1, before)?;
        }
        writeln!(f, "{:>gutter$} | {}", self.line_number, self.line)?;
        writeln!(
            f,
            "{:>gutter$} | {}{}",
            "",
            " ".repeat(self.caret_column),
            "^".repeat(self.caret_width)
        )?;
        if let Some(after) = &self.after {
            writeln!(f, "{:>gutter$} | {}", self.line_number + 1, after)?;
        }
        Ok(())
    }
}
