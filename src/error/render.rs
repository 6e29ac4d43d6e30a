//! Terminal rendering of analysis errors through `codespan-reporting`,
//! for drivers that hold the file store and want rustc-style output.

use codespan::{FileId, Files};
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use crate::error::AnalysisError;

pub fn to_diagnostic(error: &AnalysisError) -> Diagnostic<FileId> {
    Diagnostic::error()
        .with_code(error.code.code())
        .with_message(&error.message)
        .with_labels(vec![Label::primary(
            error.file_id,
            usize::from(error.span.start())..usize::from(error.span.end()),
        )
        .with_message(error.code.to_string())])
}

pub fn emit_error(
    files: &Files<String>,
    error: &AnalysisError,
    color_choice: ColorChoice,
) -> Result<(), codespan_reporting::files::Error> {
    let writer = StandardStream::stderr(color_choice);
    let mut lock = writer.lock();
    let config = term::Config::default();
    term::emit(&mut lock, &config, files, &to_diagnostic(error))
}
