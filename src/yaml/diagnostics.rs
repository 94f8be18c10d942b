//! Source-annotated YAML errors
//!
//! A syntax or type error points at the offending line of the master data
//! file when rendered by miette.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),
}

/// A parse failure with the source text and failing location attached
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid YAML in {filename}: {message}")]
#[diagnostic(
    code(bomx::yaml::syntax),
    help("dates are YYYY-MM-DD; decimals with a fractional part must be quoted, e.g. \"0.5\"")
)]
pub struct YamlSyntaxError {
    pub filename: String,
    pub message: String,
    pub line: Option<usize>,

    #[source_code]
    src: NamedSource<String>,

    #[label("{message}")]
    span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let (span, line) = match err.location() {
            Some(loc) => {
                // Label at least one character so the caret renders
                let offset = loc.index().min(content.len());
                let len = usize::from(offset < content.len());
                (Some(SourceSpan::from((offset, len))), Some(loc.line()))
            }
            None => (None, None),
        };

        Self {
            filename: filename.to_string(),
            message: err.to_string(),
            line,
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }
}
