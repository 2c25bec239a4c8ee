//! Error types for path expressions

use crate::lexer::TokenSpan;
use thiserror::Error;

/// Result type for parsing operations
pub type PathResult<T> = Result<T, PathSyntaxError>;

/// Malformed path expression.
///
/// A syntax error is a defect in the code that built the path, so it is
/// reported to the caller instead of being absorbed like a resolution miss.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathSyntaxError {
    #[error("Unexpected token at {}..{}: expected {expected}, found {found}", span.start, span.end)]
    UnexpectedToken {
        span: TokenSpan,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of path: expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("Invalid predicate at {}..{}: {message}", span.start, span.end)]
    InvalidPredicate { span: TokenSpan, message: String },

    #[error("Lexer error at {}..{}: unexpected character", span.start, span.end)]
    LexError { span: TokenSpan },
}

impl PathSyntaxError {
    pub fn unexpected_token(
        span: TokenSpan,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_end(expected: impl Into<String>) -> Self {
        Self::UnexpectedEnd {
            expected: expected.into(),
        }
    }

    pub fn invalid_predicate(span: TokenSpan, message: impl Into<String>) -> Self {
        Self::InvalidPredicate {
            span,
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<TokenSpan> {
        match self {
            PathSyntaxError::UnexpectedToken { span, .. } => Some(*span),
            PathSyntaxError::UnexpectedEnd { .. } => None,
            PathSyntaxError::InvalidPredicate { span, .. } => Some(*span),
            PathSyntaxError::LexError { span } => Some(*span),
        }
    }
}

/// Pretty-print a path error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, error: &PathSyntaxError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    const NAME: &str = "path";

    let span = error.span().unwrap_or(TokenSpan {
        start: source.len(),
        end: source.len(),
    });

    let label = match error {
        PathSyntaxError::UnexpectedToken { expected, .. } => format!("expected {}", expected),
        PathSyntaxError::UnexpectedEnd { expected } => format!("expected {}", expected),
        PathSyntaxError::InvalidPredicate { message, .. } => message.clone(),
        PathSyntaxError::LexError { .. } => "unexpected character".to_string(),
    };

    let mut output = Vec::new();
    let written = Report::build(ReportKind::Error, NAME, span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((NAME, span.start..span.end))
                .with_color(Color::Red)
                .with_message(label),
        )
        .finish()
        .write((NAME, Source::from(source)), &mut output);

    match written {
        Ok(()) => String::from_utf8(output).unwrap_or_else(|_| error.to_string()),
        Err(_) => error.to_string(),
    }
}
