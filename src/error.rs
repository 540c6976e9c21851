//! Error types shared by every symdep layer.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors produced while classifying statements or extracting dependencies.
///
/// Every failure is a deterministic function of the input text and the
/// configured collaborators; nothing here is retryable.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The source text does not parse. Carries the offending text verbatim
    /// so diagnostics are actionable without re-reading the input.
    #[error("invalid syntax in `{snippet}`: {detail}")]
    Syntax { detail: String, snippet: String },

    /// The statement parses but does not introduce a new named symbol
    /// (expressions, control flow, loops, and similar forms).
    #[error("unsupported statement kind `{0}`: only statements that introduce a new symbol are supported")]
    UnsupportedStatement(String),

    /// Assignment with more than one target, or a target that is not a
    /// plain identifier (attribute, subscript, or unpacking targets).
    #[error("unsupported assignment target: {0}")]
    MultiTarget(String),

    /// A wildcard import that cannot be expanded into concrete names.
    #[error("cannot expand `from {module} import *`: {reason}")]
    UnresolvableWildcard { module: String, reason: String },

    /// `parse_single` was handed text with zero or several statements.
    #[error("expected exactly one statement, found {found}")]
    Arity { found: usize },
}

impl AnalysisError {
    /// Create a syntax error wrapping the offending source text.
    pub fn syntax(detail: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self::Syntax {
            detail: detail.into(),
            snippet: snippet.into(),
        }
    }

    /// Create an unsupported-statement error for the given statement kind.
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedStatement(kind.into())
    }

    /// Create an invalid-assignment-target error.
    pub fn multi_target(detail: impl Into<String>) -> Self {
        Self::MultiTarget(detail.into())
    }

    /// Create an unresolvable-wildcard error for the given module.
    pub fn wildcard(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnresolvableWildcard {
            module: module.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_keeps_offending_text() {
        let err = AnalysisError::syntax("unexpected EOF", "def f(:");
        let message = err.to_string();
        assert!(message.contains("def f(:"));
        assert!(message.contains("unexpected EOF"));
    }

    #[test]
    fn arity_error_reports_count() {
        let err = AnalysisError::Arity { found: 3 };
        assert_eq!(err.to_string(), "expected exactly one statement, found 3");
    }
}
