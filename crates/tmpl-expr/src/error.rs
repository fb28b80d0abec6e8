//! Expression parse errors.

use source_map::Span;
use thiserror::Error;

/// Why an expression could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// Text no token matches, such as an unterminated string.
    #[error("invalid token at offset {}", u32::from(.0.start))]
    InvalidToken(Span),

    /// The text does not start with `{` and end with the matching `}`.
    #[error("expression must be enclosed in a single pair of braces")]
    NotBraced,

    /// Nothing between the braces.
    #[error("empty expression")]
    Empty,

    /// A delimiter without its partner.
    #[error("unbalanced delimiter at offset {}", u32::from(.0.start))]
    Unbalanced(Span),

    /// A required piece of syntax is missing.
    #[error("expected {expected} at offset {}", u32::from(.span.start))]
    Expected {
        /// What the parser was looking for.
        expected: &'static str,
        /// Where it was looking.
        span: Span,
    },

    /// Tokens left over after a complete construct.
    #[error("unexpected tokens after expression at offset {}", u32::from(.0.start))]
    Trailing(Span),
}
