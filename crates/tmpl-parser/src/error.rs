//! Parse error types.

use source_map::Span;
use thiserror::Error;

/// A lexical error found by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum TokenError {
    #[error("unexpected end of file inside a tag")]
    EofInTag,
    #[error("unexpected end of file inside a comment")]
    EofInComment,
    #[error("unexpected end of file inside a doctype")]
    EofInDoctype,
    #[error("unexpected end of file inside an expression")]
    EofInExpression,
    #[error("unexpected end of file before tag name")]
    EofBeforeTagName,
    #[error("invalid first character of tag name")]
    InvalidFirstCharacterOfTagName,
    #[error("missing end tag name")]
    MissingEndTagName,
    #[error("incorrectly opened comment")]
    IncorrectlyOpenedComment,
    #[error("abrupt closing of empty comment")]
    AbruptClosingOfEmptyComment,
    #[error("missing doctype name")]
    MissingDoctypeName,
    #[error("unexpected character in attribute name")]
    UnexpectedCharacterInAttributeName,
    #[error("unexpected equals sign before attribute name")]
    UnexpectedEqualsSignBeforeAttributeName,
    #[error("unexpected character in unquoted attribute value")]
    UnexpectedCharacterInUnquotedAttributeValue,
    #[error("missing attribute value")]
    MissingAttributeValue,
    #[error("missing whitespace between attributes")]
    MissingWhitespaceBetweenAttributes,
    #[error("unexpected solidus in tag")]
    UnexpectedSolidusInTag,
    #[error("end tag with attributes")]
    EndTagWithAttributes,
    #[error("end tag with trailing solidus")]
    EndTagWithTrailingSolidus,
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A lexical error.
    #[error("{0}")]
    Token(TokenError),

    /// An element was left open when an ancestor closed or input ended.
    #[error("missing end tag")]
    MissingEndTag,

    /// An end tag with no open element to close.
    #[error("erroneous end tag")]
    ErroneousEndTag,

    /// An end tag for a void element.
    #[error("void elements must not have an end tag")]
    VoidEndTag,

    /// `<div/>` and friends.
    #[error("html elements can't self-close")]
    HtmlElementsCantSelfClose,

    /// A lower-case name outside the HTML vocabulary.
    #[error("invalid html tag name")]
    InvalidHtmlTagName,

    /// An obsolete element.
    #[error("deprecated and unsupported element")]
    DeprecatedAndUnsupported,

    /// An element placed under an ancestor that may not contain it.
    #[error("invalid nesting: {reason}")]
    InvalidNesting {
        /// The name span of the blocking ancestor.
        span: Span,
        /// Why the nesting is invalid.
        reason: &'static str,
    },

    /// The same attribute twice on one tag.
    #[error("duplicate attribute name")]
    DuplicateAttributeName {
        /// The first occurrence.
        original: Span,
    },

    /// The same id twice in one document or template.
    #[error("duplicate id value")]
    DuplicateId {
        /// The first occurrence.
        original: Span,
    },

    /// The same class twice in one `class` attribute.
    #[error("duplicate class")]
    DuplicateClass {
        /// The first occurrence.
        original: Span,
    },

    /// A required attribute is absent.
    #[error("missing required attribute '{0}'")]
    MissingRequiredAttr(&'static str),

    /// An attribute that may not appear here.
    #[error("invalid attribute: {0}")]
    InvalidAttr(&'static str),

    /// An attribute value that does not parse.
    #[error("invalid attribute value: {0}")]
    InvalidAttrValue(&'static str),
}

impl ErrorKind {
    /// Whether this error makes the document unformattable.
    ///
    /// Lexical and structural errors do; attribute checks don't.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            ErrorKind::Token(_)
                | ErrorKind::MissingEndTag
                | ErrorKind::ErroneousEndTag
                | ErrorKind::VoidEndTag
                | ErrorKind::HtmlElementsCantSelfClose
                | ErrorKind::InvalidHtmlTagName
                | ErrorKind::DeprecatedAndUnsupported
                | ErrorKind::InvalidNesting { .. }
        )
    }

    /// A stable identifier for machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Token(_) => "token",
            ErrorKind::MissingEndTag => "missing_end_tag",
            ErrorKind::ErroneousEndTag => "erroneous_end_tag",
            ErrorKind::VoidEndTag => "void_end_tag",
            ErrorKind::HtmlElementsCantSelfClose => "html_elements_cant_self_close",
            ErrorKind::InvalidHtmlTagName => "invalid_html_tag_name",
            ErrorKind::DeprecatedAndUnsupported => "deprecated_and_unsupported",
            ErrorKind::InvalidNesting { .. } => "invalid_nesting",
            ErrorKind::DuplicateAttributeName { .. } => "duplicate_attribute_name",
            ErrorKind::DuplicateId { .. } => "duplicate_id",
            ErrorKind::DuplicateClass { .. } => "duplicate_class",
            ErrorKind::MissingRequiredAttr(_) => "missing_required_attr",
            ErrorKind::InvalidAttr(_) => "invalid_attr",
            ErrorKind::InvalidAttrValue(_) => "invalid_attr_value",
        }
    }
}

/// A located parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// The most relevant span.
    pub main_location: Span,
    /// The node the error belongs to, or 0 for none.
    pub node_idx: u32,
}

/// An error that prevents parsing altogether.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    /// Offsets are 32-bit, so larger inputs cannot be addressed.
    #[error("source is {len} bytes, more than the maximum of {max}")]
    SourceTooLarge {
        /// The source length.
        len: usize,
        /// The largest supported length.
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error {
            kind: ErrorKind::MissingRequiredAttr("src"),
            main_location: Span::default(),
            node_idx: 0,
        };
        assert_eq!(error.to_string(), "missing required attribute 'src'");

        let token = ErrorKind::Token(TokenError::EofInTag);
        assert_eq!(token.to_string(), "unexpected end of file inside a tag");
        assert_eq!(token.code(), "token");
    }

    #[test]
    fn test_is_syntax() {
        assert!(ErrorKind::MissingEndTag.is_syntax());
        assert!(ErrorKind::Token(TokenError::EofInComment).is_syntax());
        assert!(!ErrorKind::DuplicateClass {
            original: Span::default()
        }
        .is_syntax());
        assert!(ErrorKind::InvalidHtmlTagName.is_syntax());
        assert!(!ErrorKind::MissingRequiredAttr("src").is_syntax());
    }
}
