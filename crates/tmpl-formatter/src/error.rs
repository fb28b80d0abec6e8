//! Formatter errors.

use thiserror::Error;
use tmpl_parser::FatalError;

/// Why a document could not be formatted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The tree has lexical or structural errors; rendering it could
    /// change the document's meaning.
    #[error("document has syntax errors")]
    SyntaxError,

    /// The source could not be parsed at all.
    #[error(transparent)]
    Fatal(#[from] FatalError),
}
