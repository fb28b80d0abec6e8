//! Markup parser for tmpl.
//!
//! This crate turns HTML, XML or HTML-with-template-expressions into an
//! index-addressed tree:
//! - A mode-aware tokenizer ([`Tokenizer`])
//! - A static element table ([`ElementKind`])
//! - An error-tolerant tree builder ([`Ast::parse`])
//! - Diagnostics rendering ([`report`]) and editor completions
//!
//! Parsing never fails on malformed markup. Problems are collected in
//! [`Ast::errors`] and the tree is still built.
//!
//! # Example
//!
//! ```
//! use tmpl_parser::{Ast, Language};
//!
//! let src = "<div><span><p></div>";
//! let ast = Ast::parse(src, Language::Html).unwrap();
//!
//! assert!(ast.has_syntax_errors);
//! assert_eq!(ast.errors[0].main_location.slice(src), "span");
//! ```

mod ast;
mod completions;
mod error;
mod kinds;
pub mod report;
mod tokenizer;

pub use ast::{Ast, Children, Direction, Kind, Language, Node};
pub use completions::{Completion, CompletionKind};
pub use error::{Error, ErrorKind, FatalError, TokenError};
pub use kinds::{Categories, Content, ElementKind, GLOBAL_ATTRIBUTES, PRESENTATIONAL_ATTRIBUTES};
pub use source_map::Span;
pub use tokenizer::{
    scan_expression_end, tag_name, Attr, AttrValue, Attributes, Mode, Quote, TagHeader, TagKind,
    Token, Tokenizer,
};
