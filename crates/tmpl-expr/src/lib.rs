//! Span parser for tmpl template expressions.
//!
//! Template expressions are brace-delimited constructs embedded in markup:
//!
//! - `{user.name}` substitutions
//! - `{if (cond) (<b>yes</b>) else (<i>no</i>)}`
//! - `{for (items) |item| (<li>{item}</li>)}`
//! - `{while (it.next()) |x| (<p>{x}</p>)}`
//! - `{switch (kind) { .a => (<p>A</p>), else => "?" }}`
//!
//! The parser only recovers where each construct and branch body starts and
//! ends. Expressions are never evaluated, and branch bodies stay opaque:
//! markup inside them is handled by whoever called [`parse`].
//!
//! # Example
//!
//! ```
//! use tmpl_expr::{parse, Expr};
//!
//! let text = "{for (items) |item| (<li>{item}</li>)}";
//! let Expr::For(for_expr) = parse(text).unwrap() else { panic!() };
//! assert_eq!(for_expr.body.inner.slice(text), "<li>{item}</li>");
//! ```

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::*;
pub use error::ExprError;
pub use lexer::{Lexer, Token, TokenKind};

/// Parses a complete `{...}` expression.
pub fn parse(text: &str) -> Result<Expr, ExprError> {
    parser::Parser::new(text)?.parse()
}
