//! Canonical formatting for tmpl markup.
//!
//! The formatter walks a parsed [`Ast`] and writes it back with tab
//! indentation, normalized whitespace and re-rendered control-flow
//! expressions. Formatting is idempotent: formatting the output again
//! yields the same bytes.
//!
//! Documents with syntax errors are refused, since re-rendering a
//! misparsed tree could change its meaning. Semantic errors such as
//! duplicate ids do not block formatting.
//!
//! # Example
//!
//! ```
//! use tmpl_formatter::format;
//! use tmpl_parser::Language;
//!
//! let out = format("<ul>\n    <li>one</li>\n</ul>", Language::Html).unwrap();
//! assert_eq!(out, "<ul>\n\t<li>one</li>\n</ul>\n");
//! ```

mod error;
mod expr;
mod render;

pub use error::FormatError;

use render::Renderer;
use source_map::SourceMapBuilder;
use tmpl_parser::{Ast, Language};
use tracing::debug;

/// Renders `ast`, which must have been parsed from `src`.
pub fn render(ast: &Ast, src: &str) -> Result<String, FormatError> {
    check(ast)?;
    let out = Renderer::new(ast, src, 0).render();
    debug!(input = src.len(), output = out.len(), "rendered document");
    Ok(out)
}

/// Renders `ast` and records output-to-source mappings in `builder`.
pub fn render_with_source_map(
    ast: &Ast,
    src: &str,
    builder: &mut SourceMapBuilder,
) -> Result<String, FormatError> {
    check(ast)?;
    let out = Renderer::new(ast, src, 0).with_source_map(builder).render();
    debug!(
        input = src.len(),
        output = out.len(),
        mappings = builder.len(),
        "rendered document with source map"
    );
    Ok(out)
}

/// Parses and renders `src` in one step.
pub fn format(src: &str, language: Language) -> Result<String, FormatError> {
    let ast = Ast::parse(src, language)?;
    render(&ast, src)
}

fn check(ast: &Ast) -> Result<(), FormatError> {
    if ast.has_syntax_errors {
        debug!(errors = ast.errors.len(), "refusing to render");
        return Err(FormatError::SyntaxError);
    }
    Ok(())
}
