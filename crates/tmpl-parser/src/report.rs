//! Human-readable error reports.

use crate::ast::Ast;
use crate::error::{Error, ErrorKind};
use source_map::{LineIndex, Span};
use std::fmt::Write;

/// Renders one error as `path:row:col: message`, the offending line and a
/// caret underline.
///
/// Rows and columns are 1-based. Spans past the end of `src` are clamped,
/// and the underline never runs past the end of the line.
pub fn render_error(path: &str, src: &str, index: &LineIndex, error: &Error) -> String {
    let span = error.main_location;
    let start = index.line_col_clamped(span.start);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{path}:{}:{}: {}",
        start.line + 1,
        start.col + 1,
        error.kind
    );

    let line = index.line_text(start.line, src).unwrap_or("");
    let indent = line.len() - line.trim_start().len();
    let trimmed = line.trim();
    let col = (start.col as usize).min(line.len());

    let pad = line
        .get(indent.min(col)..col)
        .map_or(0, |prefix| prefix.chars().count());
    let available = line.get(col..).map_or(0, |rest| rest.trim_end().chars().count());
    let span_len = span
        .slice(src)
        .lines()
        .next()
        .map_or(0, |first| first.chars().count());
    let carets = span_len.min(available).max(1);

    let _ = writeln!(out, "    {trimmed}");
    let _ = writeln!(out, "    {}{}", " ".repeat(pad), "^".repeat(carets));

    if let Some(original) = original_span(&error.kind) {
        let at = index.line_col_clamped(original.start);
        let _ = writeln!(
            out,
            "{path}:{}:{}: note: first defined here",
            at.line + 1,
            at.col + 1
        );
    }
    out
}

/// Renders every error in `ast`, in discovery order.
pub fn render_errors(path: &str, src: &str, ast: &Ast) -> String {
    let index = LineIndex::new(src);
    ast.errors
        .iter()
        .map(|error| render_error(path, src, &index, error))
        .collect()
}

fn original_span(kind: &ErrorKind) -> Option<Span> {
    match kind {
        ErrorKind::DuplicateAttributeName { original }
        | ErrorKind::DuplicateId { original }
        | ErrorKind::DuplicateClass { original } => Some(*original),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Language;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_end_tag_report() {
        let src = "<div>\n    <span><p></div>\n";
        let ast = Ast::parse(src, Language::Html).unwrap();
        let report = render_errors("page.html", src, &ast);
        assert_eq!(
            report,
            "page.html:2:6: missing end tag\n    <span><p></div>\n     ^^^^\n"
        );
    }

    #[test]
    fn test_duplicate_note() {
        let src = "<p id=\"a\"></p>\n<p id=\"a\"></p>";
        let ast = Ast::parse(src, Language::Html).unwrap();
        let report = render_errors("x.html", src, &ast);
        assert_eq!(
            report,
            concat!(
                "x.html:2:8: duplicate id value\n",
                "    <p id=\"a\"></p>\n",
                "           ^\n",
                "x.html:1:8: note: first defined here\n",
            )
        );
    }

    #[test]
    fn test_span_on_newline_reports_previous_line() {
        let src = "<div>\n<p>";
        let index = LineIndex::new(src);
        let error = Error {
            kind: ErrorKind::MissingEndTag,
            main_location: Span::from_usize(5, 6),
            node_idx: 0,
        };
        let report = render_error("f", src, &index, &error);
        assert_eq!(report, "f:1:6: missing end tag\n    <div>\n         ^\n");
    }

    #[test]
    fn test_out_of_range_span_clamps() {
        let src = "<p>";
        let index = LineIndex::new(src);
        let error = Error {
            kind: ErrorKind::MissingEndTag,
            main_location: Span::from_usize(40, 50),
            node_idx: 0,
        };
        let report = render_error("a", src, &index, &error);
        assert_eq!(report, "a:1:4: missing end tag\n    <p>\n       ^\n");
    }
}
