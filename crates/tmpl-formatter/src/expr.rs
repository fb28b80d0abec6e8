//! Re-rendering of control-flow expressions.
//!
//! Expressions are rebuilt from their parsed spans with normalized spacing.
//! Branch bodies that contain markup are formatted by the document renderer
//! itself, through a synthetic wrapper element.

use crate::render::Renderer;
use tmpl_expr::{Body, ElseBranch, Expr, Group, IfExpr, SwitchExpr};
use tmpl_parser::{Ast, Language};

/// Wraps markup bodies so they parse as a single element.
const WRAPPER: &str = "expr-branch";

/// Formats one `{...}` expression at `indent`, or `None` to keep it as
/// written.
pub(crate) fn format_expression(text: &str, language: Language, indent: usize) -> Option<String> {
    let expr = tmpl_expr::parse(text).ok()?;
    let printer = Printer {
        text,
        language,
        out: String::with_capacity(text.len()),
    };
    printer.print(&expr, indent)
}

struct Printer<'a> {
    text: &'a str,
    language: Language,
    out: String,
}

impl Printer<'_> {
    fn print(mut self, expr: &Expr, indent: usize) -> Option<String> {
        self.out.push('{');
        match expr {
            Expr::Text(_) => return Some(self.text.to_string()),
            Expr::If(e) => self.if_expr(e, indent)?,
            Expr::For(e) => {
                self.out.push_str("for ");
                self.group(&e.iterable);
                self.capture(e.capture);
                self.out.push(' ');
                self.body(&e.body, indent)?;
            }
            Expr::While(e) => {
                self.out.push_str("while ");
                self.group(&e.condition);
                if let Some(cont) = &e.continue_expr {
                    self.out.push_str(" : ");
                    self.group(cont);
                }
                self.capture(e.capture);
                self.out.push(' ');
                self.body(&e.body, indent)?;
            }
            Expr::Switch(e) => self.switch(e, indent)?,
        }
        self.out.push('}');
        Some(self.out)
    }

    fn if_expr(&mut self, e: &IfExpr, indent: usize) -> Option<()> {
        self.out.push_str("if ");
        self.group(&e.condition);
        self.capture(e.capture);
        self.out.push(' ');
        self.body(&e.then_body, indent)?;
        match &e.else_branch {
            None => {}
            Some(ElseBranch::If(nested)) => {
                self.out.push_str(" else ");
                self.if_expr(nested, indent)?;
            }
            Some(ElseBranch::Body(body)) => {
                self.out.push_str(" else ");
                self.body(body, indent)?;
            }
        }
        Some(())
    }

    fn switch(&mut self, e: &SwitchExpr, indent: usize) -> Option<()> {
        self.out.push_str("switch ");
        self.group(&e.subject);
        self.out.push_str(" {");
        if e.cases.is_empty() {
            self.out.push('}');
            return Some(());
        }
        for case in &e.cases {
            self.out.push('\n');
            push_tabs(&mut self.out, indent + 1);
            self.out.push_str(case.pattern.slice(self.text).trim());
            self.out.push_str(" =>");
            self.capture(case.capture);
            self.out.push(' ');
            self.body(&case.body, indent + 1)?;
            self.out.push(',');
        }
        self.out.push('\n');
        push_tabs(&mut self.out, indent);
        self.out.push('}');
        Some(())
    }

    fn group(&mut self, group: &Group) {
        self.out.push('(');
        self.out.push_str(group.inner.slice(self.text).trim());
        self.out.push(')');
    }

    fn capture(&mut self, capture: Option<source_map::Span>) {
        if let Some(span) = capture {
            self.out.push_str(" |");
            self.out.push_str(span.slice(self.text).trim());
            self.out.push('|');
        }
    }

    fn body(&mut self, body: &Body, indent: usize) -> Option<()> {
        let content = body.inner.slice(self.text).trim();
        if !body.parenthesized {
            self.out.push_str(content);
            return Some(());
        }

        let block = if looks_like_markup(content) {
            render_markup(content, self.language, indent)?
        } else if content.contains('\n') {
            reindent(content, indent + 1)
        } else {
            content.to_string()
        };

        if block.contains('\n') {
            self.out.push_str("(\n");
            self.out.push_str(&block);
            self.out.push('\n');
            push_tabs(&mut self.out, indent);
            self.out.push(')');
        } else {
            self.out.push('(');
            self.out.push_str(block.trim_start());
            self.out.push(')');
        }
        Some(())
    }
}

/// Formats a markup body one level deeper than `indent`.
///
/// Returns `None` when the body does not parse cleanly.
fn render_markup(content: &str, language: Language, indent: usize) -> Option<String> {
    let wrapped = format!("<{WRAPPER}>\n{content}\n</{WRAPPER}>");
    let ast = Ast::parse(&wrapped, language).ok()?;
    if ast.has_syntax_errors {
        return None;
    }
    let rendered = Renderer::new(&ast, &wrapped, indent).render_fragment();
    let first = rendered.find('\n')?;
    let last = rendered.rfind('\n')?;
    if last <= first {
        return Some(String::new());
    }
    Some(rendered[first + 1..last].to_string())
}

/// `<` followed by an optional space and a letter, `/` or `!`.
///
/// Comparisons like `a < b` also match; the strict parse in
/// [`render_markup`] rejects those.
fn looks_like_markup(content: &str) -> bool {
    let bytes = content.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        if b != b'<' {
            return false;
        }
        let mut next = i + 1;
        if bytes.get(next) == Some(&b' ') {
            next += 1;
        }
        matches!(bytes.get(next), Some(c) if c.is_ascii_alphabetic() || *c == b'/' || *c == b'!')
    })
}

/// Re-indents code lines at `level`, keeping their relative indentation.
fn reindent(content: &str, level: usize) -> String {
    let leading = |line: &str| line.len() - line.trim_start_matches([' ', '\t']).len();
    let common = content
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(leading)
        .min()
        .unwrap_or(0);

    let mut out = String::new();
    for (i, line) in content.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if line.trim().is_empty() {
            continue;
        }
        push_tabs(&mut out, level);
        let line = if i == 0 { line } else { &line[common.min(leading(line))..] };
        out.push_str(line.trim_end());
    }
    out
}

fn push_tabs(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push('\t');
    }
}
