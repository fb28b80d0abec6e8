//! Span-only AST of a template expression.
//!
//! Every span is relative to the start of the expression text handed to
//! [`crate::parse`]; nothing is copied out of it.

use source_map::Span;

/// The kind of construct an expression is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// `{switch (x) { ... }}`
    Switch,
    /// `{if (x) ... else ...}`
    If,
    /// `{for (xs) |x| ...}`
    For,
    /// `{while (x) ...}`
    While,
    /// `{x}`
    Text,
}

impl ExprKind {
    /// Guesses the construct from the text following the opening `{`.
    ///
    /// Only the leading keyword is inspected; the rest is not validated.
    pub fn sniff(after_brace: &str) -> ExprKind {
        let trimmed = after_brace.trim_start();
        let word_len = trimmed
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        match &trimmed[..word_len] {
            "switch" => ExprKind::Switch,
            "if" => ExprKind::If,
            "for" => ExprKind::For,
            "while" => ExprKind::While,
            _ => ExprKind::Text,
        }
    }

    /// Returns the keyword introducing this construct, if any.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            ExprKind::Switch => Some("switch"),
            ExprKind::If => Some("if"),
            ExprKind::For => Some("for"),
            ExprKind::While => Some("while"),
            ExprKind::Text => None,
        }
    }
}

/// A parsed expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A plain substitution.
    Text(TextExpr),
    /// A conditional.
    If(IfExpr),
    /// A loop over an iterable.
    For(ForExpr),
    /// A conditional loop.
    While(WhileExpr),
    /// A multi-way branch.
    Switch(SwitchExpr),
}

impl Expr {
    /// Returns the construct kind.
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Text(_) => ExprKind::Text,
            Expr::If(_) => ExprKind::If,
            Expr::For(_) => ExprKind::For,
            Expr::While(_) => ExprKind::While,
            Expr::Switch(_) => ExprKind::Switch,
        }
    }
}

/// A parenthesised group such as a condition: `(a and b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    /// The span including the parentheses.
    pub span: Span,
    /// The span between the parentheses, untrimmed.
    pub inner: Span,
}

/// The value produced by a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    /// The full span of the body.
    pub span: Span,
    /// The content; for a parenthesised body, the untrimmed text between
    /// the parentheses.
    pub inner: Span,
    /// Whether the body was wrapped in parentheses.
    pub parenthesized: bool,
}

/// `{expr}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExpr {
    /// The whole expression including braces.
    pub span: Span,
    /// The text between the braces, trimmed.
    pub inner: Span,
}

/// `if (cond) |capture| body else ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfExpr {
    /// From the `if` keyword to the end of the last branch.
    pub span: Span,
    /// The condition.
    pub condition: Group,
    /// The optional payload capture, without the pipes.
    pub capture: Option<Span>,
    /// The branch taken when the condition holds.
    pub then_body: Body,
    /// The `else` branch.
    pub else_branch: Option<ElseBranch>,
}

/// What follows `else`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElseBranch {
    /// `else if ...`
    If(Box<IfExpr>),
    /// `else body`
    Body(Body),
}

/// `for (iterable) |capture| body`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForExpr {
    /// From the `for` keyword to the end of the body.
    pub span: Span,
    /// The iterated value.
    pub iterable: Group,
    /// The element capture, without the pipes.
    pub capture: Option<Span>,
    /// The repeated body.
    pub body: Body,
}

/// `while (cond) : (continue) |capture| body`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileExpr {
    /// From the `while` keyword to the end of the body.
    pub span: Span,
    /// The condition.
    pub condition: Group,
    /// The continue expression after `:`.
    pub continue_expr: Option<Group>,
    /// The optional payload capture.
    pub capture: Option<Span>,
    /// The repeated body.
    pub body: Body,
}

/// `switch (subject) { cases }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchExpr {
    /// From the `switch` keyword to the closing `}` of the case list.
    pub span: Span,
    /// The switched-on value.
    pub subject: Group,
    /// The cases in source order.
    pub cases: Vec<SwitchCase>,
}

/// `pattern => |capture| body`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchCase {
    /// From the pattern to the end of the body.
    pub span: Span,
    /// Everything before `=>`.
    pub pattern: Span,
    /// The optional payload capture.
    pub capture: Option<Span>,
    /// The case value.
    pub body: Body,
}
