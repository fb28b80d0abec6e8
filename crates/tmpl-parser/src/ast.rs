//! Index-addressed document tree and the tree builder.

use crate::error::{Error, ErrorKind, FatalError, TokenError};
use crate::kinds::{Content, ElementKind, PRESENTATIONAL_ATTRIBUTES};
use crate::tokenizer::{tag_name, Attr, Attributes, TagKind, Token, Tokenizer};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use source_map::Span;
use tmpl_expr::ExprKind;
use tracing::{debug, trace};

/// The markup dialect of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Plain HTML; braces are text.
    Html,
    /// XML: every element is opaque and may self-close.
    Xml,
    /// HTML with `{...}` template expressions.
    #[default]
    Template,
}

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// The sentinel at index 0.
    Root,
    /// `<!DOCTYPE ...>`
    Doctype,
    /// `<!-- ... -->`
    Comment,
    /// Character data, trimmed.
    Text,
    /// `{switch ...}`
    SwitchExpr,
    /// `{if ...}`
    IfExpr,
    /// `{for ...}`
    ForExpr,
    /// `{while ...}`
    WhileExpr,
    /// `{x}`
    TextExpr,
    /// A known HTML element.
    Element(ElementKind),
    /// An unknown, custom or foreign element.
    Opaque,
}

impl Kind {
    /// Whether this is an element of either flavour.
    #[inline]
    pub fn is_element(self) -> bool {
        matches!(self, Kind::Element(_) | Kind::Opaque)
    }

    /// Whether this is a template expression.
    #[inline]
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Kind::SwitchExpr | Kind::IfExpr | Kind::ForExpr | Kind::WhileExpr | Kind::TextExpr
        )
    }

    /// Whether this is a void element.
    #[inline]
    pub fn is_void(self) -> bool {
        matches!(self, Kind::Element(k) if k.is_void())
    }

    /// The content model; opaque elements accept anything.
    pub fn content(self) -> Option<Content> {
        match self {
            Kind::Element(k) => Some(k.content()),
            Kind::Opaque => Some(Content::Any),
            _ => None,
        }
    }
}

impl From<ExprKind> for Kind {
    fn from(kind: ExprKind) -> Kind {
        match kind {
            ExprKind::Switch => Kind::SwitchExpr,
            ExprKind::If => Kind::IfExpr,
            ExprKind::For => Kind::ForExpr,
            ExprKind::While => Kind::WhileExpr,
            ExprKind::Text => Kind::TextExpr,
        }
    }
}

/// Where the next appended node goes relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The next node becomes the first child.
    In,
    /// The next node becomes the next sibling.
    After,
}

/// One entry of [`Ast::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    /// The open tag, or the whole leaf.
    pub open: Span,
    /// The close tag; unset while `close.start == 0`.
    pub close: Span,
    /// Index of the parent.
    pub parent_idx: u32,
    /// Index of the first child, or 0.
    pub first_child_idx: u32,
    /// Index of the next sibling, or 0.
    pub next_idx: u32,
    /// What the node is.
    pub kind: Kind,
    /// Whether the open tag ended with `/>`.
    pub self_closing: bool,
}

impl Node {
    fn new(kind: Kind, open: Span, parent_idx: u32, self_closing: bool) -> Self {
        Self {
            open,
            close: Span::default(),
            parent_idx,
            first_child_idx: 0,
            next_idx: 0,
            kind,
            self_closing,
        }
    }

    /// Whether a close span has been recorded.
    #[inline]
    pub fn is_closed(&self) -> bool {
        u32::from(self.close.start) != 0
    }

    /// Where the next node is attached.
    pub fn direction(&self) -> Direction {
        match self.kind {
            Kind::Root => Direction::In,
            Kind::Element(k) if k.is_void() => Direction::After,
            Kind::Element(_) | Kind::Opaque if !self.self_closing && !self.is_closed() => {
                Direction::In
            }
            _ => Direction::After,
        }
    }

    /// The span covering the whole node, open tag through close tag.
    pub fn span(&self) -> Span {
        if self.is_closed() {
            self.open.cover(self.close)
        } else {
            self.open
        }
    }
}

/// A parsed document.
#[derive(Debug, Clone)]
pub struct Ast {
    /// Set by lexical and structural errors.
    pub has_syntax_errors: bool,
    /// The dialect the document was parsed as.
    pub language: Language,
    /// The arena; index 0 is the root.
    pub nodes: Vec<Node>,
    /// All errors in discovery order.
    pub errors: Vec<Error>,
}

impl Ast {
    /// Parses `src` into a tree.
    ///
    /// Malformed markup never fails; problems are recorded in
    /// [`Ast::errors`]. Only inputs that cannot be addressed with 32-bit
    /// offsets are rejected.
    pub fn parse(src: &str, language: Language) -> Result<Ast, FatalError> {
        if src.len() > u32::MAX as usize {
            return Err(FatalError::SourceTooLarge {
                len: src.len(),
                max: u32::MAX as usize,
            });
        }
        Ok(Builder::new(src, language).build())
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Returns the node at `idx`.
    #[inline]
    pub fn node(&self, idx: u32) -> &Node {
        &self.nodes[idx as usize]
    }

    /// Iterates the children of `idx` in order.
    pub fn children(&self, idx: u32) -> Children<'_> {
        Children {
            ast: self,
            next: self.node(idx).first_child_idx,
        }
    }

    /// The tag name of an element node, as written.
    pub fn tag_name<'src>(&self, src: &'src str, idx: u32) -> &'src str {
        tag_name(src, self.node(idx).open).slice(src)
    }

    /// The attributes of an element node.
    pub fn attributes<'src>(&self, src: &'src str, idx: u32) -> Attributes<'src> {
        Attributes::new(src, self.node(idx).open, self.language)
    }

    /// Iterates errors that make the document unformattable.
    pub fn syntax_errors(&self) -> impl Iterator<Item = &Error> {
        self.errors.iter().filter(|e| e.kind.is_syntax())
    }
}

/// Iterator over a node's children.
pub struct Children<'a> {
    ast: &'a Ast,
    next: u32,
}

impl Iterator for Children<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.next == 0 {
            return None;
        }
        let idx = self.next;
        self.next = self.ast.node(idx).next_idx;
        Some(idx)
    }
}

// === Builder ===

struct Builder<'src> {
    src: &'src str,
    language: Language,
    tokenizer: Tokenizer<'src>,
    nodes: Vec<Node>,
    errors: Vec<Error>,
    has_syntax_errors: bool,
    current: u32,
    svg_depth: u32,
    math_depth: u32,
    /// One id set per template scope.
    seen_ids: Vec<FxHashMap<&'src str, Span>>,
    /// Attribute names of the tag being processed.
    seen_attrs: FxHashMap<SmolStr, Span>,
}

impl<'src> Builder<'src> {
    fn new(src: &'src str, language: Language) -> Self {
        Self {
            src,
            language,
            tokenizer: Tokenizer::new(src, language),
            nodes: vec![Node::new(Kind::Root, Span::default(), 0, false)],
            errors: Vec::new(),
            has_syntax_errors: false,
            current: 0,
            svg_depth: 0,
            math_depth: 0,
            seen_ids: vec![FxHashMap::default()],
            seen_attrs: FxHashMap::default(),
        }
    }

    fn build(mut self) -> Ast {
        while let Some(token) = self.tokenizer.next() {
            trace!(?token, "token");
            match token {
                Token::Tag {
                    kind: TagKind::Start,
                    name,
                    span,
                } => self.start_tag(name, span, false),
                Token::Tag {
                    kind: TagKind::StartSelf,
                    name,
                    span,
                } => self.self_closing_tag(name, span),
                Token::Tag {
                    kind: TagKind::End | TagKind::EndSelf,
                    name,
                    span,
                } => self.end_tag(name, span),
                Token::Text { span } => self.text(span),
                Token::Comment { span } => self.leaf(Kind::Comment, span),
                Token::Doctype { span, .. } => self.leaf(Kind::Doctype, span),
                Token::Expression { kind, span } => self.leaf(kind.into(), span),
                Token::ParseError { kind, span } => self.token_error(kind, span),
            }
        }
        self.finish();

        debug!(
            nodes = self.nodes.len(),
            errors = self.errors.len(),
            has_syntax_errors = self.has_syntax_errors,
            "tree built"
        );
        Ast {
            has_syntax_errors: self.has_syntax_errors,
            language: self.language,
            nodes: self.nodes,
            errors: self.errors,
        }
    }

    // === Helpers ===

    fn node(&self, idx: u32) -> &Node {
        &self.nodes[idx as usize]
    }

    fn node_mut(&mut self, idx: u32) -> &mut Node {
        &mut self.nodes[idx as usize]
    }

    fn error(&mut self, kind: ErrorKind, main_location: Span, node_idx: u32) {
        if kind.is_syntax() {
            self.has_syntax_errors = true;
        }
        debug!(code = kind.code(), ?main_location, node_idx, "error");
        self.errors.push(Error {
            kind,
            main_location,
            node_idx,
        });
    }

    /// The node that would parent a node appended now.
    fn enclosing(&self) -> u32 {
        let current = self.node(self.current);
        match current.direction() {
            Direction::In => self.current,
            Direction::After => current.parent_idx,
        }
    }

    fn name_of(&self, idx: u32) -> &'src str {
        tag_name(self.src, self.node(idx).open).slice(self.src)
    }

    fn append(&mut self, kind: Kind, open: Span, self_closing: bool) -> u32 {
        let idx = self.nodes.len() as u32;
        let current = self.current;
        let parent = match self.node(current).direction() {
            Direction::In => {
                self.node_mut(current).first_child_idx = idx;
                current
            }
            Direction::After => {
                self.node_mut(current).next_idx = idx;
                self.node(current).parent_idx
            }
        };
        self.nodes.push(Node::new(kind, open, parent, self_closing));
        self.current = idx;
        idx
    }

    fn leaf(&mut self, kind: Kind, span: Span) {
        let idx = self.append(kind, span, false);
        self.node_mut(idx).close = Span::empty(span.end);
    }

    fn in_foreign_content(&self) -> bool {
        self.svg_depth > 0 || self.math_depth > 0
    }

    // === Transitions ===

    fn text(&mut self, span: Span) {
        let text = span.slice(self.src);
        let trimmed = text.trim_start();
        let start = span.range().start + (text.len() - trimmed.len());
        let trimmed = trimmed.trim_end();
        if trimmed.is_empty() {
            return;
        }
        self.leaf(Kind::Text, Span::from_usize(start, start + trimmed.len()));
    }

    fn token_error(&mut self, kind: TokenError, span: Span) {
        let node_idx = self.enclosing();
        self.error(ErrorKind::Token(kind), span, node_idx);
    }

    fn classify(&self, name: &str) -> Kind {
        if self.language == Language::Xml || self.in_foreign_content() {
            return Kind::Opaque;
        }
        match ElementKind::classify(name) {
            Some(kind) => Kind::Element(kind),
            None => Kind::Opaque,
        }
    }

    fn self_closing_tag(&mut self, name: Span, span: Span) {
        let text = name.slice(self.src);
        let kind = self.classify(text);
        let legal = self.language == Language::Xml
            || self.in_foreign_content()
            || text.starts_with(|c: char| c.is_ascii_uppercase())
            || matches!(kind, Kind::Opaque);

        if legal {
            self.start_tag(name, span, true);
        } else {
            let node_idx = self.enclosing();
            self.error(ErrorKind::HtmlElementsCantSelfClose, span, node_idx);
            self.start_tag(name, span, false);
        }
    }

    fn start_tag(&mut self, name: Span, span: Span, self_closing: bool) {
        let text = name.slice(self.src);
        let kind = self.classify(text);
        debug!(name = text, ?kind, self_closing, "start tag");

        let parent = self.enclosing();
        match kind {
            Kind::Element(element) => {
                if element.is_deprecated() {
                    self.error(ErrorKind::DeprecatedAndUnsupported, name, parent);
                }
                if element == ElementKind::Main {
                    self.validate_main(name, parent);
                }
            }
            Kind::Opaque
                if self.language != Language::Xml
                    && !self.in_foreign_content()
                    && !is_custom_name(text) =>
            {
                self.error(ErrorKind::InvalidHtmlTagName, name, parent);
            }
            _ => {}
        }

        let idx = self.append(kind, span, self_closing);
        self.check_attributes(idx, kind, name);

        if self_closing {
            return;
        }
        if let Kind::Element(element) = kind {
            if let Some(mode) = element.text_mode() {
                self.tokenizer.set_mode(mode, text);
            }
            match element {
                ElementKind::Svg => self.svg_depth += 1,
                ElementKind::Math => self.math_depth += 1,
                ElementKind::Template => self.seen_ids.push(FxHashMap::default()),
                _ => {}
            }
        }
    }

    fn end_tag(&mut self, name: Span, span: Span) {
        let text = name.slice(self.src);
        debug!(name = text, "end tag");

        let original = self.current;
        let mut candidate = self.enclosing();
        let mut skipped = Vec::new();
        loop {
            if candidate == 0 {
                let void = self.language != Language::Xml
                    && ElementKind::classify(text).is_some_and(|k| k.is_void());
                let kind = if void {
                    ErrorKind::VoidEndTag
                } else {
                    ErrorKind::ErroneousEndTag
                };
                self.error(kind, span, original);
                self.current = original;
                return;
            }
            if self.name_of(candidate).eq_ignore_ascii_case(text) {
                break;
            }
            skipped.push(candidate);
            candidate = self.node(candidate).parent_idx;
        }

        for idx in skipped {
            self.implicit_close(idx);
        }
        self.node_mut(candidate).close = span;
        self.on_close(candidate);
        self.current = candidate;
    }

    /// Leaves `idx` open for good, reporting it unless its end tag is
    /// optional.
    fn implicit_close(&mut self, idx: u32) {
        let node = *self.node(idx);
        let optional = matches!(node.kind, Kind::Element(k) if k.has_optional_end_tag());
        if !optional {
            let name = tag_name(self.src, node.open);
            self.error(ErrorKind::MissingEndTag, name, idx);
        }
        self.on_close(idx);
    }

    fn on_close(&mut self, idx: u32) {
        match self.node(idx).kind {
            Kind::Element(ElementKind::Svg) => self.svg_depth = self.svg_depth.saturating_sub(1),
            Kind::Element(ElementKind::Math) => {
                self.math_depth = self.math_depth.saturating_sub(1)
            }
            Kind::Element(ElementKind::Template) if self.seen_ids.len() > 1 => {
                self.seen_ids.pop();
            }
            _ => {}
        }
    }

    fn finish(&mut self) {
        let mut idx = self.enclosing();
        while idx != 0 {
            self.implicit_close(idx);
            idx = self.node(idx).parent_idx;
        }
    }

    // === Semantic checks ===

    fn validate_main(&mut self, name: Span, parent: u32) {
        let mut idx = parent;
        while idx != 0 {
            let node = *self.node(idx);
            match node.kind {
                Kind::Element(ElementKind::Html | ElementKind::Body | ElementKind::Div) => {}
                // TODO: only accept forms that have an accessible name
                // (aria-label, aria-labelledby or title).
                Kind::Element(ElementKind::Form) => {}
                Kind::Element(ElementKind::Template) | Kind::Opaque => return,
                _ => {
                    let span = tag_name(self.src, node.open);
                    self.error(
                        ErrorKind::InvalidNesting {
                            span,
                            reason: "main must be a descendant of html, body, div or form",
                        },
                        name,
                        parent,
                    );
                    return;
                }
            }
            idx = node.parent_idx;
        }
    }

    fn check_attributes(&mut self, idx: u32, kind: Kind, name: Span) {
        self.seen_attrs.clear();
        let html = self.language != Language::Xml;
        let open = self.node(idx).open;

        for attr in Attributes::new(self.src, open, self.language) {
            let text = attr.name.slice(self.src);
            let key = if html {
                SmolStr::new(text.to_ascii_lowercase())
            } else {
                SmolStr::new(text)
            };
            if let Some(&original) = self.seen_attrs.get(&key) {
                self.error(
                    ErrorKind::DuplicateAttributeName { original },
                    attr.name,
                    idx,
                );
                continue;
            }
            self.seen_attrs.insert(key.clone(), attr.name);

            if !html {
                continue;
            }
            match key.as_str() {
                "id" => self.check_id(idx, attr),
                "class" => self.check_class(idx, attr),
                "dir" => self.check_dir(idx, attr),
                "tabindex" => self.check_tabindex(idx, attr),
                _ => {}
            }
            if kind.is_element() {
                if let Some(presentational) = PRESENTATIONAL_ATTRIBUTES
                    .iter()
                    .copied()
                    .find(|p| *p == key.as_str())
                {
                    self.error(ErrorKind::InvalidAttr(presentational), attr.name, idx);
                }
            }
        }

        if let Kind::Element(element) = kind {
            for &required in element.required_attributes() {
                if !self.seen_attrs.contains_key(required) {
                    self.error(ErrorKind::MissingRequiredAttr(required), name, idx);
                }
            }
        }
    }

    /// The literal value of `attr`, or `None` for expression values.
    fn static_value(&self, attr: &Attr) -> Option<(&'src str, Span)> {
        match attr.value {
            Some(value) if value.is_dynamic() => None,
            Some(value) => {
                let content = value.content();
                Some((content.slice(self.src), content))
            }
            None => Some(("", attr.name)),
        }
    }

    fn check_id(&mut self, idx: u32, attr: Attr) {
        let Some((value, span)) = self.static_value(&attr) else {
            return;
        };
        if value.is_empty() {
            self.error(
                ErrorKind::InvalidAttrValue("id must not be empty"),
                span,
                idx,
            );
            return;
        }
        if value.bytes().any(|b| b.is_ascii_whitespace()) {
            self.error(
                ErrorKind::InvalidAttrValue("id must not contain whitespace"),
                span,
                idx,
            );
            return;
        }
        let scope = self.seen_ids.last_mut();
        let original = match scope {
            Some(scope) => match scope.get(value) {
                Some(&original) => Some(original),
                None => {
                    scope.insert(value, span);
                    None
                }
            },
            None => None,
        };
        if let Some(original) = original {
            self.error(ErrorKind::DuplicateId { original }, span, idx);
        }
    }

    fn check_class(&mut self, idx: u32, attr: Attr) {
        let Some((value, span)) = self.static_value(&attr) else {
            return;
        };
        let base = span.range().start;
        let mut seen: Vec<(&str, Span)> = Vec::new();
        for (offset, class) in split_whitespace_indices(value) {
            let class_span = Span::from_usize(base + offset, base + offset + class.len());
            match seen.iter().find(|(c, _)| *c == class) {
                Some(&(_, original)) => {
                    self.error(ErrorKind::DuplicateClass { original }, class_span, idx);
                }
                None => seen.push((class, class_span)),
            }
        }
    }

    fn check_dir(&mut self, idx: u32, attr: Attr) {
        let Some((value, span)) = self.static_value(&attr) else {
            return;
        };
        let valid = ["ltr", "rtl", "auto"]
            .iter()
            .any(|v| v.eq_ignore_ascii_case(value));
        if !valid {
            self.error(
                ErrorKind::InvalidAttrValue("dir must be ltr, rtl or auto"),
                span,
                idx,
            );
        }
    }

    fn check_tabindex(&mut self, idx: u32, attr: Attr) {
        let Some((value, span)) = self.static_value(&attr) else {
            return;
        };
        if value.trim().parse::<i64>().is_err() {
            self.error(
                ErrorKind::InvalidAttrValue("tabindex must be an integer"),
                span,
                idx,
            );
        }
    }
}

/// Custom elements contain a dash; components start upper-case.
fn is_custom_name(name: &str) -> bool {
    name.contains('-') || name.contains(':') || name.starts_with(|c: char| c.is_ascii_uppercase())
}

fn split_whitespace_indices(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split(|c: char| c.is_ascii_whitespace())
        .scan(0usize, |offset, part| {
            let start = *offset;
            *offset += part.len() + 1;
            Some((start, part))
        })
        .filter(|(_, part)| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> Ast {
        Ast::parse(src, Language::Template).unwrap()
    }

    fn codes(ast: &Ast) -> Vec<&'static str> {
        ast.errors.iter().map(|e| e.kind.code()).collect()
    }

    fn assert_tree_invariants(ast: &Ast) {
        for (idx, node) in ast.nodes.iter().enumerate() {
            if node.first_child_idx != 0 {
                assert_ne!(node.first_child_idx, 0);
                assert_eq!(ast.node(node.first_child_idx).parent_idx, idx as u32);
            }
            if node.next_idx != 0 {
                assert_eq!(ast.node(node.next_idx).parent_idx, node.parent_idx);
            }
            if node.kind.is_void() {
                assert!(!node.is_closed(), "void node {idx} has a close span");
            }
        }
    }

    /// Renders the tree as `name(children)` for compact assertions.
    fn shape(ast: &Ast, src: &str, idx: u32) -> String {
        let children: Vec<String> = ast.children(idx).map(|c| shape(ast, src, c)).collect();
        let node = ast.node(idx);
        let label = match node.kind {
            Kind::Root => "#root".to_string(),
            Kind::Text => format!("{:?}", node.open.slice(src)),
            Kind::Element(_) | Kind::Opaque => ast.tag_name(src, idx).to_string(),
            other => format!("{other:?}"),
        };
        if children.is_empty() {
            label
        } else {
            format!("{label}({})", children.join(" "))
        }
    }

    #[test]
    fn test_nesting_and_siblings() {
        let src = "<div><p>a</p><br><span>b</span></div>";
        let ast = parse(src);
        assert!(ast.errors.is_empty());
        assert_eq!(shape(&ast, src, 0), "#root(div(p(\"a\") br span(\"b\")))");
        assert_tree_invariants(&ast);
    }

    #[test]
    fn test_unclosed_span_reports_missing_end_tag() {
        let src = "<div><span><p></div>";
        let ast = parse(src);
        assert_eq!(codes(&ast), vec!["missing_end_tag"]);
        assert_eq!(ast.errors[0].main_location.slice(src), "span");
        assert!(ast.has_syntax_errors);

        let div = ast.root().first_child_idx;
        assert_eq!(ast.node(div).close.slice(src), "</div>");
        assert_eq!(shape(&ast, src, 0), "#root(div(span(p)))");
        assert_tree_invariants(&ast);
    }

    #[test]
    fn test_broken_attribute_is_a_token_error() {
        let ast = parse("<p $class=\" arst>Foo</p>");
        assert!(ast.has_syntax_errors);
        assert!(ast
            .errors
            .iter()
            .any(|e| matches!(e.kind, ErrorKind::Token(_))));
    }

    #[test]
    fn test_erroneous_and_void_end_tags() {
        let src = "<div></span></div></br>";
        let ast = parse(src);
        assert_eq!(codes(&ast), vec!["erroneous_end_tag", "void_end_tag"]);
        let div = ast.root().first_child_idx;
        assert_eq!(ast.node(div).close.slice(src), "</div>");
    }

    #[test]
    fn test_optional_end_tags_close_silently() {
        let src = "<ul><li>a<li>b</ul><p>x";
        let ast = parse(src);
        assert!(ast.errors.is_empty(), "{:?}", ast.errors);
        assert_eq!(shape(&ast, src, 0), "#root(ul(li(\"a\" li(\"b\"))) p(\"x\"))");
    }

    #[test]
    fn test_missing_end_tag_at_eof() {
        let src = "<div><section>";
        let ast = parse(src);
        assert_eq!(codes(&ast), vec!["missing_end_tag", "missing_end_tag"]);
        assert_eq!(ast.errors[0].main_location.slice(src), "section");
        assert_eq!(ast.errors[1].main_location.slice(src), "div");
    }

    #[test]
    fn test_self_closing_rules() {
        let src = "<svg><path d=\"M0\"/></svg><x-icon/><My-Widget/><Card/>";
        let ast = parse(src);
        assert!(ast.errors.is_empty(), "{:?}", ast.errors);
        assert!(!ast.has_syntax_errors);

        // `<div/>` reopens as `<div>` and swallows the rest.
        let src = "<div/><p>a</p>";
        let ast = parse(src);
        assert_eq!(
            codes(&ast),
            vec!["html_elements_cant_self_close", "missing_end_tag"]
        );
        assert!(ast.has_syntax_errors);
        let div = ast.root().first_child_idx;
        assert!(!ast.node(div).self_closing);
        let p = ast.node(div).first_child_idx;
        assert_eq!(ast.node(p).kind, Kind::Element(ElementKind::P));
        assert_tree_invariants(&ast);
    }

    #[test]
    fn test_void_elements_cant_self_close() {
        let src = "<br/><img src=\"a\"/>";
        let ast = parse(src);
        assert_eq!(
            codes(&ast),
            vec!["html_elements_cant_self_close", "html_elements_cant_self_close"]
        );
        assert!(ast.has_syntax_errors);
        assert_eq!(ast.errors[0].main_location.slice(src), "<br/>");

        // Reprocessed as plain start tags, which voids close on their own.
        let br = ast.root().first_child_idx;
        let img = ast.node(br).next_idx;
        assert!(!ast.node(br).self_closing);
        assert_eq!(ast.node(img).kind, Kind::Element(ElementKind::Img));
        assert_eq!(ast.node(img).parent_idx, 0);
        assert_tree_invariants(&ast);
    }

    #[test]
    fn test_foreign_roots_cant_self_close_outside_foreign_content() {
        let src = "<svg/><math/>";
        let ast = parse(src);
        // `svg` reopens, so `math` lands in foreign content and may self-close.
        assert_eq!(
            codes(&ast),
            vec!["html_elements_cant_self_close", "missing_end_tag"]
        );
        assert!(ast.has_syntax_errors);
        let svg = ast.root().first_child_idx;
        let math = ast.node(svg).first_child_idx;
        assert_eq!(ast.node(math).kind, Kind::Opaque);
        assert!(ast.node(math).self_closing);

        let ast = parse("<math/>");
        assert_eq!(
            codes(&ast),
            vec!["html_elements_cant_self_close", "missing_end_tag"]
        );

        let ast = parse("<svg><svg/></svg>");
        assert!(ast.errors.is_empty(), "{:?}", ast.errors);
    }

    #[test]
    fn test_foreign_content_is_opaque() {
        let src = "<svg><title>t</title><foo><g/></foo></svg><div></div>";
        let ast = parse(src);
        assert!(ast.errors.is_empty(), "{:?}", ast.errors);
        let svg = ast.root().first_child_idx;
        let title = ast.node(svg).first_child_idx;
        assert_eq!(ast.node(title).kind, Kind::Opaque);
        let div = ast.node(svg).next_idx;
        assert_eq!(ast.node(div).kind, Kind::Element(ElementKind::Div));
    }

    #[test]
    fn test_raw_text_elements() {
        let src = "<script>if (a < b) { x(\"</p>\") }</script><p>ok</p>";
        let ast = parse(src);
        assert!(ast.errors.is_empty(), "{:?}", ast.errors);
        assert_eq!(
            shape(&ast, src, 0),
            "#root(script(\"if (a < b) { x(\\\"</p>\\\") }\") p(\"ok\"))"
        );
    }

    #[test]
    fn test_text_is_trimmed_and_whitespace_dropped() {
        let src = "<p>\n  hello  \n</p>\n\n";
        let ast = parse(src);
        assert_eq!(shape(&ast, src, 0), "#root(p(\"hello\"))");
    }

    #[test]
    fn test_expressions_are_leaves() {
        let src = "<ul>{for (xs) |x| (<li>{x}</li>)}</ul>{name}";
        let ast = parse(src);
        assert!(ast.errors.is_empty(), "{:?}", ast.errors);
        assert_eq!(shape(&ast, src, 0), "#root(ul(ForExpr) TextExpr)");
        let ul = ast.root().first_child_idx;
        let expr = ast.node(ast.node(ul).first_child_idx);
        assert!(expr.is_closed());
        assert_eq!(expr.direction(), Direction::After);
    }

    #[test]
    fn test_invalid_and_deprecated_names() {
        let src = "<foo></foo><center></center><x-foo></x-foo><Card></Card>";
        let ast = parse(src);
        assert_eq!(
            codes(&ast),
            vec!["invalid_html_tag_name", "deprecated_and_unsupported"]
        );
        assert!(ast.has_syntax_errors);
    }

    #[test]
    fn test_main_nesting() {
        let ast = parse("<body><div><main></main></div></body>");
        assert!(ast.errors.is_empty(), "{:?}", ast.errors);

        let src = "<section><main></main></section>";
        let ast = parse(src);
        assert_eq!(codes(&ast), vec!["invalid_nesting"]);
        let ErrorKind::InvalidNesting { span, .. } = ast.errors[0].kind else {
            panic!("expected invalid nesting");
        };
        assert_eq!(span.slice(src), "section");
    }

    #[test]
    fn test_attribute_checks() {
        let src = concat!(
            "<div id=\"a\" ID=\"b\" class=\"x y x\"></div>",
            "<p id=\"a\" dir=\"up\" tabindex=\"1.5\" align=\"center\"></p>",
            "<img alt=\"\">",
        );
        let ast = parse(src);
        assert_eq!(
            codes(&ast),
            vec![
                "duplicate_attribute_name",
                "duplicate_class",
                "duplicate_id",
                "invalid_attr_value",
                "invalid_attr_value",
                "invalid_attr",
                "missing_required_attr",
            ]
        );
        assert!(!ast.has_syntax_errors);
    }

    #[test]
    fn test_ids_are_scoped_by_template() {
        let ast = parse("<p id=\"a\"></p><template><p id=\"a\"></p></template><p id={x}></p>");
        assert!(ast.errors.is_empty(), "{:?}", ast.errors);
    }

    #[test]
    fn test_xml_everything_opaque() {
        let src = "<root><item/><Item></Item><foo></foo></root>";
        let ast = Ast::parse(src, Language::Xml).unwrap();
        assert!(ast.errors.is_empty(), "{:?}", ast.errors);
        assert!(ast.nodes[1..].iter().all(|n| n.kind == Kind::Opaque));
    }

    #[test]
    fn test_empty_document() {
        let ast = parse("");
        assert_eq!(ast.nodes.len(), 1);
        assert!(ast.errors.is_empty());
        let ast = parse("</div>");
        assert_eq!(codes(&ast), vec!["erroneous_end_tag"]);
    }

    #[test]
    fn test_void_never_closed() {
        let src = "<p><img src=\"a\"><input></p>";
        let ast = parse(src);
        assert!(ast.errors.is_empty(), "{:?}", ast.errors);
        assert_tree_invariants(&ast);
    }
}
