//! Cursor walk over the tree that writes canonical text.

use crate::expr;
use source_map::{ByteOffset, LineIndex, Mapping, SourceMapBuilder};
use tmpl_parser::{tag_name, Ast, ElementKind, Kind, Language, Node, TagHeader, Token, Tokenizer};
use tracing::trace;

/// Source map state while rendering.
struct MapState<'m> {
    builder: &'m mut SourceMapBuilder,
    index: LineIndex,
    /// Bytes of output already scanned for newlines.
    scanned: usize,
    line: u32,
    line_start: usize,
}

pub(crate) struct Renderer<'a, 'm> {
    ast: &'a Ast,
    src: &'a str,
    out: String,
    indentation: usize,
    /// Depth of nested preformatted elements.
    pre: usize,
    /// Source offset just past the last thing written.
    last_rbracket: usize,
    last_was_text: bool,
    /// One entry per open element: whether its content was indented.
    indented: Vec<bool>,
    map: Option<MapState<'m>>,
}

impl<'a, 'm> Renderer<'a, 'm> {
    pub(crate) fn new(ast: &'a Ast, src: &'a str, indentation: usize) -> Self {
        Self {
            ast,
            src,
            out: String::with_capacity(src.len() + src.len() / 8),
            indentation,
            pre: 0,
            last_rbracket: 0,
            last_was_text: false,
            indented: Vec::new(),
            map: None,
        }
    }

    pub(crate) fn with_source_map(mut self, builder: &'m mut SourceMapBuilder) -> Self {
        self.map = Some(MapState {
            builder,
            index: LineIndex::new(self.src),
            scanned: 0,
            line: 0,
            line_start: 0,
        });
        self
    }

    /// Renders a whole document, ending in a single newline.
    pub(crate) fn render(mut self) -> String {
        self.walk();
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out
    }

    /// Renders without the trailing newline.
    pub(crate) fn render_fragment(mut self) -> String {
        self.walk();
        self.out
    }

    fn walk(&mut self) {
        let mut idx = self.ast.root().first_child_idx;
        if idx == 0 {
            return;
        }
        let mut entering = true;
        loop {
            let node = *self.ast.node(idx);
            if entering {
                trace!(idx, kind = ?node.kind, "enter");
                self.enter(idx, &node);
                if node.first_child_idx != 0 {
                    idx = node.first_child_idx;
                    continue;
                }
            }
            trace!(idx, kind = ?node.kind, "exit");
            self.exit(&node);
            if node.next_idx != 0 {
                idx = node.next_idx;
                entering = true;
            } else {
                idx = node.parent_idx;
                if idx == 0 {
                    break;
                }
                entering = false;
            }
        }
    }

    // === Whitespace ===

    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push('\t');
        }
    }

    fn gap(&self, end: usize) -> &'a str {
        self.src.get(self.last_rbracket..end).unwrap_or("")
    }

    /// Writes the separator between the last output and a node at `next`.
    fn separator(&mut self, next: usize, next_inline: bool) {
        if self.out.is_empty() {
            return;
        }
        let gap = self.gap(next);
        if self.pre > 0 {
            self.out.push_str(gap);
            return;
        }
        if is_vertical(gap, self.last_was_text || next_inline) {
            self.out.push('\n');
            if gap.matches('\n').count() >= 2 {
                self.out.push('\n');
            }
            self.indent(self.indentation);
        } else if !gap.is_empty() {
            self.out.push(' ');
        }
    }

    /// Records a mapping from the current output position to `source`.
    fn mark(&mut self, source: usize) {
        let Some(map) = self.map.as_mut() else {
            return;
        };
        for (i, b) in self.out.as_bytes()[map.scanned..].iter().enumerate() {
            if *b == b'\n' {
                map.line += 1;
                map.line_start = map.scanned + i + 1;
            }
        }
        map.scanned = self.out.len();

        let at = map.index.line_col_clamped(ByteOffset::from(source as u32));
        map.builder.add(Mapping {
            generated_line: map.line,
            generated_column: (self.out.len() - map.line_start) as u32,
            source_line: at.line,
            source_column: at.col,
        });
    }

    // === Nodes ===

    fn enter(&mut self, idx: u32, node: &Node) {
        let start = node.open.range().start;
        let inline = matches!(node.kind, Kind::Text | Kind::TextExpr);
        if node.kind != Kind::Root {
            self.separator(start, inline);
            self.mark(start);
        }

        match node.kind {
            Kind::Root => return,
            Kind::Text => self.text(node),
            Kind::Comment | Kind::TextExpr => self.out.push_str(node.open.slice(self.src)),
            Kind::Doctype => self.doctype(node),
            Kind::SwitchExpr | Kind::IfExpr | Kind::ForExpr | Kind::WhileExpr => {
                self.expression(node)
            }
            Kind::Element(_) | Kind::Opaque => {
                self.open_tag(node);
                self.last_rbracket = node.open.range().end;
                self.last_was_text = false;
                self.enter_content(idx, node);
                return;
            }
        }
        self.last_rbracket = node.open.range().end;
        self.last_was_text = inline;
    }

    fn has_content(node: &Node) -> bool {
        node.kind.is_element() && !node.kind.is_void() && !node.self_closing
    }

    fn enter_content(&mut self, idx: u32, node: &Node) {
        if !Self::has_content(node) {
            return;
        }
        let preformatted = is_preformatted(node.kind);
        if self.pre > 0 || preformatted {
            if preformatted {
                self.pre += 1;
            }
            self.indented.push(false);
            return;
        }

        let next = if node.first_child_idx != 0 {
            let child = self.ast.node(node.first_child_idx);
            Some((
                child.open.range().start,
                matches!(child.kind, Kind::Text | Kind::TextExpr),
            ))
        } else if node.is_closed() {
            Some((node.close.range().start, false))
        } else {
            None
        };
        let vertical = next.is_some_and(|(start, inline)| is_vertical(self.gap(start), inline));
        trace!(idx, vertical, "content");
        if vertical {
            self.indentation += 1;
        }
        self.indented.push(vertical);
    }

    fn exit(&mut self, node: &Node) {
        if !Self::has_content(node) {
            return;
        }
        let indented = self.indented.pop().unwrap_or(false);
        if indented {
            self.indentation -= 1;
        }

        if node.is_closed() {
            let close = node.close.range();
            if self.pre > 0 {
                let gap = self.gap(close.start);
                self.out.push_str(gap);
            } else if indented {
                self.out.push('\n');
                self.indent(self.indentation);
            } else {
                self.separator(close.start, false);
            }
            self.mark(close.start);
            self.out.push_str("</");
            self.out.push_str(tag_name(self.src, node.open).slice(self.src));
            self.out.push('>');
            self.last_rbracket = close.end;
            self.last_was_text = false;
        }

        if is_preformatted(node.kind) {
            self.pre = self.pre.saturating_sub(1);
        }
    }

    fn open_tag(&mut self, node: &Node) {
        let header = TagHeader::scan(self.src, node.open, self.ast.language);
        let name = header.name.slice(self.src);
        let wrap = self.pre == 0 && header.attrs.len() >= 2 && header.space_before_end;

        self.out.push('<');
        self.out.push_str(name);
        for (i, attr) in header.attrs.iter().enumerate() {
            if wrap && i > 0 {
                self.out.push('\n');
                self.indent(self.indentation);
                for _ in 0..name.chars().count() + 2 {
                    self.out.push(' ');
                }
            } else {
                self.out.push(' ');
            }
            self.out.push_str(attr.name.slice(self.src));
            if let Some(value) = attr.value {
                self.out.push('=');
                self.out.push_str(value.span.slice(self.src));
            }
        }

        if wrap {
            self.out.push('\n');
            self.indent(self.indentation);
        } else if header.self_closing && header.space_before_end {
            self.out.push(' ');
        }
        self.out
            .push_str(if header.self_closing { "/>" } else { ">" });
    }

    fn text(&mut self, node: &Node) {
        let text = node.open.slice(self.src);
        if self.pre > 0 {
            self.out.push_str(text);
            return;
        }

        let code = matches!(
            self.ast.node(node.parent_idx).kind,
            Kind::Element(ElementKind::Script | ElementKind::Style)
        );
        let mut level = 0usize;
        let mut blank = false;
        let mut first = true;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                blank = true;
                continue;
            }
            if code && line == "}" {
                level = level.saturating_sub(1);
            }
            if !first {
                self.out.push('\n');
                if blank {
                    self.out.push('\n');
                }
                self.indent(self.indentation + level);
            }
            self.out.push_str(line);
            if code && line.ends_with('{') {
                level += 1;
            }
            first = false;
            blank = false;
        }
    }

    fn doctype(&mut self, node: &Node) {
        let text = node.open.slice(self.src);
        match Tokenizer::new(text, Language::Html).next() {
            Some(Token::Doctype { name, extra, .. }) => {
                self.out.push_str("<!DOCTYPE");
                for part in [name, extra].into_iter().flatten() {
                    self.out.push(' ');
                    self.out.push_str(part.slice(text));
                }
                self.out.push('>');
            }
            _ => self.out.push_str(text),
        }
    }

    fn expression(&mut self, node: &Node) {
        let text = node.open.slice(self.src);
        if self.pre > 0 {
            self.out.push_str(text);
            return;
        }
        match expr::format_expression(text, self.ast.language, self.indentation) {
            Some(formatted) => self.out.push_str(&formatted),
            None => self.out.push_str(text),
        }
    }
}

/// Text-adjacent gaps break only on a newline; others on any whitespace.
fn is_vertical(gap: &str, text_adjacent: bool) -> bool {
    if text_adjacent {
        gap.contains('\n')
    } else {
        !gap.is_empty()
    }
}

fn is_preformatted(kind: Kind) -> bool {
    matches!(
        kind,
        Kind::Element(ElementKind::Pre | ElementKind::Textarea)
    )
}
