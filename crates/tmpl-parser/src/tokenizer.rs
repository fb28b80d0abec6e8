//! Mode-aware markup tokenizer.
//!
//! The tokenizer is hand-written rather than generated because the token
//! grammar depends on state the tree builder owns: after `<script>` the
//! builder switches the tokenizer into [`Mode::RawText`] until the matching
//! end tag. Attributes are not part of the token stream; they are recovered
//! on demand by re-scanning a tag's span with [`Attributes`] or
//! [`TagHeader`].

use crate::ast::Language;
use crate::error::TokenError;
use source_map::Span;
use std::collections::VecDeque;
use tmpl_expr::ExprKind;

/// Tokenizer state for element content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Markup, text and expressions.
    Data,
    /// Raw text up to the matching end tag (`script`, `style`, ...).
    RawText,
    /// Escapable raw text up to the matching end tag (`title`, `textarea`).
    RcData,
}

/// The flavour of a tag token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>`
    Start,
    /// `<name .../>`
    StartSelf,
    /// `</name>`
    End,
    /// `</name/>`
    EndSelf,
}

/// How an attribute value was delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    /// `name=value`
    None,
    /// `name='value'`
    Single,
    /// `name="value"`
    Double,
    /// `name={expr}`
    Brace,
}

/// An attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrValue {
    /// The value as written, including quotes or braces.
    pub span: Span,
    /// The delimiter.
    pub quote: Quote,
}

impl AttrValue {
    /// The value without its quotes.
    pub fn content(&self) -> Span {
        match self.quote {
            Quote::None | Quote::Brace => self.span,
            Quote::Single | Quote::Double => {
                let range = self.span.range();
                Span::from_usize(range.start + 1, range.end - 1)
            }
        }
    }

    /// Whether the value is a template expression.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.quote == Quote::Brace
    }
}

/// An attribute recovered from a tag span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr {
    /// The attribute name.
    pub name: Span,
    /// The value, if any.
    pub value: Option<AttrValue>,
}

impl Attr {
    /// The span of the whole attribute, name through value.
    pub fn span(&self) -> Span {
        match self.value {
            Some(value) => self.name.cover(value.span),
            None => self.name,
        }
    }
}

/// A markup token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A start or end tag; `span` covers `<` through `>`.
    Tag {
        /// Start, end and their self-closing variants.
        kind: TagKind,
        /// The tag name.
        name: Span,
        /// The whole tag.
        span: Span,
    },
    /// `<!DOCTYPE name extra>`
    Doctype {
        /// The doctype name.
        name: Option<Span>,
        /// Anything after the name, trimmed.
        extra: Option<Span>,
        /// The whole declaration.
        span: Span,
    },
    /// Character data.
    Text {
        /// The text, untrimmed.
        span: Span,
    },
    /// `<!-- ... -->`, or a processing instruction in XML.
    Comment {
        /// The whole comment including delimiters.
        span: Span,
    },
    /// A `{...}` template expression.
    Expression {
        /// The construct, from the leading keyword.
        kind: ExprKind,
        /// The whole expression including braces.
        span: Span,
    },
    /// A lexical error; scanning continues after it.
    ParseError {
        /// What went wrong.
        kind: TokenError,
        /// Where.
        span: Span,
    },
}

/// Splits markup source into [`Token`]s.
pub struct Tokenizer<'src> {
    src: &'src str,
    bytes: &'src [u8],
    pos: usize,
    mode: Mode,
    /// The element name that ends the current raw text run.
    raw_end: &'src str,
    language: Language,
    /// Tokens found while scanning the previous one, drained first.
    pending: VecDeque<Token>,
}

impl<'src> Tokenizer<'src> {
    /// Creates a tokenizer in [`Mode::Data`].
    pub fn new(src: &'src str, language: Language) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            mode: Mode::Data,
            raw_end: "",
            language,
            pending: VecDeque::new(),
        }
    }

    /// Switches mode until the end tag named `tag_name`.
    pub fn set_mode(&mut self, mode: Mode, tag_name: &'src str) {
        self.mode = mode;
        self.raw_end = tag_name;
    }

    /// The current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn span(start: usize, end: usize) -> Span {
        Span::from_usize(start, end)
    }

    fn error(kind: TokenError, start: usize, end: usize) -> Token {
        Token::ParseError {
            kind,
            span: Self::span(start, end),
        }
    }

    fn expressions(&self) -> bool {
        self.language == Language::Template
    }

    fn starts_with_ignore_case(&self, at: usize, prefix: &str) -> bool {
        self.bytes
            .get(at..at + prefix.len())
            .is_some_and(|b| b.eq_ignore_ascii_case(prefix.as_bytes()))
    }

    // === Data mode ===

    fn text(&mut self) -> Token {
        let start = self.pos;
        let template = self.expressions();
        self.pos += 1;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'<' || (template && b == b'{') {
                break;
            }
            self.pos += 1;
        }
        Token::Text {
            span: Self::span(start, self.pos),
        }
    }

    fn expression(&mut self) -> Token {
        let start = self.pos;
        match scan_expression_end(self.bytes, start) {
            Some(end) => {
                self.pos = end;
                let kind = ExprKind::sniff(&self.src[start + 1..end - 1]);
                Token::Expression {
                    kind,
                    span: Self::span(start, end),
                }
            }
            None => {
                self.pos = self.bytes.len();
                Self::error(TokenError::EofInExpression, start, self.pos)
            }
        }
    }

    fn markup(&mut self) -> Token {
        let start = self.pos;
        match self.bytes.get(start + 1) {
            None => {
                self.pos += 1;
                Self::error(TokenError::EofBeforeTagName, start, self.pos)
            }
            Some(b) if b.is_ascii_alphabetic() => self.tag(start, false),
            Some(b'/') => match self.bytes.get(start + 2) {
                Some(b) if b.is_ascii_alphabetic() => self.tag(start, true),
                Some(b'>') => {
                    self.pos += 3;
                    Self::error(TokenError::MissingEndTagName, start, self.pos)
                }
                None => {
                    self.pos = self.bytes.len();
                    Self::error(TokenError::EofBeforeTagName, start, self.pos)
                }
                Some(_) => {
                    self.bogus_comment();
                    Self::error(TokenError::InvalidFirstCharacterOfTagName, start, self.pos)
                }
            },
            Some(b'!') => {
                if self.bytes[start..].starts_with(b"<!--") {
                    self.comment()
                } else if self.starts_with_ignore_case(start, "<!doctype") {
                    self.doctype()
                } else {
                    self.bogus_comment();
                    Self::error(TokenError::IncorrectlyOpenedComment, start, self.pos)
                }
            }
            Some(b'?') if self.language == Language::Xml => {
                match find(self.bytes, start + 2, b"?>") {
                    Some(idx) => {
                        self.pos = idx + 2;
                        Token::Comment {
                            span: Self::span(start, self.pos),
                        }
                    }
                    None => {
                        self.pos = self.bytes.len();
                        Self::error(TokenError::EofInComment, start, self.pos)
                    }
                }
            }
            Some(_) => {
                self.pos += 1;
                Self::error(TokenError::InvalidFirstCharacterOfTagName, start, self.pos)
            }
        }
    }

    /// Skips to just past the next `>`, or to the end of input.
    fn bogus_comment(&mut self) {
        self.pos = match self.bytes[self.pos..].iter().position(|&b| b == b'>') {
            Some(idx) => self.pos + idx + 1,
            None => self.bytes.len(),
        };
    }

    fn comment(&mut self) -> Token {
        let start = self.pos;
        let body = start + 4;
        for abrupt in [&b">"[..], &b"->"[..]] {
            if self.bytes[body..].starts_with(abrupt) {
                self.pos = body + abrupt.len();
                self.pending.push_back(Self::error(
                    TokenError::AbruptClosingOfEmptyComment,
                    start,
                    self.pos,
                ));
                return Token::Comment {
                    span: Self::span(start, self.pos),
                };
            }
        }
        match find(self.bytes, body, b"-->") {
            Some(idx) => {
                self.pos = idx + 3;
                Token::Comment {
                    span: Self::span(start, self.pos),
                }
            }
            None => {
                self.pos = self.bytes.len();
                Self::error(TokenError::EofInComment, start, self.pos)
            }
        }
    }

    fn doctype(&mut self) -> Token {
        let start = self.pos;
        let Some(gt) = find(self.bytes, start, b">") else {
            self.pos = self.bytes.len();
            return Self::error(TokenError::EofInDoctype, start, self.pos);
        };
        self.pos = gt + 1;

        let mut cursor = start + "<!doctype".len();
        cursor = skip_whitespace(&self.bytes[..gt], cursor);
        let name_start = cursor;
        while cursor < gt && !self.bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        let name = (cursor > name_start).then(|| Self::span(name_start, cursor));
        if name.is_none() {
            self.pending.push_back(Self::error(
                TokenError::MissingDoctypeName,
                start,
                self.pos,
            ));
        }

        let extra_start = skip_whitespace(&self.bytes[..gt], cursor);
        let mut extra_end = gt;
        while extra_end > extra_start && self.bytes[extra_end - 1].is_ascii_whitespace() {
            extra_end -= 1;
        }
        let extra = (extra_end > extra_start).then(|| Self::span(extra_start, extra_end));

        Token::Doctype {
            name,
            extra,
            span: Self::span(start, self.pos),
        }
    }

    fn tag(&mut self, start: usize, is_end: bool) -> Token {
        let name_start = start + if is_end { 2 } else { 1 };
        let name_end = scan_tag_name(self.bytes, name_start);
        let name = Self::span(name_start, name_end);

        let mut errors = Vec::new();
        let mut cursor = TagCursor::new(self.bytes, name_end, self.expressions());
        let self_closing = loop {
            match cursor.step(&mut errors) {
                Step::Attr(attr) => {
                    if is_end {
                        errors.push((TokenError::EndTagWithAttributes, attr.span()));
                    }
                }
                Step::End { self_closing } => break self_closing,
                Step::Eof => {
                    self.pos = self.bytes.len();
                    self.pending.extend(
                        errors
                            .into_iter()
                            .map(|(kind, span)| Token::ParseError { kind, span }),
                    );
                    self.pending
                        .push_back(Self::error(TokenError::EofInTag, start, self.pos));
                    return self
                        .pending
                        .pop_front()
                        .unwrap_or(Self::error(TokenError::EofInTag, start, self.pos));
                }
            }
        };
        self.pos = cursor.pos;

        let kind = match (is_end, self_closing) {
            (false, false) => TagKind::Start,
            (false, true) => TagKind::StartSelf,
            (true, false) => TagKind::End,
            (true, true) => {
                errors.push((
                    TokenError::EndTagWithTrailingSolidus,
                    Self::span(self.pos - 2, self.pos),
                ));
                TagKind::EndSelf
            }
        };
        self.pending.extend(
            errors
                .into_iter()
                .map(|(kind, span)| Token::ParseError { kind, span }),
        );
        Token::Tag {
            kind,
            name,
            span: Self::span(start, self.pos),
        }
    }

    // === Raw text ===

    fn raw_text(&mut self) -> Option<Token> {
        let start = self.pos;
        let mut search = start;
        let end = loop {
            match find(self.bytes, search, b"</") {
                None => break self.bytes.len(),
                Some(idx) => {
                    let name_start = idx + 2;
                    let name_end = name_start + self.raw_end.len();
                    let closes = self.starts_with_ignore_case(name_start, self.raw_end)
                        && matches!(
                            self.bytes.get(name_end),
                            None | Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
                        );
                    if closes {
                        self.mode = Mode::Data;
                        break idx;
                    }
                    search = idx + 2;
                }
            }
        };

        if end == start {
            return self.next();
        }
        self.pos = end;
        Some(Token::Text {
            span: Self::span(start, end),
        })
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }
        if self.pos >= self.bytes.len() {
            return None;
        }
        if self.mode != Mode::Data {
            return self.raw_text();
        }

        let token = match self.bytes[self.pos] {
            b'<' => self.markup(),
            b'{' if self.expressions() => self.expression(),
            _ => self.text(),
        };
        Some(token)
    }
}

// === Tag scanning shared by the tokenizer and attribute re-scans ===

enum Step {
    Attr(Attr),
    End { self_closing: bool },
    Eof,
}

/// Walks the inside of a tag one attribute at a time.
struct TagCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    expressions: bool,
}

impl<'a> TagCursor<'a> {
    fn new(bytes: &'a [u8], pos: usize, expressions: bool) -> Self {
        Self {
            bytes,
            pos,
            expressions,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        self.pos = skip_whitespace(self.bytes, self.pos);
    }

    fn step(&mut self, errors: &mut Vec<(TokenError, Span)>) -> Step {
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Step::Eof,
                Some(b'>') => {
                    self.pos += 1;
                    return Step::End {
                        self_closing: false,
                    };
                }
                Some(b'/') => {
                    if self.bytes.get(self.pos + 1) == Some(&b'>') {
                        self.pos += 2;
                        return Step::End { self_closing: true };
                    }
                    errors.push((
                        TokenError::UnexpectedSolidusInTag,
                        Span::from_usize(self.pos, self.pos + 1),
                    ));
                    self.pos += 1;
                }
                Some(_) => return self.attribute(errors),
            }
        }
    }

    fn attribute(&mut self, errors: &mut Vec<(TokenError, Span)>) -> Step {
        let start = self.pos;
        if self.peek() == Some(b'=') {
            errors.push((
                TokenError::UnexpectedEqualsSignBeforeAttributeName,
                Span::from_usize(start, start + 1),
            ));
            self.pos += 1;
        }
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || matches!(b, b'/' | b'>' | b'=') {
                break;
            }
            if matches!(b, b'"' | b'\'' | b'<') {
                errors.push((
                    TokenError::UnexpectedCharacterInAttributeName,
                    Span::from_usize(self.pos, self.pos + 1),
                ));
            }
            self.pos += 1;
        }
        let name = Span::from_usize(start, self.pos);

        let after_name = self.pos;
        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            self.pos = after_name;
            return Step::Attr(Attr { name, value: None });
        }
        self.pos += 1;
        self.skip_whitespace();

        let value_start = self.pos;
        let value = match self.peek() {
            None => return Step::Eof,
            Some(q @ (b'"' | b'\'')) => {
                let Some(close) = self.bytes[value_start + 1..].iter().position(|&b| b == q)
                else {
                    return Step::Eof;
                };
                self.pos = value_start + 1 + close + 1;
                if let Some(b) = self.peek() {
                    if !b.is_ascii_whitespace() && b != b'>' && b != b'/' {
                        errors.push((
                            TokenError::MissingWhitespaceBetweenAttributes,
                            Span::from_usize(self.pos, self.pos + 1),
                        ));
                    }
                }
                let quote = if q == b'"' {
                    Quote::Double
                } else {
                    Quote::Single
                };
                Some(AttrValue {
                    span: Span::from_usize(value_start, self.pos),
                    quote,
                })
            }
            Some(b'{') if self.expressions => {
                let Some(end) = scan_expression_end(self.bytes, value_start) else {
                    return Step::Eof;
                };
                self.pos = end;
                Some(AttrValue {
                    span: Span::from_usize(value_start, end),
                    quote: Quote::Brace,
                })
            }
            Some(b'>') => {
                errors.push((
                    TokenError::MissingAttributeValue,
                    Span::from_usize(value_start, value_start + 1),
                ));
                None
            }
            Some(_) => {
                while let Some(b) = self.peek() {
                    if b.is_ascii_whitespace() || b == b'>' {
                        break;
                    }
                    if matches!(b, b'"' | b'\'' | b'<' | b'=' | b'`') {
                        errors.push((
                            TokenError::UnexpectedCharacterInUnquotedAttributeValue,
                            Span::from_usize(self.pos, self.pos + 1),
                        ));
                    }
                    self.pos += 1;
                }
                Some(AttrValue {
                    span: Span::from_usize(value_start, self.pos),
                    quote: Quote::None,
                })
            }
        };

        Step::Attr(Attr { name, value })
    }
}

/// Iterates the attributes of an already tokenized tag.
pub struct Attributes<'src> {
    cursor: TagCursor<'src>,
    scratch: Vec<(TokenError, Span)>,
    done: bool,
    self_closing: bool,
}

impl<'src> Attributes<'src> {
    /// Re-scans the tag at `tag` (a start or end tag span) in `src`.
    pub fn new(src: &'src str, tag: Span, language: Language) -> Self {
        let bytes = src.as_bytes();
        let end = tag.range().end.min(bytes.len());
        let bytes = &bytes[..end];
        let name = tag_name(src, tag);
        Self {
            cursor: TagCursor::new(bytes, name.range().end, language == Language::Template),
            scratch: Vec::new(),
            done: false,
            self_closing: false,
        }
    }

    /// Whether the tag ended with `/>`; meaningful once iteration is done.
    pub fn self_closing(&self) -> bool {
        self.self_closing
    }
}

impl Iterator for Attributes<'_> {
    type Item = Attr;

    fn next(&mut self) -> Option<Attr> {
        if self.done {
            return None;
        }
        match self.cursor.step(&mut self.scratch) {
            Step::Attr(attr) => Some(attr),
            Step::End { self_closing } => {
                self.done = true;
                self.self_closing = self_closing;
                None
            }
            Step::Eof => {
                self.done = true;
                None
            }
        }
    }
}

/// A decoded tag, as needed to print it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagHeader {
    /// The tag name.
    pub name: Span,
    /// The attributes in source order.
    pub attrs: Vec<Attr>,
    /// Whether the tag ends with `/>`.
    pub self_closing: bool,
    /// Whether whitespace separates the last attribute from `>` or `/>`.
    pub space_before_end: bool,
}

impl TagHeader {
    /// Decodes the tag at `tag`.
    pub fn scan(src: &str, tag: Span, language: Language) -> Self {
        let name = tag_name(src, tag);
        let mut iter = Attributes::new(src, tag, language);
        let attrs: Vec<Attr> = iter.by_ref().collect();
        let self_closing = iter.self_closing();

        let bytes = tag.slice(src).as_bytes();
        let end = bytes.len().saturating_sub(if self_closing { 2 } else { 1 });
        let space_before_end = end > 0 && bytes[end - 1].is_ascii_whitespace();

        Self {
            name,
            attrs,
            self_closing,
            space_before_end,
        }
    }
}

/// Recovers the name span of the tag starting at `tag.start`.
pub fn tag_name(src: &str, tag: Span) -> Span {
    let bytes = src.as_bytes();
    let mut start = tag.range().start + 1;
    if bytes.get(start) == Some(&b'/') {
        start += 1;
    }
    let start = start.min(bytes.len());
    Span::from_usize(start, scan_tag_name(bytes, start))
}

fn scan_tag_name(bytes: &[u8], mut pos: usize) -> usize {
    while let Some(&b) = bytes.get(pos) {
        if b.is_ascii_whitespace() || b == b'/' || b == b'>' {
            break;
        }
        pos += 1;
    }
    pos
}

/// Finds the end (exclusive) of the `{...}` starting at `start`.
///
/// Braces inside double-quoted strings do not count. A string left open at
/// the end of a line is treated as a literal quote.
pub fn scan_expression_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = start;
    while let Some(&b) = bytes.get(pos) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos + 1);
                }
            }
            b'"' => {
                if let Some(end) = string_end(bytes, pos) {
                    pos = end;
                    continue;
                }
            }
            _ => {}
        }
        pos += 1;
    }
    None
}

fn string_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut pos = start + 1;
    while let Some(&b) = bytes.get(pos) {
        match b {
            b'\\' => pos += 2,
            b'"' => return Some(pos + 1),
            b'\n' => return None,
            _ => pos += 1,
        }
    }
    None
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
        pos += 1;
    }
    pos
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|idx| from + idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(src: &str) -> Vec<Token> {
        Tokenizer::new(src, Language::Template).collect()
    }

    fn describe(src: &str, token: &Token) -> String {
        match token {
            Token::Tag { kind, name, .. } => format!("{kind:?}({})", name.slice(src)),
            Token::Doctype { name, .. } => {
                format!("Doctype({})", name.map(|n| n.slice(src)).unwrap_or(""))
            }
            Token::Text { span } => format!("Text({:?})", span.slice(src)),
            Token::Comment { span } => format!("Comment({})", span.slice(src)),
            Token::Expression { kind, span } => format!("{kind:?}({})", span.slice(src)),
            Token::ParseError { kind, .. } => format!("Error({kind:?})"),
        }
    }

    fn describe_all(src: &str) -> Vec<String> {
        tokens(src).iter().map(|t| describe(src, t)).collect()
    }

    #[test]
    fn test_simple_element() {
        assert_eq!(
            describe_all("<div class=\"a\">hi</div>"),
            vec!["Start(div)", "Text(\"hi\")", "End(div)"]
        );
    }

    #[test]
    fn test_self_closing_and_doctype() {
        assert_eq!(
            describe_all("<!DOCTYPE html><br/><!-- c -->"),
            vec!["Doctype(html)", "StartSelf(br)", "Comment(<!-- c -->)"]
        );
    }

    #[test]
    fn test_doctype_extra() {
        let src = "<!doctype html PUBLIC \"x\" >";
        let Some(Token::Doctype { name, extra, .. }) = tokens(src).into_iter().next() else {
            panic!("expected doctype");
        };
        assert_eq!(name.map(|n| n.slice(src)), Some("html"));
        assert_eq!(extra.map(|e| e.slice(src)), Some("PUBLIC \"x\""));
    }

    #[test]
    fn test_expressions() {
        assert_eq!(
            describe_all("<p>{user.name}</p>{if (x) (<b>{\"}\"}</b>)}"),
            vec![
                "Start(p)",
                "Text({user.name})",
                "End(p)",
                "If({if (x) (<b>{\"}\"}</b>)})",
            ]
        );
    }

    #[test]
    fn test_expressions_only_in_templates() {
        let src = "<p>{x}</p>";
        let names: Vec<_> = Tokenizer::new(src, Language::Html)
            .map(|t| describe(src, &t))
            .collect();
        assert_eq!(names, vec!["Start(p)", "Text(\"{x}\")", "End(p)"]);
    }

    #[test]
    fn test_raw_text_mode() {
        let src = "<script>if (a < b) { x = \"</div>\"; }</SCRIPT >";
        let mut tokenizer = Tokenizer::new(src, Language::Template);
        let first = tokenizer.next().unwrap();
        assert_eq!(describe(src, &first), "Start(script)");
        tokenizer.set_mode(Mode::RawText, "script");
        let rest: Vec<_> = tokenizer.map(|t| describe(src, &t)).collect();
        assert_eq!(
            rest,
            vec![
                "Text(\"if (a < b) { x = \\\"</div>\\\"; }\")",
                "End(SCRIPT)"
            ]
        );
    }

    #[test]
    fn test_empty_raw_text() {
        let src = "<style></style>";
        let mut tokenizer = Tokenizer::new(src, Language::Html);
        tokenizer.next();
        tokenizer.set_mode(Mode::RawText, "style");
        let rest: Vec<_> = tokenizer.map(|t| describe(src, &t)).collect();
        assert_eq!(rest, vec!["End(style)"]);
    }

    #[test]
    fn test_unterminated_tag() {
        assert_eq!(describe_all("<div class=\"a"), vec!["Error(EofInTag)"]);
        assert_eq!(describe_all("<div"), vec!["Error(EofInTag)"]);
    }

    #[test]
    fn test_lexical_errors() {
        assert_eq!(
            describe_all("< div>"),
            vec!["Error(InvalidFirstCharacterOfTagName)", "Text(\" div>\")"]
        );
        assert_eq!(describe_all("</>"), vec!["Error(MissingEndTagName)"]);
        assert_eq!(describe_all("<!-->"), vec!["Comment(<!-->)", "Error(AbruptClosingOfEmptyComment)"]);
        assert_eq!(describe_all("<!-- x"), vec!["Error(EofInComment)"]);
        assert_eq!(describe_all("{if (x)"), vec!["Error(EofInExpression)"]);
        assert_eq!(describe_all("<!foo>"), vec!["Error(IncorrectlyOpenedComment)"]);
        assert_eq!(
            describe_all("</a href=x>"),
            vec!["End(a)", "Error(EndTagWithAttributes)"]
        );
        assert_eq!(
            describe_all("<a b=\"c\"d>"),
            vec!["Start(a)", "Error(MissingWhitespaceBetweenAttributes)"]
        );
        assert_eq!(
            describe_all("<a b=>"),
            vec!["Start(a)", "Error(MissingAttributeValue)"]
        );
    }

    #[test]
    fn test_attribute_quote_in_name() {
        let names = describe_all("<p $class=\" arst>Foo</p>");
        assert_eq!(names, vec!["Error(EofInTag)"]);
    }

    #[test]
    fn test_attributes_rescan() {
        let src = "<input type=text disabled value='a b' data-x={ x.y } />";
        let tag = Span::from_usize(0, src.len());
        let attrs: Vec<_> = Attributes::new(src, tag, Language::Template)
            .map(|a| {
                (
                    a.name.slice(src),
                    a.value.map(|v| (v.content().slice(src), v.quote)),
                )
            })
            .collect();
        assert_eq!(
            attrs,
            vec![
                ("type", Some(("text", Quote::None))),
                ("disabled", None),
                ("value", Some(("a b", Quote::Single))),
                ("data-x", Some(("{ x.y }", Quote::Brace))),
            ]
        );
    }

    #[test]
    fn test_tag_header() {
        let src = "<div id=\"foo\" class=\"bar\" >";
        let header = TagHeader::scan(src, Span::from_usize(0, src.len()), Language::Html);
        assert_eq!(header.name.slice(src), "div");
        assert_eq!(header.attrs.len(), 2);
        assert!(header.space_before_end);
        assert!(!header.self_closing);

        let src = "<img src=\"a\"/>";
        let header = TagHeader::scan(src, Span::from_usize(0, src.len()), Language::Html);
        assert!(header.self_closing);
        assert!(!header.space_before_end);
    }

    #[test]
    fn test_tag_name_of_end_tag() {
        let src = "</Span>";
        assert_eq!(tag_name(src, Span::from_usize(0, src.len())).slice(src), "Span");
    }

    #[test]
    fn test_xml_processing_instruction() {
        let src = "<?xml version=\"1.0\"?><a/>";
        let names: Vec<_> = Tokenizer::new(src, Language::Xml)
            .map(|t| describe(src, &t))
            .collect();
        assert_eq!(
            names,
            vec!["Comment(<?xml version=\"1.0\"?>)", "StartSelf(a)"]
        );
    }
}
