//! Editor completions from a parsed tree.

use crate::ast::{Ast, Kind};
use crate::error::ErrorKind;
use crate::kinds::{Content, ElementKind, GLOBAL_ATTRIBUTES};
use source_map::ByteOffset;

/// What a completion inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// An element name.
    Element,
    /// An attribute name.
    Attribute,
}

/// One suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The text to insert.
    pub label: &'static str,
    /// A short description, possibly empty.
    pub description: &'static str,
    /// Element or attribute.
    pub kind: CompletionKind,
}

impl Ast {
    /// Suggests element or attribute names for the cursor at `offset`.
    ///
    /// Right after `<` or `</` (which the tokenizer reports as an error)
    /// the elements allowed by the enclosing element are offered. Inside a
    /// start tag, the attributes not yet present are offered.
    pub fn completions(&self, src: &str, offset: u32) -> Vec<Completion> {
        let at = ByteOffset::from(offset);

        let tag_error = self.errors.iter().find(|e| {
            matches!(e.kind, ErrorKind::Token(_)) && e.main_location.contains_inclusive(at)
        });
        if let Some(error) = tag_error {
            let before = src.get(..offset as usize).unwrap_or(src).trim_end();
            if before.ends_with('<') || before.ends_with('/') {
                return self.element_completions(error.node_idx);
            }
        }

        match self.tag_at(offset) {
            Some(idx) => self.attribute_completions(src, idx, offset),
            None => Vec::new(),
        }
    }

    /// Finds the element whose start tag contains `offset`.
    fn tag_at(&self, offset: u32) -> Option<u32> {
        let mut parent = 0;
        loop {
            let idx = self
                .children(parent)
                .take_while(|&c| u32::from(self.node(c).open.start) < offset)
                .last()?;
            let node = self.node(idx);
            if node.kind.is_element() && offset < u32::from(node.open.end) {
                return Some(idx);
            }
            if node.is_closed() && offset >= u32::from(node.close.start) {
                return None;
            }
            parent = idx;
        }
    }

    fn element_completions(&self, parent: u32) -> Vec<Completion> {
        let Some(kinds) = self.allowed_children(parent) else {
            return Vec::new();
        };
        kinds
            .into_iter()
            .map(|kind| Completion {
                label: kind.as_str(),
                description: "",
                kind: CompletionKind::Element,
            })
            .collect()
    }

    fn allowed_children(&self, parent: u32) -> Option<Vec<ElementKind>> {
        let mut idx = parent;
        loop {
            if idx == 0 {
                return None;
            }
            let node = self.node(idx);
            let Kind::Element(element) = node.kind else {
                return None;
            };
            if element.is_foreign_root() {
                return None;
            }
            let content = element.content();
            let kinds = match content {
                Content::Transparent => {
                    idx = node.parent_idx;
                    if idx == 0 {
                        return Some(by_category(Content::Flow));
                    }
                    continue;
                }
                Content::Children(list) => list.to_vec(),
                Content::Nothing | Content::Text => Vec::new(),
                Content::Any => ElementKind::ALL
                    .iter()
                    .copied()
                    .filter(|k| !k.is_deprecated())
                    .collect(),
                Content::Flow | Content::Phrasing | Content::Metadata => by_category(content),
            };
            return Some(kinds);
        }
    }

    fn attribute_completions(&self, src: &str, idx: u32, offset: u32) -> Vec<Completion> {
        let mut present = Vec::new();
        for attr in self.attributes(src, idx) {
            if let Some(value) = attr.value {
                let range = value.span.range();
                if (range.start as u32) < offset && offset < range.end as u32 {
                    return Vec::new();
                }
            }
            present.push(attr.name.slice(src).to_ascii_lowercase());
        }
        let missing = |name: &str| !present.iter().any(|p| p == name);

        let mut out: Vec<Completion> = GLOBAL_ATTRIBUTES
            .iter()
            .filter(|(name, _)| missing(name))
            .map(|&(label, description)| Completion {
                label,
                description,
                kind: CompletionKind::Attribute,
            })
            .collect();
        if let Kind::Element(element) = self.node(idx).kind {
            out.extend(
                element
                    .attributes()
                    .iter()
                    .filter(|name| missing(name))
                    .map(|&label| Completion {
                        label,
                        description: "",
                        kind: CompletionKind::Attribute,
                    }),
            );
        }
        out
    }
}

fn by_category(content: Content) -> Vec<ElementKind> {
    let Some(categories) = content.accepted_categories() else {
        return Vec::new();
    };
    ElementKind::ALL
        .iter()
        .copied()
        .filter(|k| !k.is_deprecated() && k.categories().intersects(categories))
        .collect()
}
