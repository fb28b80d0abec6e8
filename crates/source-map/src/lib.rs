//! Source positions for the tmpl toolchain.
//!
//! This crate provides byte [`Span`]s into borrowed source text, a
//! [`LineIndex`] for line/column lookups, and a [`SourceMapBuilder`] that
//! encodes position mappings as v3 source map `mappings` strings.

mod builder;
mod line_index;
mod span;

pub use builder::{encode_vlq, Mapping, SourceMapBuilder, SourceMapDocument};
pub use line_index::{LineCol, LineIndex};
pub use span::{ByteOffset, Span};
