//! Source map builder producing base64-VLQ `mappings` strings.

use serde::Serialize;

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// A single mapping from a generated position to an original position.
///
/// All fields are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mapping {
    /// Line in the generated output.
    pub generated_line: u32,
    /// Column in the generated output.
    pub generated_column: u32,
    /// Line in the original source.
    pub source_line: u32,
    /// Column in the original source.
    pub source_column: u32,
}

/// Appends the base64 VLQ encoding of `value` to `out`.
pub fn encode_vlq(out: &mut String, value: i64) {
    let mut vlq = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };

    loop {
        let mut digit = (vlq & 0b1_1111) as usize;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b10_0000;
        }
        out.push(BASE64[digit] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// Accumulates mappings in increasing generated order.
#[derive(Debug, Default, Clone)]
pub struct SourceMapBuilder {
    mappings: Vec<Mapping>,
}

impl SourceMapBuilder {
    /// Creates a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recorded mappings.
    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if no mapping has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Returns the recorded mappings.
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Appends a mapping.
    ///
    /// Mappings must arrive in increasing generated order; a mapping at the
    /// same generated position as the previous one replaces nothing and is
    /// dropped.
    pub fn add(&mut self, mapping: Mapping) {
        if let Some(last) = self.mappings.last() {
            let last_pos = (last.generated_line, last.generated_column);
            let pos = (mapping.generated_line, mapping.generated_column);
            debug_assert!(pos >= last_pos, "mappings must be added in order");
            if pos <= last_pos {
                return;
            }
        }
        self.mappings.push(mapping);
    }

    /// Encodes the `mappings` field of a v3 source map.
    ///
    /// `;` separates generated lines and `,` separates segments on the same
    /// line. Each segment holds the generated column (reset on every line),
    /// the source index (always 0), the source line and the source column,
    /// each delta-encoded against the previous segment.
    pub fn build(&self) -> String {
        let mut out = String::with_capacity(self.mappings.len() * 6);
        let mut line = 0;
        let mut prev_gen_col: i64 = 0;
        let mut prev_src_line: i64 = 0;
        let mut prev_src_col: i64 = 0;
        let mut first_on_line = true;

        for m in &self.mappings {
            while line < m.generated_line {
                out.push(';');
                line += 1;
                prev_gen_col = 0;
                first_on_line = true;
            }
            if !first_on_line {
                out.push(',');
            }
            first_on_line = false;

            encode_vlq(&mut out, i64::from(m.generated_column) - prev_gen_col);
            encode_vlq(&mut out, 0);
            encode_vlq(&mut out, i64::from(m.source_line) - prev_src_line);
            encode_vlq(&mut out, i64::from(m.source_column) - prev_src_col);

            prev_gen_col = i64::from(m.generated_column);
            prev_src_line = i64::from(m.source_line);
            prev_src_col = i64::from(m.source_column);
        }

        out
    }
}

/// A serialisable v3 source map document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapDocument {
    version: u8,
    file: String,
    sources: Vec<String>,
    sources_content: Vec<String>,
    names: Vec<String>,
    mappings: String,
}

impl SourceMapDocument {
    /// Creates a document for a single source file.
    pub fn new(
        file: impl Into<String>,
        source_name: impl Into<String>,
        source_content: impl Into<String>,
        builder: &SourceMapBuilder,
    ) -> Self {
        Self {
            version: 3,
            file: file.into(),
            sources: vec![source_name.into()],
            sources_content: vec![source_content.into()],
            names: Vec::new(),
            mappings: builder.build(),
        }
    }

    /// Returns the encoded `mappings` field.
    pub fn mappings(&self) -> &str {
        &self.mappings
    }

    /// Serialises the document as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping(gl: u32, gc: u32, sl: u32, sc: u32) -> Mapping {
        Mapping {
            generated_line: gl,
            generated_column: gc,
            source_line: sl,
            source_column: sc,
        }
    }

    #[test]
    fn test_vlq_digits() {
        let mut out = String::new();
        encode_vlq(&mut out, 0);
        encode_vlq(&mut out, 1);
        encode_vlq(&mut out, -1);
        encode_vlq(&mut out, 16);
        assert_eq!(out, "ACDgB");
    }

    #[test]
    fn test_same_line_segments() {
        let mut builder = SourceMapBuilder::new();
        builder.add(mapping(0, 0, 0, 0));
        builder.add(mapping(0, 4, 0, 5));
        assert_eq!(builder.build(), "AAAA,IAAK");
    }

    #[test]
    fn test_line_breaks_reset_generated_column() {
        let mut builder = SourceMapBuilder::new();
        builder.add(mapping(0, 2, 0, 2));
        builder.add(mapping(2, 1, 3, 0));
        // Line 2 restarts the generated column but keeps the source deltas.
        assert_eq!(builder.build(), "EAAE;;CAGF");
    }

    #[test]
    fn test_duplicate_position_dropped() {
        let mut builder = SourceMapBuilder::new();
        builder.add(mapping(1, 0, 0, 0));
        builder.add(mapping(1, 0, 4, 4));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_document_json_escapes_content() {
        let mut builder = SourceMapBuilder::new();
        builder.add(mapping(0, 0, 0, 0));
        let doc = SourceMapDocument::new("out.html", "in.html", "<p title=\"x\">\n", &builder);
        let json = doc.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"version":3,"file":"out.html","sources":["in.html"],"sourcesContent":["<p title=\"x\">\n"],"names":[],"mappings":"AAAA"}"#
        );
    }
}
