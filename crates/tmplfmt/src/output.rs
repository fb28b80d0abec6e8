//! Output formatting.

use crate::cli::OutputFormat;
use camino::Utf8Path;
use serde::Serialize;
use source_map::{ByteOffset, LineCol, LineIndex};
use tmpl_parser::{report, Ast};

/// A formatted diagnostic for JSON output.
#[derive(Debug, Serialize)]
pub struct FormattedDiagnostic {
    /// The file path.
    pub filename: String,
    /// The start position.
    pub start: Position,
    /// The end position.
    pub end: Position,
    /// The message.
    pub message: String,
    /// The error code.
    pub code: String,
    /// Whether the error blocks formatting.
    pub syntax: bool,
}

/// A position in the source.
#[derive(Debug, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Byte offset.
    pub offset: u32,
}

/// Everything a JSON run prints, as one document.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Errors from every file.
    pub diagnostics: &'a [FormattedDiagnostic],
    /// Files whose text would change.
    pub unformatted: &'a [String],
    /// Totals for the run.
    pub summary: &'a RunSummary,
}

/// Formats diagnostics for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the errors of one file as text.
    ///
    /// JSON output is collected with [`Formatter::format_json_diagnostics`]
    /// and printed once at the end, so this returns nothing for it.
    pub fn format(&self, ast: &Ast, file_path: &Utf8Path, source: &str) -> String {
        match self.format {
            OutputFormat::Human => report::render_errors(file_path.as_str(), source, ast),
            OutputFormat::Machine => Self::format_machine(ast, file_path, source),
            OutputFormat::Json => String::new(),
        }
    }

    /// Formats the note for a file whose text would change.
    pub fn format_unformatted(&self, file_path: &Utf8Path) -> String {
        match self.format {
            OutputFormat::Human => format!("{file_path}: not formatted\n"),
            OutputFormat::Machine => format!("UNFORMATTED {file_path}\n"),
            OutputFormat::Json => String::new(),
        }
    }

    /// Formats errors into JSON-ready structs.
    pub fn format_json_diagnostics(
        ast: &Ast,
        file_path: &Utf8Path,
        source: &str,
    ) -> Vec<FormattedDiagnostic> {
        let line_index = LineIndex::new(source);
        let position = |offset: ByteOffset| {
            let at = line_index.line_col_clamped(offset);
            Position {
                line: at.line + 1,
                column: at.col + 1,
                offset: u32::from(offset),
            }
        };

        ast.errors
            .iter()
            .map(|error| FormattedDiagnostic {
                filename: file_path.to_string(),
                start: position(error.main_location.start),
                end: position(error.main_location.end),
                message: error.kind.to_string(),
                code: error.kind.code().to_string(),
                syntax: error.kind.is_syntax(),
            })
            .collect()
    }

    /// Formats as machine-readable output.
    fn format_machine(ast: &Ast, file_path: &Utf8Path, source: &str) -> String {
        let line_index = LineIndex::new(source);
        let mut output = String::new();

        for error in &ast.errors {
            let start = line_index
                .line_col(error.main_location.start)
                .unwrap_or(LineCol::new(0, 0));
            let end = line_index
                .line_col(error.main_location.end)
                .unwrap_or(start);

            let severity = if error.kind.is_syntax() {
                "SYNTAX"
            } else {
                "ERROR"
            };

            output.push_str(&format!(
                "{} {}:{}:{}:{}:{} {} ({})\n",
                severity,
                file_path,
                start.line + 1,
                start.col + 1,
                end.line + 1,
                end.col + 1,
                error.kind,
                error.kind.code()
            ));
        }

        output
    }
}

/// Summary of a run.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    /// Number of files processed.
    pub file_count: usize,
    /// Number of errors across all files.
    pub error_count: usize,
    /// Files whose formatted text differs from the source.
    pub unformatted_count: usize,
    /// Files that could not be read or written.
    pub io_failures: usize,
    /// Whether unformatted files fail the run.
    #[serde(skip)]
    pub check: bool,
}

impl RunSummary {
    /// Whether the process should exit nonzero.
    pub fn failed(&self) -> bool {
        self.error_count > 0 || self.io_failures > 0 || (self.check && self.unformatted_count > 0)
    }

    /// Formats the summary line.
    pub fn format(&self) -> String {
        let plural = |n: usize, word: &str| {
            if n == 1 {
                format!("{n} {word}")
            } else {
                format!("{n} {word}s")
            }
        };

        let mut line = format!(
            "tmplfmt: {} with {}",
            plural(self.file_count, "file"),
            plural(self.error_count, "error")
        );
        if self.check {
            line.push_str(&format!(", {} not formatted", self.unformatted_count));
        }
        if self.io_failures > 0 {
            line.push_str(&format!(", {} unreadable", self.io_failures));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tmpl_parser::Language;

    fn parsed(source: &str) -> Ast {
        Ast::parse(source, Language::Html).unwrap()
    }

    #[test]
    fn test_format_human() {
        let source = "<div><span></div>";
        let output = Formatter::new(OutputFormat::Human).format(
            &parsed(source),
            Utf8Path::new("test.html"),
            source,
        );
        assert!(output.starts_with("test.html:1:7: "));
        assert!(output.contains("    <div><span></div>\n"));
    }

    #[test]
    fn test_format_machine() {
        let source = "<p id=\"a\"></p>\n<p id=\"a\"></p>";
        let output = Formatter::new(OutputFormat::Machine).format(
            &parsed(source),
            Utf8Path::new("test.html"),
            source,
        );
        assert!(output.starts_with("ERROR test.html:2:8:2:9 "));
        assert!(output.trim_end().ends_with("(duplicate_id)"));
    }

    #[test]
    fn test_format_json() {
        let source = "<div></p></div>";
        let diagnostics = Formatter::format_json_diagnostics(
            &parsed(source),
            Utf8Path::new("test.html"),
            source,
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "erroneous_end_tag");
        assert!(diagnostics[0].syntax);
        assert_eq!(diagnostics[0].start.column, 6);
        assert_eq!(diagnostics[0].end.offset, 9);

        let json = serde_json::to_string(&diagnostics[0]).unwrap();
        assert!(json.contains("\"filename\":\"test.html\""));
    }

    #[test]
    fn test_summary() {
        let summary = RunSummary {
            file_count: 5,
            error_count: 1,
            unformatted_count: 2,
            io_failures: 0,
            check: true,
        };
        assert_eq!(
            summary.format(),
            "tmplfmt: 5 files with 1 error, 2 not formatted"
        );
        assert!(summary.failed());

        let summary = RunSummary {
            file_count: 1,
            unformatted_count: 2,
            ..Default::default()
        };
        assert_eq!(summary.format(), "tmplfmt: 1 file with 0 errors");
        assert!(!summary.failed());
    }
}
