//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tmpl_parser::Language;

/// Formatter and checker for tmpl, HTML and XML markup.
#[derive(Debug, Parser)]
#[command(name = "tmplfmt")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files or directories to format (defaults to the current directory)
    pub paths: Vec<Utf8PathBuf>,

    /// Rewrite files in place
    #[arg(long, conflicts_with = "check")]
    pub write: bool,

    /// Exit with an error if any file is not formatted
    #[arg(long)]
    pub check: bool,

    /// Format standard input and print the result
    #[arg(long, conflicts_with_all = ["write", "check", "paths"])]
    pub stdin: bool,

    /// Parse every input as this language
    #[arg(long, value_enum)]
    pub language: Option<LanguageName>,

    /// Diagnostic output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Write a source map of the formatted output (single input only)
    #[arg(long = "source-map")]
    pub source_map: Option<Utf8PathBuf>,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with source excerpts (default)
    #[default]
    Human,
    /// JSON output
    Json,
    /// Machine-readable (one line per diagnostic)
    Machine,
}

/// A markup dialect, as named on the command line and in `tmplfmt.json`.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LanguageName {
    /// HTML; braces are plain text
    Html,
    /// XML; no HTML element rules
    Xml,
    /// HTML with `{...}` template expressions
    Template,
}

impl From<LanguageName> for Language {
    fn from(name: LanguageName) -> Self {
        match name {
            LanguageName::Html => Language::Html,
            LanguageName::Xml => Language::Xml,
            LanguageName::Template => Language::Template,
        }
    }
}

/// What to do with formatted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print it to stdout.
    Print,
    /// Write it back to the file.
    Write,
    /// Only report files whose text would change.
    Check,
}

impl Args {
    /// The requested mode; printing several files falls back to checking.
    pub fn mode(&self, file_count: usize) -> Mode {
        if self.write {
            Mode::Write
        } else if self.check || file_count != 1 {
            Mode::Check
        } else {
            Mode::Print
        }
    }
}
