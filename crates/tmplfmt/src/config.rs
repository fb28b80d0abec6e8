//! Configuration loading.

use crate::cli::LanguageName;
use camino::Utf8Path;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use tmpl_parser::Language;
use tracing::debug;

/// Name of the optional configuration file in the working directory.
pub const CONFIG_FILE: &str = "tmplfmt.json";

/// Project configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// File name suffixes picked up when walking directories.
    pub extensions: Vec<String>,

    /// Glob patterns to skip, relative to the walked directory.
    pub ignore: Vec<String>,

    /// Language per extension, with or without the leading dot.
    pub languages: HashMap<String, LanguageName>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: [".html", ".htm", ".xml", ".svg", ".tmpl"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            ignore: Vec::new(),
            languages: HashMap::new(),
        }
    }
}

impl Config {
    /// Loads `tmplfmt.json` from `root`, or the defaults if it is absent.
    pub fn load(root: &Utf8Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        debug!(%path, "loading config");
        let content = fs::read_to_string(&path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {path}"))?;
        Self::parse(&content).wrap_err_with(|| format!("invalid config in {path}"))
    }

    fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).into_diagnostic()
    }

    /// Whether a walked file should be formatted.
    pub fn matches(&self, file_name: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| file_name.ends_with(ext.as_str()))
    }

    /// The language for `path`: configured mappings first, then the
    /// built-in extension table.
    pub fn language_for(&self, path: &Utf8Path) -> Language {
        let ext = path.extension().unwrap_or("");
        let configured = self
            .languages
            .iter()
            .find(|(key, _)| key.trim_start_matches('.').eq_ignore_ascii_case(ext));
        if let Some((_, &name)) = configured {
            return name.into();
        }
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Language::Html,
            "xml" | "svg" => Language::Xml,
            _ => Language::Template,
        }
    }
}
