//! Main orchestration logic.

use crate::cli::{Args, Mode, OutputFormat};
use crate::config::Config;
use crate::output::{FormattedDiagnostic, Formatter, JsonReport, RunSummary};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use miette::{Diagnostic, IntoDiagnostic, Result, WrapErr};
use rayon::prelude::*;
use source_map::{SourceMapBuilder, SourceMapDocument};
use std::fs;
use std::io::{self, Write};
use thiserror::Error;
use tmpl_formatter::{render, render_with_source_map};
use tmpl_parser::{Ast, Language};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Orchestration errors.
#[derive(Debug, Error, Diagnostic)]
pub enum OrchestratorError {
    /// Invalid glob pattern.
    #[error("invalid glob pattern `{pattern}`")]
    #[diagnostic(code(tmplfmt::invalid_glob))]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// A path on the command line does not exist.
    #[error("no such file or directory: {0}")]
    #[diagnostic(code(tmplfmt::missing_path))]
    MissingPath(Utf8PathBuf),

    /// `--source-map` with more than one input.
    #[error("--source-map needs exactly one input file, found {0}")]
    #[diagnostic(
        code(tmplfmt::source_map_inputs),
        help("pass a single file or use --stdin")
    )]
    SourceMapInputs(usize),
}

/// Directories never worth walking into.
const DEFAULT_IGNORES: [&str; 3] = ["**/.git/**", "**/node_modules/**", "**/target/**"];

/// The result of formatting one file.
struct FileOutput {
    path: Utf8PathBuf,
    /// Diagnostics in the text output formats.
    text: String,
    json: Vec<FormattedDiagnostic>,
    error_count: usize,
    /// The formatted text, or `None` if formatting was refused.
    formatted: Option<String>,
    changed: bool,
    source_map: Option<String>,
    io_failed: bool,
}

/// Runs the formatter over the inputs named by `args`.
pub fn run(args: &Args) -> Result<RunSummary> {
    let cwd = std::env::current_dir()
        .into_diagnostic()
        .and_then(|p| Utf8PathBuf::try_from(p).into_diagnostic())
        .wrap_err("failed to resolve the working directory")?;
    let config = Config::load(&cwd)?;

    if args.stdin {
        return run_stdin(args);
    }

    let ignore_set = build_ignore_set(config.ignore.iter().chain(&args.ignore))?;
    let roots = if args.paths.is_empty() {
        vec![Utf8PathBuf::from(".")]
    } else {
        args.paths.clone()
    };
    let files = discover(&roots, &config, &ignore_set)?;
    info!(files = files.len(), "discovered inputs");

    if args.source_map.is_some() && files.len() != 1 {
        return Err(OrchestratorError::SourceMapInputs(files.len()).into());
    }

    let mode = args.mode(files.len());
    let formatter = Formatter::new(args.output);

    let outputs: Vec<FileOutput> = files
        .par_iter()
        .map(|path| {
            let language = args
                .language
                .map(Language::from)
                .unwrap_or_else(|| config.language_for(path));
            process_file(path, language, mode, &formatter, args.source_map.is_some())
        })
        .collect();

    let mut summary = RunSummary {
        file_count: files.len(),
        check: mode == Mode::Check,
        ..Default::default()
    };
    let mut diagnostics = Vec::new();
    let mut unformatted = Vec::new();
    let mut report = String::new();
    let mut printed = String::new();

    for output in outputs {
        if output.io_failed {
            summary.io_failures += 1;
            continue;
        }
        summary.error_count += output.error_count;
        report.push_str(&output.text);
        diagnostics.extend(output.json);

        let Some(formatted) = output.formatted else {
            continue;
        };
        match mode {
            Mode::Print => printed = formatted,
            Mode::Check if output.changed => {
                summary.unformatted_count += 1;
                report.push_str(&formatter.format_unformatted(&output.path));
                unformatted.push(output.path.to_string());
            }
            Mode::Write if output.changed => {
                debug!(path = %output.path, "writing");
                if let Err(e) = fs::write(&output.path, formatted) {
                    eprintln!("Failed to write {}: {}", output.path, e);
                    summary.io_failures += 1;
                }
            }
            _ => {}
        }

        if let (Some(map), Some(map_path)) = (output.source_map, &args.source_map) {
            fs::write(map_path, map)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to write {map_path}"))?;
        }
    }

    // Formatted text owns stdout in print mode.
    let mut diagnostics_out: Box<dyn Write> = if mode == Mode::Print {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    if args.output == OutputFormat::Json {
        let json = JsonReport {
            diagnostics: &diagnostics,
            unformatted: &unformatted,
            summary: &summary,
        };
        let text = serde_json::to_string_pretty(&json).into_diagnostic()?;
        writeln!(diagnostics_out, "{text}").into_diagnostic()?;
    } else {
        diagnostics_out.write_all(report.as_bytes()).into_diagnostic()?;
        if args.output == OutputFormat::Human && mode != Mode::Print {
            writeln!(diagnostics_out, "{}", summary.format()).into_diagnostic()?;
        }
    }
    if mode == Mode::Print {
        io::stdout().write_all(printed.as_bytes()).into_diagnostic()?;
    }

    Ok(summary)
}

/// Formats standard input to standard output.
fn run_stdin(args: &Args) -> Result<RunSummary> {
    let source = io::read_to_string(io::stdin())
        .into_diagnostic()
        .wrap_err("failed to read stdin")?;
    let language = args
        .language
        .map(Language::from)
        .unwrap_or(Language::Template);
    let path = Utf8Path::new("<stdin>");
    let formatter = Formatter::new(args.output);

    let output = format_source(
        path,
        &source,
        language,
        &formatter,
        args.source_map.is_some(),
    )?;
    let mut summary = RunSummary {
        file_count: 1,
        error_count: output.error_count,
        ..Default::default()
    };

    if args.output == OutputFormat::Json {
        let json = JsonReport {
            diagnostics: &output.json,
            unformatted: &[],
            summary: &summary,
        };
        let text = serde_json::to_string_pretty(&json).into_diagnostic()?;
        eprintln!("{text}");
    } else {
        eprint!("{}", output.text);
    }

    if let Some(formatted) = output.formatted {
        io::stdout().write_all(formatted.as_bytes()).into_diagnostic()?;
    } else {
        summary.error_count = summary.error_count.max(1);
    }
    if let (Some(map), Some(map_path)) = (output.source_map, &args.source_map) {
        fs::write(map_path, map)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write {map_path}"))?;
    }
    Ok(summary)
}

fn build_ignore_set<'a>(patterns: impl Iterator<Item = &'a String>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns.map(String::as_str).chain(DEFAULT_IGNORES) {
        let glob = Glob::new(pattern).map_err(|source| OrchestratorError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|source| OrchestratorError::InvalidGlob {
            pattern: "<set>".to_string(),
            source,
        })?;
    Ok(set)
}

/// Expands `roots` into the files to format.
///
/// Files named explicitly are always taken; directories are walked for
/// configured extensions, skipping ignored paths.
fn discover(roots: &[Utf8PathBuf], config: &Config, ignore_set: &GlobSet) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(display_path(root).to_path_buf());
            continue;
        }
        if !root.is_dir() {
            return Err(OrchestratorError::MissingPath(root.clone()).into());
        }
        files.extend(
            WalkDir::new(root)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
                .filter(|p| config.matches(p.file_name().unwrap_or("")))
                .filter(|p| {
                    let relative = p.strip_prefix(root).unwrap_or(p);
                    !ignore_set.is_match(relative.as_str())
                })
                .map(|p| display_path(&p).to_path_buf()),
        );
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Drops a leading `./` so reports show plain relative paths.
fn display_path(path: &Utf8Path) -> &Utf8Path {
    path.strip_prefix(".").unwrap_or(path)
}

fn process_file(
    path: &Utf8Path,
    language: Language,
    mode: Mode,
    formatter: &Formatter,
    want_map: bool,
) -> FileOutput {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            return FileOutput {
                path: path.to_path_buf(),
                text: String::new(),
                json: Vec::new(),
                error_count: 0,
                formatted: None,
                changed: false,
                source_map: None,
                io_failed: true,
            };
        }
    };
    debug!(%path, ?language, ?mode, "formatting");

    match format_source(path, &source, language, formatter, want_map) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Failed to parse {}: {}", path, e);
            FileOutput {
                path: path.to_path_buf(),
                text: String::new(),
                json: Vec::new(),
                error_count: 0,
                formatted: None,
                changed: false,
                source_map: None,
                io_failed: true,
            }
        }
    }
}

/// Parses, reports and renders one document.
fn format_source(
    path: &Utf8Path,
    source: &str,
    language: Language,
    formatter: &Formatter,
    want_map: bool,
) -> Result<FileOutput> {
    let ast = Ast::parse(source, language).into_diagnostic()?;

    let text = formatter.format(&ast, path, source);
    let json = Formatter::format_json_diagnostics(&ast, path, source);

    let mut builder = SourceMapBuilder::new();
    let formatted = if want_map {
        render_with_source_map(&ast, source, &mut builder)
    } else {
        render(&ast, source)
    };
    let formatted = formatted.ok();
    let source_map = match &formatted {
        Some(_) if want_map => {
            let document = SourceMapDocument::new(path.as_str(), path.as_str(), source, &builder);
            Some(document.to_json().into_diagnostic()?)
        }
        _ => None,
    };

    Ok(FileOutput {
        path: path.to_path_buf(),
        text,
        json,
        error_count: ast.errors.len(),
        changed: formatted.as_deref().is_some_and(|f| f != source),
        formatted,
        source_map,
        io_failed: false,
    })
}
