//! End-to-end tests that run the built binary in a scratch directory.

use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn tmplfmt(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tmplfmt"))
        .args(args)
        .current_dir(dir)
        .env_remove("TMPLFMT_LOG")
        .output()
        .expect("failed to run tmplfmt")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn scratch(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

fn read(dir: &TempDir, name: &str) -> String {
    fs::read_to_string(dir.path().join(name)).unwrap()
}

#[test]
fn test_prints_single_file() {
    let dir = scratch(&[("a.html", "<ul>\n    <li>one</li>\n</ul>")]);
    let output = tmplfmt(dir.path(), &["a.html"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "<ul>\n\t<li>one</li>\n</ul>\n");
    assert_eq!(read(&dir, "a.html"), "<ul>\n    <li>one</li>\n</ul>");
}

#[test]
fn test_check_reports_unformatted_files() {
    let dir = scratch(&[
        ("good.html", "<p>fine</p>\n"),
        ("bad.html", "<div>\n  <p>off</p>\n</div>"),
    ]);
    let output = tmplfmt(dir.path(), &["--check"]);
    assert!(!output.status.success());

    let text = stdout(&output);
    assert!(text.contains("bad.html: not formatted"));
    assert!(!text.contains("good.html"));
    assert!(text.contains("tmplfmt: 2 files with 0 errors, 1 not formatted"));
    assert_eq!(read(&dir, "bad.html"), "<div>\n  <p>off</p>\n</div>");

    let output = tmplfmt(dir.path(), &["--check", "good.html"]);
    assert!(output.status.success());
}

#[test]
fn test_write_rewrites_matching_files() {
    let dir = scratch(&[
        ("a.tmpl", "<ul>\n{for (xs)|x|(<li>{x}</li>)}\n</ul>"),
        ("sub/b.html", "<div>\n<p>b</p>\n</div>"),
        ("vendor/c.html", "<div>\n<p>c</p>\n</div>"),
        ("notes.txt", "<div>\n<p>d</p>\n</div>"),
    ]);
    let output = tmplfmt(dir.path(), &["--write", "--ignore", "vendor/**"]);
    assert!(output.status.success(), "{}", stdout(&output));

    assert_eq!(read(&dir, "a.tmpl"), "<ul>\n\t{for (xs) |x| (<li>{x}</li>)}\n</ul>\n");
    assert_eq!(read(&dir, "sub/b.html"), "<div>\n\t<p>b</p>\n</div>\n");
    assert_eq!(read(&dir, "vendor/c.html"), "<div>\n<p>c</p>\n</div>");
    assert_eq!(read(&dir, "notes.txt"), "<div>\n<p>d</p>\n</div>");
}

#[test]
fn test_syntax_errors_fail_and_leave_file_alone() {
    let dir = scratch(&[("broken.html", "<div><span></div>\n")]);
    let output = tmplfmt(dir.path(), &["--write"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("broken.html:1:7: "));
    assert_eq!(read(&dir, "broken.html"), "<div><span></div>\n");
}

#[test]
fn test_json_output() {
    let dir = scratch(&[("broken.html", "<div><span></div>\n")]);
    let output = tmplfmt(dir.path(), &["--check", "--output", "json"]);
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["diagnostics"][0]["code"], "missing_end_tag");
    assert_eq!(json["diagnostics"][0]["filename"], "broken.html");
    assert_eq!(json["diagnostics"][0]["start"]["line"], 1);
    assert_eq!(json["summary"]["error_count"], 1);
}

#[test]
fn test_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_tmplfmt"))
        .args(["--stdin", "--language", "html"])
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"<p>\n  hi\n</p>")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "<p>\n\thi\n</p>\n");
}

#[test]
fn test_config_file() {
    let dir = scratch(&[
        (
            "tmplfmt.json",
            r#"{ "extensions": [".page"], "languages": { "page": "html" } }"#,
        ),
        ("x.page", "<div>\n<p>a</p>\n</div>"),
        ("y.html", "<div>\n<p>a</p>\n</div>"),
    ]);
    let output = tmplfmt(dir.path(), &["--write"]);
    assert!(output.status.success());
    assert_eq!(read(&dir, "x.page"), "<div>\n\t<p>a</p>\n</div>\n");
    assert_eq!(read(&dir, "y.html"), "<div>\n<p>a</p>\n</div>");
}

#[test]
fn test_source_map() {
    let dir = scratch(&[("a.html", "<div>\n  <p>a</p>\n</div>")]);
    let output = tmplfmt(dir.path(), &["a.html", "--source-map", "a.map"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "<div>\n\t<p>a</p>\n</div>\n");

    let map: serde_json::Value = serde_json::from_str(&read(&dir, "a.map")).unwrap();
    assert_eq!(map["version"], 3);
    assert_eq!(map["sources"][0], "a.html");
    assert!(!map["mappings"].as_str().unwrap().is_empty());
}

#[test]
fn test_source_map_needs_single_input() {
    let dir = scratch(&[("a.html", "<p>a</p>\n"), ("b.html", "<p>b</p>\n")]);
    let output = tmplfmt(dir.path(), &["--source-map", "out.map"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("exactly one input"));
    assert!(!dir.path().join("out.map").exists());
}
