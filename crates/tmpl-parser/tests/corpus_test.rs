//! Corpus tests that parse all fixture files to ensure no panics, that
//! valid fixtures produce no errors and that invalid ones produce some.

use std::fs;
use std::path::{Path, PathBuf};
use tmpl_parser::{Ast, Language};

fn get_fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("test-fixtures")
}

fn collect_fixtures(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            } else if path.is_dir() {
                files.extend(collect_fixtures(&path));
            }
        }
    }
    files.sort();
    files
}

fn language_for(path: &Path) -> Language {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => Language::Html,
        Some("xml" | "svg") => Language::Xml,
        _ => Language::Template,
    }
}

fn check_invariants(ast: &Ast, name: &str) {
    assert_eq!(ast.root().parent_idx, 0, "{name}: root parent");
    for (idx, node) in ast.nodes.iter().enumerate().skip(1) {
        if node.first_child_idx != 0 {
            assert_eq!(
                ast.node(node.first_child_idx).parent_idx,
                idx as u32,
                "{name}: child of node {idx}"
            );
        }
        if node.next_idx != 0 {
            assert_eq!(
                ast.node(node.next_idx).parent_idx,
                node.parent_idx,
                "{name}: sibling of node {idx}"
            );
        }
        if node.kind.is_void() {
            assert!(!node.is_closed(), "{name}: void node {idx} is closed");
        }
    }
}

#[test]
fn test_parse_all_valid_fixtures() {
    let files = collect_fixtures(&get_fixtures_dir().join("valid"));
    assert!(!files.is_empty(), "No valid fixtures found");

    for path in &files {
        let source = fs::read_to_string(path).expect("Failed to read file");
        let name = path.file_name().unwrap().to_string_lossy();

        let ast = Ast::parse(&source, language_for(path)).unwrap();
        assert!(
            ast.errors.is_empty(),
            "Valid fixture {} should have no errors, but got: {:?}",
            name,
            ast.errors
        );
        assert!(ast.nodes.len() > 1, "{name} should produce some nodes");
        check_invariants(&ast, &name);
    }
}

#[test]
fn test_parse_all_invalid_fixtures() {
    let files = collect_fixtures(&get_fixtures_dir().join("invalid"));
    assert!(!files.is_empty(), "No invalid fixtures found");

    for path in &files {
        let source = fs::read_to_string(path).expect("Failed to read file");
        let name = path.file_name().unwrap().to_string_lossy();

        let ast = Ast::parse(&source, language_for(path)).unwrap();
        assert!(
            !ast.errors.is_empty(),
            "Invalid fixture {name} should have errors"
        );
        check_invariants(&ast, &name);
        eprintln!("{name}: {} error(s)", ast.errors.len());
    }
}
