//! Hygiene: enforces coding standards at test time
//!
//! These tests scan the engine's production sources for patterns the board
//! core must not contain. Each has a budget of zero: panicking calls, silent
//! error discards, and anything that would give the engine its own I/O or
//! clock (the host supplies time and performs every side effect).
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

/// Collect production `.rs` files from `canvas/src/`, excluding `_test.rs` files.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Lines containing `pattern`, as `path:line` strings.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| {
            file.content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(|(n, _)| format!("  {}:{}", file.path, n + 1))
        })
        .collect()
}

macro_rules! budget {
    ($name:ident, $pattern:expr, $max:expr) => {
        #[test]
        fn $name() {
            let found = hits(&source_files(), $pattern);
            assert!(
                found.len() <= $max,
                "`{}` budget exceeded: found {}, max {}.\n{}",
                $pattern,
                found.len(),
                $max,
                found.join("\n")
            );
        }
    };
}

// Panics crash the host's event loop.
budget!(unwrap_budget, ".unwrap()", 0);
budget!(expect_budget, ".expect(", 0);
budget!(panic_budget, "panic!(", 0);
budget!(unreachable_budget, "unreachable!(", 0);
budget!(todo_budget, "todo!(", 0);
budget!(unimplemented_budget, "unimplemented!(", 0);

// Silent loss: discards errors without inspecting.
budget!(silent_discard_budget, "let _ =", 0);
budget!(dot_ok_budget, ".ok()", 0);

// Style / structure.
budget!(allow_dead_code_budget, "#[allow(dead_code)]", 0);

// The engine is pure: no filesystem, no wall clock, no printing.
budget!(fs_budget, "std::fs", 0);
budget!(clock_budget, "std::time", 0);
budget!(print_budget, "println!(", 0);

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("engine.rs")));
    assert!(files.iter().all(|f| !f.path.ends_with("_test.rs")));
    assert!(files.iter().all(|f| !f.content.is_empty()));
}
