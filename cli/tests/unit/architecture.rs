//! Structural tests for layer boundaries.
//!
//! These scan the source tree so a stray import fails the build's tests
//! rather than a code review.

use std::path::{Path, PathBuf};

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

fn rel(path: &Path) -> String {
    path.strip_prefix(env!("CARGO_MANIFEST_DIR"))
        .unwrap_or(path)
        .display()
        .to_string()
        .replace('\\', "/")
}

/// Track brace depth and report whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    fn process_line(&mut self, line: &str) -> bool {
        if line.trim().contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

/// Non-comment lines of every file under `dir` outside `#[cfg(test)]` blocks,
/// as `(file, line number, line)`.
fn production_lines(dir: &Path) -> Vec<(String, usize, String)> {
    let mut out = Vec::new();
    for file in collect_rs_files(dir) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        // test_support.rs is compiled only under cfg(test) via its parent module.
        if file.ends_with("test_support.rs") {
            continue;
        }
        let name = rel(&file);
        let mut tracker = CfgTestTracker::new();
        for (i, line) in content.lines().enumerate() {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            if in_test || trimmed.starts_with("//") || trimmed.starts_with("/*") {
                continue;
            }
            out.push((name.clone(), i + 1, line.to_string()));
        }
    }
    out
}

/// Lines under `dir` containing any of `needles`.
fn find_violations(dir: &Path, needles: &[&str]) -> Vec<String> {
    production_lines(dir)
        .into_iter()
        .filter(|(_, _, line)| needles.iter().any(|n| line.contains(n)))
        .map(|(file, lineno, line)| format!("{file}:{lineno}: {}", line.trim()))
        .collect()
}

// ── Layering ─────────────────────────────────────────────────────────────────

#[test]
fn domain_is_free_of_io_and_outer_layers() {
    let violations = find_violations(
        &src_dir().join("domain"),
        &[
            "tokio::",
            "std::fs",
            "std::process",
            "std::net",
            "reqwest",
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must stay pure:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_does_not_reach_into_adapters() {
    let violations = find_violations(
        &src_dir().join("application"),
        &["crate::infra", "crate::commands", "crate::output", "reqwest"],
    );
    assert!(
        violations.is_empty(),
        "application/ may only use domain/ and its own ports:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = find_violations(
        &src_dir().join("infra"),
        &["crate::commands", "crate::output"],
    );
    assert!(
        violations.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let violations = find_violations(&src_dir().join("infra"), &["println!", "eprintln!"]);
    assert!(
        violations.is_empty(),
        "infra/ must log through tracing, not print:\n{}",
        violations.join("\n")
    );
}

#[test]
fn http_client_lives_only_in_the_api_adapter() {
    let violations: Vec<String> = find_violations(&src_dir(), &["reqwest::"])
        .into_iter()
        .filter(|v| !v.starts_with("src/infra/api.rs"))
        .collect();
    assert!(
        violations.is_empty(),
        "reqwest must only be used by infra/api.rs:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_tokio_command_runner_new_outside_infra() {
    let violations: Vec<String> = find_violations(&src_dir(), &["TokioCommandRunner::new"])
        .into_iter()
        .filter(|v| !v.starts_with("src/infra/") && !v.starts_with("src/app.rs"))
        .collect();
    assert!(
        violations.is_empty(),
        "processes are spawned through infra/ adapters built by AppContext:\n{}",
        violations.join("\n")
    );
}

// ── Command handlers ─────────────────────────────────────────────────────────

#[test]
fn no_inline_json_branching_in_commands() {
    let violations: Vec<String> = production_lines(&src_dir().join("commands"))
        .into_iter()
        .filter(|(_, _, line)| {
            let trimmed = line.trim();
            line.contains("json: bool")
                || trimmed.starts_with("if json")
                || trimmed.starts_with("if !json")
                || line.contains("is_json()")
        })
        .map(|(file, lineno, line)| format!("{file}:{lineno}: {}", line.trim()))
        .collect();
    assert!(
        violations.is_empty(),
        "commands/ must render through app.renderer():\n{}",
        violations.join("\n")
    );
}

#[test]
fn command_handlers_accept_app_context() {
    let mut violations = Vec::new();
    for file in collect_rs_files(&src_dir().join("commands")) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        if content.contains("pub async fn run(") && !content.contains("app: &AppContext") {
            violations.push(rel(&file));
        }
    }
    assert!(
        violations.is_empty(),
        "command handlers must take &AppContext first:\n{}",
        violations.join("\n")
    );
}

#[test]
fn commands_use_standardized_confirmation() {
    let violations = find_violations(
        &src_dir().join("commands"),
        &["stdin().lock()", "Confirm::new()", "read_line("],
    );
    assert!(
        violations.is_empty(),
        "commands/ must prompt through app.confirm():\n{}",
        violations.join("\n")
    );
}

#[test]
fn destructive_commands_check_protection_before_prompting() {
    for name in ["delete.rs", "teardown.rs"] {
        let path = src_dir().join("commands").join(name);
        let content = std::fs::read_to_string(&path).expect("command file");
        let guard = content.find(".guard(").expect("protected-id guard");
        let prompt = content.find("app.confirm(").expect("confirmation prompt");
        assert!(
            guard < prompt,
            "{name}: protected ids must be refused before asking for confirmation"
        );
    }
}
