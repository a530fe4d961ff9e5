//! Integration tests for Centipede
//!
//! These tests drive the library crates end to end and run the compiled
//! binary against on-disk fixtures.

use centipede_core::{ArtifactKind, ArtifactSummary, MemoryLogger, NullLogger, normalize_path};
use centipede_indexer::{IndexBuilder, IndexConfig, build_index};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const CSHARP_PROJECT: &str = "FAE04EC0-301F-11D3-BF4B-00C04F79EFBC";

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn sln(projects: &[&str]) -> String {
    let mut text = String::from("Microsoft Visual Studio Solution File, Format Version 12.00\n");
    for (i, project) in projects.iter().enumerate() {
        text.push_str(&format!(
            "Project(\"{{{}}}\") = \"P{}\", \"{}\", \"{{00000000-0000-0000-0000-{:012}}}\"\nEndProject\n",
            CSHARP_PROJECT, i, project, i
        ));
    }
    text
}

fn csproj(compiled: &[&str]) -> String {
    let items: String = compiled
        .iter()
        .map(|file| format!("<Compile Include=\"{}\" />", file))
        .collect();
    format!("<Project><ItemGroup>{}</ItemGroup></Project>", items)
}

/// A mid-sized tree: two products sharing a core library, a test
/// solution, a broken project and a hidden directory.
fn monorepo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "Product.sln", &sln(&["src\\Core\\Core.csproj", "src\\Api\\Api.csproj"]));
    write(root, "Tools.sln", &sln(&["src\\Core\\Core.csproj", "tools\\Gen\\Gen.csproj"]));
    write(root, "tests/Tests.sln", &sln(&["Core.Tests\\Core.Tests.csproj"]));

    write(root, "src/Core/Core.csproj", &csproj(&["Model.cs", "Shared\\Helpers.cs"]));
    write(root, "src/Core/Model.cs", "");
    write(root, "src/Core/Shared/Helpers.cs", "");
    write(root, "src/Api/Api.csproj", &csproj(&["Program.cs", "..\\Core\\Model.cs"]));
    write(root, "src/Api/Program.cs", "");
    write(root, "tools/Gen/Gen.csproj", "<Project><ItemGroup>");
    write(root, "tools/Gen/Gen.cs", "");
    write(
        root,
        "tests/Core.Tests/Core.Tests.csproj",
        &csproj(&["ModelTests.cs"]),
    );
    write(root, "tests/Core.Tests/ModelTests.cs", "");
    write(root, ".vs/Cache.sln", &sln(&["..\\src\\Core\\Core.csproj"]));

    dir
}

fn relative(root: &Path, paths: Vec<std::path::PathBuf>) -> Vec<String> {
    let root = normalize_path(root);
    paths
        .iter()
        .map(|p| p.strip_prefix(&root).unwrap_or(p).to_string_lossy().replace('\\', "/"))
        .collect()
}

#[test]
fn test_monorepo_queries() {
    let repo = monorepo();
    let root = repo.path();
    let logger = MemoryLogger::new();
    let index = build_index(root, &logger).unwrap();

    assert_eq!(
        relative(root, index.resolve_solutions(&root.join("src/Core/Model.cs"))),
        vec!["Product.sln", "Tools.sln"]
    );
    assert_eq!(
        relative(root, index.resolve_solutions(&root.join("src/Api/Program.cs"))),
        vec!["Product.sln"]
    );
    assert_eq!(
        relative(
            root,
            index.resolve_solutions(&root.join("tests/Core.Tests/ModelTests.cs"))
        ),
        vec!["tests/Tests.sln"]
    );
    // Gen.csproj is unparsable: its file is unknown, the project still
    // belongs to Tools.sln.
    assert!(index.resolve_solutions(&root.join("tools/Gen/Gen.cs")).is_empty());
    assert_eq!(
        relative(root, index.resolve_solutions(&root.join("tools/Gen/Gen.csproj"))),
        vec!["Tools.sln"]
    );

    assert_eq!(logger.len(), 1);
    assert_eq!(index.stats().failed_projects, 1);
    assert_eq!(index.stats().solutions, 3, ".vs is not scanned");
}

#[test]
fn test_monorepo_stats_snapshot() {
    let repo = monorepo();
    let index = build_index(repo.path(), &NullLogger).unwrap();

    let mut stats = index.stats().clone();
    stats.elapsed_ms = 0;
    insta::assert_json_snapshot!(stats, @r#"
    {
      "solutions": 3,
      "projects": 4,
      "failed_solutions": 0,
      "failed_projects": 1,
      "failed_dirs": 0,
      "skipped_project_references": 0,
      "nodes": 11,
      "back_references": 10,
      "elapsed_ms": 0
    }
    "#);
}

#[test]
fn test_batch_union_across_files() {
    let repo = monorepo();
    let root = repo.path();
    let index = build_index(root, &NullLogger).unwrap();

    let files = [
        root.join("src/Api/Program.cs"),
        root.join("tests/Core.Tests/ModelTests.cs"),
        root.join("src/Core/Shared/Helpers.cs"),
    ];
    assert_eq!(
        relative(root, index.resolve_solutions_for_all(&files)),
        vec!["Product.sln", "Tools.sln", "tests/Tests.sln"]
    );
}

#[test]
fn test_config_file_excludes_directories() {
    let repo = monorepo();
    let root = repo.path();
    write(root, "centipede.toml", "excluded_dirs = [\"tools\"]\nthreads = 2\n");

    let config = IndexConfig::discover(root).unwrap();
    let logger = MemoryLogger::new();
    let index = IndexBuilder::new()
        .with_config(config)
        .build(root, &logger)
        .unwrap();

    assert!(logger.is_empty());
    assert_eq!(index.stats().projects, 3);
    assert!(index.graph().lookup(&root.join("tools/Gen/Gen.csproj")).is_none());
    assert_eq!(index.stats().skipped_project_references, 1);
}

#[test]
fn test_cli_batch_mode() {
    let repo = monorepo();
    let root = repo.path();

    let output = Command::new(env!("CARGO_BIN_EXE_centipede"))
        .arg(root)
        .arg(root.join("src/Api/Program.cs"))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Processing files under"));
    assert!(stderr.contains("Done"));

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Solutions:");
    assert!(lines[1].ends_with("Product.sln"));
}

#[test]
fn test_cli_json_output() {
    let repo = monorepo();
    let root = repo.path();

    let output = Command::new(env!("CARGO_BIN_EXE_centipede"))
        .arg(root)
        .arg(root.join("src/Core/Model.cs"))
        .arg("--json")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let solutions: Vec<ArtifactSummary> = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = solutions.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Product.sln", "Tools.sln"]);
    assert!(solutions.iter().all(|s| s.kind == ArtifactKind::Solution));
    assert!(solutions[0].path.starts_with(normalize_path(root)));
}

#[test]
fn test_cli_missing_root_fails() {
    let dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_centipede"))
        .arg(dir.path().join("missing"))
        .arg("Anything.cs")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("path not found"));
}

#[test]
fn test_cli_interactive_mode() {
    use std::io::Write;
    use std::process::Stdio;

    let repo = monorepo();
    let root = repo.path();

    let mut child = Command::new(env!("CARGO_BIN_EXE_centipede"))
        .arg(root)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn centipede");

    {
        let stdin = child.stdin.as_mut().unwrap();
        writeln!(stdin, "{}", root.join("src/Core/Shared/Helpers.cs").display()).unwrap();
        writeln!(stdin, "?helpers").unwrap();
        writeln!(stdin, "exit").unwrap();
    }

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("centipede> "));
    assert!(stdout.contains("This file is in the following solutions:"));
    assert!(stdout.contains("Product.sln"));
    assert!(stdout.contains("Helpers.cs"));
}
