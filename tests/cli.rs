//! Command-line front end against the built binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const CALCULATOR: &str = "class Calculator {\n  add(a, b) {\n    return a + b;\n  }\n}\n";

fn treepath(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_treepath"))
        .args(args)
        .env_remove("TREEPATH_PACKS")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("calc.js");
    fs::write(&file, CALCULATOR).unwrap();
    (dir, file)
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn help_lists_subcommands() {
    let output = treepath(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for command in ["paths", "locate", "find", "update", "append", "insert-before", "delete", "lines", "languages"] {
        assert!(text.contains(command), "missing {command}");
    }
}

#[test]
fn paths_json_report() {
    let (dir, file) = workspace();
    fs::write(dir.path().join("notes.txt"), "not code").unwrap();

    let output = treepath(&["paths", "--json", arg(dir.path())]);
    assert!(output.status.success(), "{}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let reports = value.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["file"], arg(&file));
    assert_eq!(reports[0]["language"], "javascript");
    assert_eq!(reports[0]["totalPaths"], 2);
    assert_eq!(
        reports[0]["paths"],
        serde_json::json!(["Calculator", "Calculator.add"])
    );
}

#[test]
fn locate_and_find() {
    let (_dir, file) = workspace();

    let output = treepath(&["locate", "--json", arg(&file), "add"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["totalMatches"], 1);
    assert_eq!(value["matches"][0]["line"], 2);
    assert_eq!(value["matches"][0]["column"], 3);

    let output = treepath(&["find", "--json", arg(&file), "Calculator.add"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["matches"][0]["description"], "add method in class Calculator");

    let output = treepath(&["find", arg(&file), "Calculator.ad"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Did you mean: Calculator.add"));
}

#[test]
fn append_writes_file() {
    let (_dir, file) = workspace();

    let output = treepath(&[
        "append",
        arg(&file),
        "Calculator",
        "subtract(a, b) {\n  return a - b;\n}",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "class Calculator {\n  add(a, b) {\n    return a + b;\n  }\n  subtract(a, b) {\n    return a - b;\n  }\n}\n"
    );
}

#[test]
fn dry_run_leaves_file_alone() {
    let (_dir, file) = workspace();

    let output = treepath(&["delete", arg(&file), "Calculator.add", "--dry-run", "--diff"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("dry run"));
    assert_eq!(fs::read_to_string(&file).unwrap(), CALCULATOR);
}

#[test]
fn edits_that_break_parsing_need_force() {
    let (_dir, file) = workspace();

    let output = treepath(&["update", arg(&file), "Calculator.add", "add(a, b) {"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--force"));
    assert_eq!(fs::read_to_string(&file).unwrap(), CALCULATOR);

    let output = treepath(&["update", arg(&file), "Calculator.add", "add(a, b) {", "--force"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_ne!(fs::read_to_string(&file).unwrap(), CALCULATOR);
}

#[test]
fn edit_failures_report_json() {
    let (_dir, file) = workspace();

    let output = treepath(&["update", "--json", arg(&file), "Nope", "x"]);
    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["action"], "update");
    assert!(value["message"].as_str().unwrap().starts_with("node not found: Nope"));
}

#[test]
fn line_edits() {
    let (_dir, file) = workspace();

    let output = treepath(&["lines", arg(&file), "add", "0", "// math"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(fs::read_to_string(&file).unwrap().starts_with("// math\nclass Calculator {"));

    let output = treepath(&["lines", arg(&file), "remove", "1", "1"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(fs::read_to_string(&file).unwrap(), CALCULATOR);
}

#[test]
fn language_override_and_pack_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("calc.txt");
    fs::write(&file, CALCULATOR).unwrap();

    let output = treepath(&["paths", arg(&file)]);
    assert!(!output.status.success() || stdout(&output).trim().is_empty());

    let output = treepath(&["find", "--language", "javascript", arg(&file), "Calculator"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let packs = dir.path().join("packs.toml");
    fs::write(
        &packs,
        "[[packs]]\nlanguage = \"plainjs\"\nextends = \"javascript\"\nextensions = [\"txt\"]\n",
    )
    .unwrap();
    let output = treepath(&["languages", "--json", "--packs", arg(&packs)]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("\"plainjs\""));

    let output = treepath(&["find", "--packs", arg(&packs), arg(&file), "Calculator.add"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("add method in class Calculator"));
}
