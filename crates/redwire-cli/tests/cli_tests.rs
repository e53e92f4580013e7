//! End-to-end tests that run the `redwire` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn redwire(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_redwire"))
        .args(args)
        .env_remove("REDWIRE_STRICT")
        .env_remove("REDWIRE_LIBRARY")
        .env_remove("REDWIRE_CONFIG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write(dir: &Path, name: &str, source: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_version() {
    let output = redwire(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cells_lists_stdlib() {
    let output = redwire(&["cells"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for cell in ["not", "and", "or", "xor", "if", "add2"] {
        assert!(text.contains(cell), "missing {cell}");
    }
}

#[test]
fn test_compile_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "half.rw", "a b\ns = xor a b\nc = and a b\nout = cat s c\n2:out\n");
    let out = dir.path().join("half.json");

    let output = redwire(&["compile", "-i", &input, "-o", out.to_str().unwrap(), "--verify"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("Verified on 4 input vectors"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["output_groups"][0]["name"], "out");
    assert_eq!(json["output_groups"][0]["width"], 2);
}

#[test]
fn test_simulate_adder() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "sum.rw", "2:a 2:b\ns = add2 a b\n2:s\n");

    let output = redwire(&["simulate", "-i", &input, "--inputs", "10_10"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("1010 -> 01"));
}

#[test]
fn test_simulate_probe() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "inv.rw", "a\nb = not a\nc = not b\nc\n");

    let output = redwire(&["simulate", "-i", &input, "--inputs", "1", "--no-trim", "-p", "b"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("b: 0"));
}

#[test]
fn test_strict_violation_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "bad.rw", "a b c\nx = and a b c\nx\n");

    let output = redwire(&["compile", "-i", &input]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Strict check failed at line 2"));

    let output = redwire(&["compile", "-i", &input, "--lax"]);
    assert!(output.status.success(), "{}", stderr(&output));
}

#[test]
fn test_library_cell_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let lib = dir.path().join("lib");
    fs::create_dir(&lib).unwrap();
    write(&lib, "maj.rw", "a b c\nx = and a b\ny = and b c\nz = and a c\nm = or x (or y z)\nm\n");
    let input = write(dir.path(), "top.rw", "p q r\nv = maj p q r\nv\n");

    let output = redwire(&["simulate", "-i", &input, "--inputs", "110", "-L", lib.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("110 -> 1"));

    let output = redwire(&["simulate", "-i", &input, "--inputs", "110"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Missing dependency 'maj'"));
}

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "redwire.yaml", "strict: false\n");
    let input = write(dir.path(), "bad.rw", "a b c\nx = and a b c\nx\n");

    let output = redwire(&["compile", "-i", &input, "--config", &config]);
    assert!(output.status.success(), "{}", stderr(&output));
}

#[test]
fn test_missing_file() {
    let output = redwire(&["compile", "-i", "/nonexistent/file.rw"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("File not found"));
}
