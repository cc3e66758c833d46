/// Smoke tests to verify the binary runs without panicking
use std::process::{Command, Output};

fn asciifx(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_asciifx"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute asciifx")
}

#[test]
fn binary_shows_help() {
    let output = asciifx(&["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("asciifx"), "Help output should mention asciifx");
}

#[test]
fn binary_shows_version() {
    let output = asciifx(&["--version"]);

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("0.1.0"));
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = asciifx(&["nonexistent-command"]);

    // Should fail with error, not panic
    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn list_names_every_effect() {
    let output = asciifx(&["list"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["fire", "matrix", "warp", "nebula", "aurora", "water", "lightning", "stream", "glitch", "hack", "reactor", "city"] {
        assert!(stdout.contains(name), "list output is missing {}", name);
    }
}

#[test]
fn print_emits_one_full_frame() {
    let output = asciifx(&["print", "-e", "fire", "-c", "50", "-r", "12", "-f", "20", "-s", "1"]);
    assert!(
        output.status.success(),
        "print failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 12);
    assert!(lines.iter().all(|l| l.chars().count() == 50));
}

#[test]
fn print_is_deterministic_with_seed() {
    let args = ["print", "-e", "warp", "-c", "60", "-r", "20", "-f", "30", "-s", "42"];
    let first = asciifx(&args);
    let second = asciifx(&args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn unknown_effect_falls_back_to_matrix() {
    let output = asciifx(&["print", "-e", "batman", "-c", "30", "-r", "12", "-f", "5", "-s", "1"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Using matrix"));
}
