//! CLI integration tests for roster-cli.
//!
//! These run the actual binary and check outputs, exit status, and file
//! handling. Nothing here touches the network: the run command is only
//! exercised for its configuration validation.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a Command for the roster binary.
fn roster() -> Command {
    Command::cargo_bin("roster").unwrap()
}

/// Write a small solid-color PNG and return its path.
fn write_test_png(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let img = image::RgbImage::from_pixel(16, 16, image::Rgb([0u8, 0, 0]));
    img.save(&path).unwrap();
    path
}

/// Run `roster hash` on a file and return the hex signature it printed.
fn signature_of(file: &Path) -> String {
    let output = roster()
        .args(["hash", file.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

#[test]
fn help_lists_subcommands() {
    roster()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("hash"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn run_help_shows_dry_run() {
    roster()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn hash_prints_hex_signature() {
    let temp = TempDir::new().unwrap();
    let file = write_test_png(temp.path(), "black.png");

    roster()
        .args(["hash", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[0-9a-f]{16}\n$").unwrap());
}

#[test]
fn hash_emits_reference_entry() {
    let temp = TempDir::new().unwrap();
    let file = write_test_png(temp.path(), "black.png");

    roster()
        .args(["hash", file.to_str().unwrap(), "--name", "poseA"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name":"poseA""#))
        .stdout(predicate::str::contains(r#""hash":""#));
}

#[test]
fn hash_missing_file_fails() {
    roster()
        .args(["hash", "nonexistent.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn hash_rejects_non_image_data() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("not_an_image.png");
    fs::write(&file, b"plain text").unwrap();

    roster()
        .args(["hash", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to hash image"));
}

#[test]
fn check_reports_match_against_own_signature() {
    let temp = TempDir::new().unwrap();
    let file = write_test_png(temp.path(), "black.png");
    let hex = signature_of(&file);

    let references = temp.path().join("references.json");
    fs::write(
        &references,
        format!(r#"[{{ "name": "poseA", "hash": "{hex}" }}]"#),
    )
    .unwrap();

    roster()
        .env("ROSTER_REFERENCES", &references)
        .args(["check", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("poseA"));
}

#[test]
fn check_reports_no_match_for_distant_reference() {
    let temp = TempDir::new().unwrap();
    let file = write_test_png(temp.path(), "black.png");

    // A reference with every signature bit flipped sits at distance 64.
    let flipped: String = hex::encode(
        hex::decode(signature_of(&file))
            .unwrap()
            .iter()
            .map(|b| !b)
            .collect::<Vec<u8>>(),
    );

    let references = temp.path().join("references.json");
    fs::write(
        &references,
        format!(r#"[{{ "name": "poseA", "hash": "{flipped}" }}]"#),
    )
    .unwrap();

    roster()
        .env("ROSTER_REFERENCES", &references)
        .args(["check", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("no match"));
}

#[test]
fn check_fails_on_malformed_references() {
    let temp = TempDir::new().unwrap();
    let file = write_test_png(temp.path(), "black.png");

    let references = temp.path().join("references.json");
    fs::write(&references, "[]").unwrap();

    roster()
        .env("ROSTER_REFERENCES", &references)
        .args(["check", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load reference signatures"));
}

#[test]
fn run_requires_configuration() {
    roster()
        .env_remove("ROSTER_RPC_URL")
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ROSTER_RPC_URL"));
}
