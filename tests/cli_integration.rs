//! CLI integration tests for Meshbuild.
//!
//! These tests drive the binary end to end. Build targets are exercised in
//! dry-run mode so no C toolchain output is produced; only the clean target
//! touches the filesystem.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the meshbuild binary command.
fn meshbuild() -> Command {
    Command::cargo_bin("meshbuild").unwrap()
}

/// Create a temporary working directory.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Collect the `[dry-run]` lines from captured stdout.
fn dry_run_lines(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|l| l.starts_with("[dry-run]"))
        .map(String::from)
        .collect()
}

// ============================================================================
// dry-run builds
// ============================================================================

#[test]
fn test_dry_run_client_enumerates_compiles_then_link() {
    let tmp = temp_dir();

    let output = meshbuild()
        .args(["client", "--dry-run"])
        .current_dir(tmp.path())
        .output()
        .unwrap();

    assert!(output.status.success());

    let lines = dry_run_lines(&output.stdout);
    // 4 first-party objects + 6 hash-library objects + 1 link.
    assert_eq!(lines.len(), 11);

    for line in &lines[..10] {
        assert!(line.contains(" -c "), "expected compile command: {line}");
    }
    assert!(lines[0].contains("src/client/client.c"));
    assert!(lines[10].contains(" -o client "));

    // Every object shows up in the link command.
    for object in [
        "client.o",
        "mongo_ops.o",
        "utils.o",
        "aes_gcm.o",
        "blake3.o",
        "blake3_dispatch.o",
        "blake3_portable.o",
        "blake3_sse2.o",
        "blake3_sse41.o",
        "blake3_avx2.o",
    ] {
        assert!(lines[10].contains(object), "link missing {object}");
    }
}

#[test]
fn test_dry_run_isolates_extension_flags() {
    let tmp = temp_dir();

    let output = meshbuild()
        .args(["client", "-n"])
        .current_dir(tmp.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let lines = dry_run_lines(&output.stdout);

    let with_define: Vec<_> = lines
        .iter()
        .filter(|l| l.contains("-DBLAKE3_NO_AVX512"))
        .collect();
    assert_eq!(with_define.len(), 1);
    assert!(with_define[0].contains("blake3_dispatch.c"));

    let with_sse2: Vec<_> = lines.iter().filter(|l| l.contains("-msse2")).collect();
    assert_eq!(with_sse2.len(), 1);
    assert!(with_sse2[0].contains("blake3_sse2.c"));

    let with_avx2: Vec<_> = lines.iter().filter(|l| l.contains("-mavx2")).collect();
    assert_eq!(with_avx2.len(), 1);
    assert!(with_avx2[0].contains("blake3_avx2.c"));
}

#[test]
fn test_dry_run_creates_no_files() {
    let tmp = temp_dir();

    for target in ["daemon", "client", "server", "mongo", "tests", "all"] {
        meshbuild()
            .args([target, "--dry-run"])
            .current_dir(tmp.path())
            .assert()
            .success();
    }

    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn test_dry_run_daemon_is_single_invocation() {
    let tmp = temp_dir();

    let output = meshbuild()
        .args(["daemon", "--dry-run"])
        .current_dir(tmp.path())
        .output()
        .unwrap();

    assert!(output.status.success());

    let lines = dry_run_lines(&output.stdout);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("-o exchange-daemon"));
    assert!(lines[0].contains("src/main.c"));
}

#[test]
fn test_dry_run_all_composes_targets_in_order() {
    let tmp = temp_dir();

    let output = meshbuild()
        .args(["all", "--dry-run"])
        .current_dir(tmp.path())
        .output()
        .unwrap();

    assert!(output.status.success());

    // daemon (1) + client (11) + server (11) + mongo (1).
    let lines = dry_run_lines(&output.stdout);
    assert_eq!(lines.len(), 24);
    assert!(lines[0].contains("exchange-daemon"));
    assert!(lines[23].contains("mongo_client"));
}

#[test]
fn test_dry_run_omitted_target_builds_all() {
    let tmp = temp_dir();

    let output = meshbuild()
        .arg("--dry-run")
        .current_dir(tmp.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(dry_run_lines(&output.stdout).len(), 24);
}

#[test]
fn test_dry_run_tests_target_invokes_external_runner() {
    let tmp = temp_dir();

    meshbuild()
        .args(["tests", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run] python3 tests.py"));
}

// ============================================================================
// clean
// ============================================================================

#[test]
fn test_clean_removes_artifacts_and_is_idempotent() {
    let tmp = temp_dir();
    fs::write(tmp.path().join("client.o"), "object").unwrap();
    fs::write(tmp.path().join("blake3_avx2.o"), "object").unwrap();
    fs::write(tmp.path().join("exchange-daemon"), "binary").unwrap();
    fs::write(tmp.path().join("unrelated.txt"), "keep me").unwrap();

    meshbuild()
        .arg("clean")
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(!tmp.path().join("client.o").exists());
    assert!(!tmp.path().join("blake3_avx2.o").exists());
    assert!(!tmp.path().join("exchange-daemon").exists());
    assert!(tmp.path().join("unrelated.txt").exists());

    // Nothing left to remove; still succeeds.
    meshbuild()
        .arg("clean")
        .current_dir(tmp.path())
        .assert()
        .success();
}

#[test]
fn test_clean_dry_run_reports_without_removing() {
    let tmp = temp_dir();
    fs::write(tmp.path().join("server.o"), "object").unwrap();

    let output = meshbuild()
        .args(["clean", "--dry-run"])
        .current_dir(tmp.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(tmp.path().join("server.o").exists());

    let lines = dry_run_lines(&output.stdout);
    assert!(lines.iter().all(|l| l.contains("rm -f")));
    assert!(lines.iter().any(|l| l.contains("blake3_avx512.o")));
}

// ============================================================================
// plan emission
// ============================================================================

#[test]
fn test_plan_emits_json_without_building() {
    let tmp = temp_dir();

    let output = meshbuild()
        .args(["client", "--plan"])
        .current_dir(tmp.path())
        .output()
        .unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim_start().starts_with('{'));
    assert!(stdout.contains("blake3_dispatch.o"));

    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

// ============================================================================
// error paths
// ============================================================================

#[test]
fn test_unrecognized_target_exits_2() {
    let tmp = temp_dir();

    meshbuild()
        .arg("bogus")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("bogus"));
}

#[test]
fn test_missing_compiler_is_fatal_before_any_step() {
    let tmp = temp_dir();

    let output = meshbuild()
        .args(["client", "--dry-run"])
        .current_dir(tmp.path())
        .env("PATH", "")
        .env_remove("CC")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no C compiler"));
    assert!(dry_run_lines(&output.stdout).is_empty());
}
