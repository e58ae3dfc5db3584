//! Integration tests for the shardmerge CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Test helper to get the CLI binary
fn shardmerge_cmd() -> Command {
    let mut cmd = Command::cargo_bin("shardmerge").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("SHARDMERGE_SYMLINK_PREFIX");
    cmd
}

/// Lay out two shards of one target under `testlogs`
fn create_testlogs(testlogs: &Path) {
    let shards = [
        (
            "pkg/lib_test/shard_1_of_2",
            "mode: set\npkg/lib.go:1.1,3.2 2 1\n",
            r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="pkg/lib_test">
    <testcase name="TestParse" classname="pkg/lib" time="0.5"/>
  </testsuite>
</testsuites>"#,
        ),
        (
            "pkg/lib_test/shard_2_of_2",
            "mode: set\npkg/lib.go:1.1,3.2 2 0\npkg/lib.go:5.1,5.10 1 1\n",
            r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="pkg/lib_test">
    <testcase name="TestFormat" classname="pkg/lib" time="0.25">
      <failure message="Failed">lib_test.go:20: mismatch</failure>
    </testcase>
  </testsuite>
</testsuites>"#,
        ),
    ];

    for (shard, coverage, report) in shards {
        let dir = testlogs.join(shard);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("coverage.dat"), coverage).unwrap();
        fs::write(dir.join("test.xml"), report).unwrap();
    }
}

#[test]
fn cli_help_command() {
    let mut cmd = shardmerge_cmd();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("collect"))
        .stdout(predicate::str::contains("print-default-config"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn cli_version_command() {
    let mut cmd = shardmerge_cmd();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn collect_help_lists_flags() {
    let mut cmd = shardmerge_cmd();
    cmd.args(["collect", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--output-coverage"))
        .stdout(predicate::str::contains("--output-junit"))
        .stdout(predicate::str::contains("--bazel-symlink-prefix"));
}

#[test]
fn collect_with_explicit_root() {
    let temp_dir = tempdir().unwrap();
    let testlogs = temp_dir.path().join("logs");
    create_testlogs(&testlogs);

    let mut cmd = shardmerge_cmd();
    cmd.current_dir(temp_dir.path())
        .args(["collect", "--root", testlogs.to_str().unwrap()]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("root: "))
        .stdout(predicate::str::contains("complete to collect bazel result."));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("coverage.dat")).unwrap(),
        "mode: set\npkg/lib.go:1.1,3.2 2 1\npkg/lib.go:5.1,5.10 1 1\n"
    );
    let junit = fs::read_to_string(temp_dir.path().join("bazel.xml")).unwrap();
    assert!(junit.contains(r#"tests="2" failures="1" time="750ms" name="bazel""#));
    assert!(junit.contains("lib_test.go:20: mismatch"));
}

#[cfg(unix)]
#[test]
fn collect_follows_symlink_prefix() {
    let temp_dir = tempdir().unwrap();
    let real = temp_dir.path().join("cache/execroot/testlogs");
    create_testlogs(&real);
    std::os::unix::fs::symlink(&real, temp_dir.path().join("build-testlogs")).unwrap();

    let mut cmd = shardmerge_cmd();
    cmd.current_dir(temp_dir.path()).args([
        "collect",
        "--bazel-symlink-prefix",
        "build-",
        "--output-coverage",
        "out/merged.dat",
        "--output-junit",
        "out/merged.xml",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cache/execroot/testlogs"));

    assert!(temp_dir.path().join("out/merged.dat").exists());
    assert!(temp_dir.path().join("out/merged.xml").exists());
}

#[test]
fn collect_missing_testlogs_fails() {
    let temp_dir = tempdir().unwrap();

    let mut cmd = shardmerge_cmd();
    cmd.current_dir(temp_dir.path()).arg("collect");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("bazel-testlogs"));
}

#[test]
fn collect_statement_mismatch_fails() {
    let temp_dir = tempdir().unwrap();
    let testlogs = temp_dir.path().join("logs");
    create_testlogs(&testlogs);
    fs::write(
        testlogs.join("pkg/lib_test/shard_2_of_2/coverage.dat"),
        "mode: set\npkg/lib.go:1.1,3.2 7 0\n",
    )
    .unwrap();

    let mut cmd = shardmerge_cmd();
    cmd.current_dir(temp_dir.path())
        .args(["collect", "--root", testlogs.to_str().unwrap()]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("pkg/lib.go"))
        .stdout(predicate::str::contains("complete to collect bazel result.").not());
}

#[test]
fn collect_json_summary() {
    let temp_dir = tempdir().unwrap();
    let testlogs = temp_dir.path().join("logs");
    create_testlogs(&testlogs);

    let mut cmd = shardmerge_cmd();
    cmd.current_dir(temp_dir.path()).args([
        "collect",
        "--root",
        testlogs.to_str().unwrap(),
        "--summary",
        "json",
    ]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["coverage_artifacts"], 2);
    assert_eq!(summary["merged_blocks"], 2);
    assert_eq!(summary["tests"], 2);
    assert_eq!(summary["failures"], 1);
}

#[test]
fn collect_uses_implicit_config_file() {
    let temp_dir = tempdir().unwrap();
    let testlogs = temp_dir.path().join("logs");
    create_testlogs(&testlogs);
    fs::write(
        temp_dir.path().join(".shardmerge.yml"),
        format!(
            "discovery:\n  root: {}\noutput:\n  report_path: junit.xml\n  suite_name: sharded\n",
            testlogs.display()
        ),
    )
    .unwrap();

    let mut cmd = shardmerge_cmd();
    cmd.current_dir(temp_dir.path()).arg("collect");

    cmd.assert().success();

    let junit = fs::read_to_string(temp_dir.path().join("junit.xml")).unwrap();
    assert!(junit.contains(r#"name="sharded""#));
}

#[test]
fn print_default_config_is_yaml() {
    let mut cmd = shardmerge_cmd();
    cmd.arg("print-default-config");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("symlink_prefix: bazel-"))
        .stdout(predicate::str::contains("coverage_path: coverage.dat"));
}

#[test]
fn init_config_refuses_to_overwrite() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("shardmerge.yml");

    let mut cmd = shardmerge_cmd();
    cmd.args(["init-config", "--output", config_path.to_str().unwrap()]);
    cmd.assert().success();
    assert!(config_path.exists());

    let mut cmd = shardmerge_cmd();
    cmd.args(["init-config", "--output", config_path.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let mut cmd = shardmerge_cmd();
    cmd.args([
        "init-config",
        "--output",
        config_path.to_str().unwrap(),
        "--force",
    ]);
    cmd.assert().success();
}

#[test]
fn validate_config_accepts_valid_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("shardmerge.yml");
    fs::write(&config_path, "output:\n  indent: 2\n").unwrap();

    let mut cmd = shardmerge_cmd();
    cmd.args([
        "validate-config",
        "--config",
        config_path.to_str().unwrap(),
        "--verbose",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid!"))
        .stdout(predicate::str::contains("output.indent"));
}

#[test]
fn validate_config_rejects_invalid_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("shardmerge.yml");
    fs::write(
        &config_path,
        "output:\n  coverage_path: same.out\n  report_path: same.out\n",
    )
    .unwrap();

    let mut cmd = shardmerge_cmd();
    cmd.args(["validate-config", "--config", config_path.to_str().unwrap()]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Configuration validation failed"));
}
