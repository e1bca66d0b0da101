use assert_cmd::Command;
use indoc::indoc;
use std::fs;
use tempfile::TempDir;

// No address space can map a stack this large, so every spawn fails.
fn unspawnable_stack() -> String {
    (usize::MAX / 4).to_string()
}

fn stderr_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}

fn fixture_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lock-fixture").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("LOCK_FIXTURE_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_silent_by_default() {
    let dir = TempDir::new().unwrap();
    let assert = fixture_cmd(&dir).assert().success();
    assert!(assert.get_output().stdout.is_empty());
}

#[test]
fn test_text_report_shows_final_counter() {
    let dir = TempDir::new().unwrap();
    let assert = fixture_cmd(&dir)
        .args(["--report", "text", "--check"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.starts_with("round 0: counter=2"), "stdout: {stdout}");
    assert!(stdout.contains("consistent=true"));
}

#[test]
fn test_json_report_is_parseable() {
    let dir = TempDir::new().unwrap();
    let assert = fixture_cmd(&dir)
        .args(["--report", "json", "--rounds", "3", "--binding", "shared"])
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let rounds = value.as_array().unwrap();
    assert_eq!(rounds.len(), 3);
    for round in rounds {
        assert_eq!(round["counter"], 2);
        assert_eq!(round["sections"][0]["routine"], "Thread1");
        assert_eq!(round["sections"][1]["routine"], "Thread1");
    }
}

#[test]
fn test_discovered_config_file_is_applied() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".lock-fixture.toml"),
        indoc! {r#"
            rounds = 4
        "#},
    )
    .unwrap();

    let assert = fixture_cmd(&dir)
        .args(["--report", "text"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 4);
}

#[test]
fn test_cli_rounds_override_config_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("fixture.toml");
    fs::write(&config_path, "rounds = 9\n").unwrap();

    let assert = fixture_cmd(&dir)
        .arg("--config")
        .arg(&config_path)
        .args(["--rounds", "2", "--report", "text"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 2);
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    fixture_cmd(&dir)
        .args(["--config", "does-not-exist.toml"])
        .assert()
        .failure();
}

#[test]
fn test_zero_rounds_fails() {
    let dir = TempDir::new().unwrap();
    fixture_cmd(&dir).args(["--rounds", "0"]).assert().failure();
}

#[test]
fn test_huge_rounds_is_rejected_not_panicking() {
    let dir = TempDir::new().unwrap();
    let assert = fixture_cmd(&dir)
        .args(["--rounds", "18446744073709551615"])
        .assert()
        .failure();
    let stderr = stderr_of(&assert);
    assert!(stderr.contains("rounds must be at most"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"), "stderr: {stderr}");
}

#[test]
fn test_spawn_failures_are_discarded_by_default() {
    let dir = TempDir::new().unwrap();
    let assert = fixture_cmd(&dir)
        .arg("--stack-size")
        .arg(unspawnable_stack())
        .args(["--report", "text"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("counter=0"), "stdout: {stdout}");
    assert!(stdout.contains("discarded=2"), "stdout: {stdout}");
}

#[test]
fn test_strict_fails_on_spawn_failure() {
    let dir = TempDir::new().unwrap();
    let assert = fixture_cmd(&dir)
        .arg("--stack-size")
        .arg(unspawnable_stack())
        .arg("--strict")
        .assert()
        .failure();
    let stderr = stderr_of(&assert);
    assert!(stderr.contains("Fixture run failed"), "stderr: {stderr}");
    assert!(stderr.contains("Failed to spawn worker-0"), "stderr: {stderr}");
}

#[test]
fn test_strict_succeeds_when_workers_run() {
    let dir = TempDir::new().unwrap();
    fixture_cmd(&dir)
        .args(["--strict", "--check", "--rounds", "3"])
        .assert()
        .success();
}

#[test]
fn test_check_fails_when_counter_is_short() {
    let dir = TempDir::new().unwrap();
    let assert = fixture_cmd(&dir)
        .arg("--stack-size")
        .arg(unspawnable_stack())
        .arg("--check")
        .assert()
        .failure();
    let stderr = stderr_of(&assert);
    assert!(stderr.contains("Counter check failed"), "stderr: {stderr}");
    assert!(
        stderr.contains("Round 0 finished with counter 0, expected 2"),
        "stderr: {stderr}"
    );
}

#[test]
fn test_cli_failure_policy_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".lock-fixture.toml"),
        "failure_policy = \"propagate\"\n",
    )
    .unwrap();

    fixture_cmd(&dir)
        .arg("--stack-size")
        .arg(unspawnable_stack())
        .assert()
        .failure();

    fixture_cmd(&dir)
        .arg("--stack-size")
        .arg(unspawnable_stack())
        .args(["--failure-policy", "discard"])
        .assert()
        .success();
}
