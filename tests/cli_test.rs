use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_prints_usage_without_side_effects() {
    let dir = tempfile::TempDir::new().unwrap();
    Command::cargo_bin("openclaw-deploy")
        .unwrap()
        .current_dir(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--mcp"))
        .stdout(predicate::str::contains("Usage"));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("openclaw-deploy")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
