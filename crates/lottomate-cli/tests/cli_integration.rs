//! CLI integration tests
//!
//! Each test runs the binary against throwaway state/config files so runs
//! are isolated from each other and from the developer's environment.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lottomate(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lottomate").unwrap();
    cmd.env("LOTTOMATE_STATE_PATH", dir.path().join("state.json"))
        .env("LOTTOMATE_CONFIG_PATH", dir.path().join("config.json"))
        .env_remove("LOTTOMATE_BACKEND_URL")
        .env_remove("LOTTOMATE_ANON_KEY")
        .env_remove("LOTTOMATE_LLM_API_KEY");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    lottomate(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("draws"))
        .stdout(predicate::str::contains("predict"))
        .stdout(predicate::str::contains("subscription"));
}

#[test]
fn test_draws_list_shows_seeded_history() {
    let dir = TempDir::new().unwrap();
    lottomate(&dir)
        .args(["draws", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-02-20"))
        .stdout(predicate::str::contains("2024-02-18"));
}

#[test]
fn test_draws_list_json_format() {
    let dir = TempDir::new().unwrap();
    lottomate(&dir)
        .args(["draws", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"date\": \"2024-02-19\""));
}

#[test]
fn test_draws_add_persists() {
    let dir = TempDir::new().unwrap();
    lottomate(&dir)
        .args(["draws", "add", "--date", "2024-03-01", "--numbers", "1,2,3,4,5,6"])
        .assert()
        .success();

    lottomate(&dir)
        .args(["draws", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-01"));
}

#[test]
fn test_draws_add_rejects_bad_numbers() {
    let dir = TempDir::new().unwrap();
    lottomate(&dir)
        .args(["draws", "add", "--date", "2024-03-01", "--numbers", "1,x,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid numbers list"));
}

#[test]
fn test_subscription_starts_inactive() {
    let dir = TempDir::new().unwrap();
    lottomate(&dir)
        .args(["subscription", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inactive"));
}

#[test]
fn test_subscription_activate_and_cancel() {
    let dir = TempDir::new().unwrap();
    lottomate(&dir)
        .args(["subscription", "activate"])
        .assert()
        .success();

    lottomate(&dir)
        .args(["subscription", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("active"))
        .stdout(predicate::str::contains("Premium"));

    lottomate(&dir)
        .args(["subscription", "cancel"])
        .assert()
        .success();

    lottomate(&dir)
        .args(["subscription", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inactive"));
}

#[test]
fn test_predict_requires_subscription() {
    let dir = TempDir::new().unwrap();
    lottomate(&dir)
        .args(["predict", "new"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Premium subscription required"));
}

#[test]
fn test_predict_falls_back_without_api_key() {
    let dir = TempDir::new().unwrap();
    lottomate(&dir)
        .args(["subscription", "activate"])
        .assert()
        .success();

    lottomate(&dir)
        .args(["predict", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("statistical analysis"));

    lottomate(&dir)
        .args(["predict", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("statistical analysis"));
}

#[test]
fn test_whoami_requires_backend_config() {
    let dir = TempDir::new().unwrap();
    lottomate(&dir)
        .args(["auth", "whoami"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Backend not configured"));
}

#[test]
fn test_config_set_and_show() {
    let dir = TempDir::new().unwrap();
    lottomate(&dir)
        .args(["config", "set", "backend_url", "https://backend.example.com"])
        .assert()
        .success();

    lottomate(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://backend.example.com"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    lottomate(&dir)
        .args(["config", "set", "no_such_key", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}
