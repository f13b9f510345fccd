//! Configuration system tests
//!
//! Tests configuration loading, validation, and environment overrides
//! through the binary.

mod common;

use std::fs;
use std::path::PathBuf;

use predicates::prelude::*;
use tempfile::TempDir;

use common::{invalid_config_fixture, meetsim_in, valid_config_fixture};

/// Test fixture for configuration testing
struct ConfigFixture {
    temp_dir: TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        Self {
            temp_dir,
            config_path,
        }
    }

    fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    fn validate(&self) -> assert_cmd::assert::Assert {
        meetsim_in(&self.temp_dir)
            .args(["config", "validate", "--config"])
            .arg(&self.config_path)
            .assert()
    }
}

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_empty_config_uses_defaults() {
    let fixture = ConfigFixture::new();
    fixture.write_config("");
    fixture
        .validate()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_valid_fixture() {
    let dir = TempDir::new().unwrap();
    meetsim_in(&dir)
        .args(["config", "validate", "--config"])
        .arg(valid_config_fixture())
        .assert()
        .success();
}

#[test]
fn test_show_reflects_file_values() {
    let dir = TempDir::new().unwrap();
    meetsim_in(&dir)
        .args(["config", "show", "--config"])
        .arg(valid_config_fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("user_name = \"Kim\""))
        .stdout(predicate::str::contains("seed = 7"))
        .stdout(predicate::str::contains("provider = \"mock\""));
}

#[test]
fn test_local_config_file_is_discovered() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("meetsim.toml"),
        "[meeting]\nuser_name = \"Local\"\n",
    )
    .unwrap();

    meetsim_in(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("user_name = \"Local\""));
}

#[test]
fn test_meeting_uses_config_user_name() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");

    meetsim_in(&dir)
        .args(["meet", "--topic", "Pricing", "--save-log", "--config"])
        .arg(valid_config_fixture())
        .arg("--output-dir")
        .arg(&out)
        .write_stdin("Alex?\n/end\n")
        .assert()
        .success();

    let entry = fs::read_dir(&out).unwrap().next().unwrap().unwrap();
    let log = fs::read_to_string(entry.path()).unwrap();
    assert!(log.contains("**Participants:** Kim (User)"));
}

// ─────────────────────────────────────────────────────────────────
// Environment Override Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    meetsim_in(&dir)
        .env("MEETSIM_USER_NAME", "FromEnv")
        .env("MEETSIM_ADDRESSEE_WINDOW", "5")
        .args(["config", "show", "--config"])
        .arg(valid_config_fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("user_name = \"FromEnv\""))
        .stdout(predicate::str::contains("addressee_window = 5"));
}

#[test]
fn test_env_provider_is_validated() {
    let dir = TempDir::new().unwrap();
    meetsim_in(&dir)
        .env("MEETSIM_PROVIDER", "telepathy")
        .args(["config", "validate"])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("telepathy"));
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_fixture() {
    let dir = TempDir::new().unwrap();
    meetsim_in(&dir)
        .args(["config", "validate", "--config"])
        .arg(invalid_config_fixture())
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("E102"));
}

#[test]
fn test_syntax_error() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[meeting\nuser_name = ");
    fixture
        .validate()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("E101"));
}

#[test]
fn test_wrong_value_type() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[meeting]\naddressee_window = \"three\"\n");
    fixture.validate().failure().code(10);
}

#[test]
fn test_window_upper_bound() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[meeting]\naddressee_window = 11\n");
    fixture
        .validate()
        .failure()
        .stderr(predicate::str::contains("addressee_window"));

    fixture.write_config("[meeting]\naddressee_window = 10\n");
    fixture.validate().success();
}

#[test]
fn test_retry_count_upper_bound() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[capability]\nprovider = \"mock\"\nmax_retries = 60\n");
    fixture
        .validate()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("max_retries"));
}

#[test]
fn test_openai_requires_http_url() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[capability]\nprovider = \"openai\"\nbase_url = \"ws://localhost\"\n");
    fixture
        .validate()
        .failure()
        .stderr(predicate::str::contains("base URL"));
}
