//! Common test utilities and fixtures
//!
//! Shared helpers for driving the `meetsim` binary in an isolated
//! working directory.

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Get the valid config fixture path
pub fn valid_config_fixture() -> PathBuf {
    fixture_path("valid_config.toml")
}

/// Get the invalid config fixture path
pub fn invalid_config_fixture() -> PathBuf {
    fixture_path("invalid_config.toml")
}

/// Every environment variable the binary reads as an override
const MEETSIM_VARS: &[&str] = &[
    "MEETSIM_CONFIG",
    "MEETSIM_USER_NAME",
    "MEETSIM_ADDRESSEE_WINDOW",
    "MEETSIM_SEED",
    "MEETSIM_CAPABILITY_TIMEOUT_SECS",
    "MEETSIM_ROSTER",
    "MEETSIM_PROVIDER",
    "MEETSIM_BASE_URL",
    "MEETSIM_API_KEY",
    "MEETSIM_MODEL",
    "MEETSIM_MAX_RETRIES",
    "MEETSIM_OUTPUT_DIR",
    "MEETSIM_LOG_LEVEL",
    "MEETSIM_LOG_FILE",
    "MEETSIM_LOG_JSON",
];

/// A `meetsim` command running inside `dir`, with no inherited
/// `MEETSIM_*` overrides and a home directory that holds no config.
pub fn meetsim_in(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("meetsim").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("GOOGLE_API_KEY");
    for var in MEETSIM_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// `meetsim meet` against the offline mock provider with a fixed seed
pub fn mock_meeting(dir: &TempDir, topic: &str) -> Command {
    let mut cmd = meetsim_in(dir);
    cmd.args(["meet", "--topic", topic, "--provider", "mock", "--seed", "7"]);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_exist() {
        assert!(fixtures_dir().exists(), "Fixtures directory should exist");
        assert!(valid_config_fixture().exists());
        assert!(invalid_config_fixture().exists());
        assert!(fixture_path("team.json").exists());
    }
}
