//! Configuration system for meetsim
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (MEETSIM_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::capability::ProviderKind;
use crate::error::{Error, Result};

/// Largest accepted addressee context window.
pub const MAX_ADDRESSEE_WINDOW: usize = 10;

/// Largest accepted number of retries per capability request.
pub const MAX_RETRIES: u32 = 10;

/// Main meetsim configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingConfig {
    /// Meeting behavior
    pub meeting: MeetingSettings,

    /// Persona roster source
    pub roster: RosterSettings,

    /// Generative capability backend
    pub capability: CapabilitySettings,

    /// Log and summary export
    pub export: ExportSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Meeting behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingSettings {
    /// Display name of the human participant
    pub user_name: String,

    /// Number of recent persona lines given to the addressee classifier
    pub addressee_window: usize,

    /// Fixed RNG seed for reproducible speaker selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Upper bound on a single capability call, in seconds
    pub capability_timeout_secs: u64,
}

/// Persona roster settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    /// JSON roster file (unset = bundled default roster)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Generative capability settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilitySettings {
    /// Provider: openai, mock, none
    pub provider: String,

    /// API base URL of an OpenAI-compatible endpoint
    pub base_url: String,

    /// API key (empty string for local servers)
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum completion tokens per call
    pub max_tokens: u32,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retries on transient failures
    pub max_retries: u32,
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory for saved logs and summaries
    pub output_dir: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

// Default implementations

impl Default for MeetingSettings {
    fn default() -> Self {
        Self {
            user_name: "User".to_string(),
            addressee_window: 3,
            seed: None,
            capability_timeout_secs: 60,
        }
    }
}

impl Default for CapabilitySettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            api_key: String::new(),
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.9,
            max_tokens: 512,
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl MeetingConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        let config_file = Self::find_config_file(config_path)?;
        if let Some(path) = config_file {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            config = Self::parse(&content)?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Parse TOML content into a configuration
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            source: Some(e),
        })
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        let search_paths = [
            // Current directory
            Some(PathBuf::from("meetsim.toml")),
            // User config directory
            dirs::config_dir().map(|p| p.join("meetsim").join("config.toml")),
            // Home directory
            dirs::home_dir().map(|p| p.join(".meetsim").join("config.toml")),
        ];

        for path in search_paths.iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Meeting settings
        if let Ok(val) = std::env::var("MEETSIM_USER_NAME") {
            self.meeting.user_name = val;
        }
        if let Ok(val) = std::env::var("MEETSIM_ADDRESSEE_WINDOW") {
            if let Ok(n) = val.parse() {
                self.meeting.addressee_window = n;
            }
        }
        if let Ok(val) = std::env::var("MEETSIM_SEED") {
            if let Ok(n) = val.parse() {
                self.meeting.seed = Some(n);
            }
        }
        if let Ok(val) = std::env::var("MEETSIM_CAPABILITY_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.meeting.capability_timeout_secs = n;
            }
        }

        // Roster
        if let Ok(val) = std::env::var("MEETSIM_ROSTER") {
            self.roster.path = Some(val);
        }

        // Capability settings
        if let Ok(val) = std::env::var("MEETSIM_PROVIDER") {
            self.capability.provider = val;
        }
        if let Ok(val) = std::env::var("MEETSIM_BASE_URL") {
            self.capability.base_url = val;
        }
        if let Ok(val) =
            std::env::var("MEETSIM_API_KEY").or_else(|_| std::env::var("GOOGLE_API_KEY"))
        {
            self.capability.api_key = val;
        }
        if let Ok(val) = std::env::var("MEETSIM_MODEL") {
            self.capability.model = val;
        }
        if let Ok(val) = std::env::var("MEETSIM_MAX_RETRIES") {
            if let Ok(n) = val.parse() {
                self.capability.max_retries = n;
            }
        }

        // Export
        if let Ok(val) = std::env::var("MEETSIM_OUTPUT_DIR") {
            self.export.output_dir = val;
        }

        // Logging settings
        if let Ok(val) = std::env::var("MEETSIM_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("MEETSIM_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("MEETSIM_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.export.output_dir = expand_path(&self.export.output_dir);

        if let Some(ref path) = self.roster.path {
            self.roster.path = Some(expand_path(path));
        }
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.meeting.user_name.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "meeting.user_name",
                "user name cannot be empty",
            ));
        }

        if self.meeting.addressee_window > MAX_ADDRESSEE_WINDOW {
            return Err(Error::config_field_invalid(
                "meeting.addressee_window",
                format!("addressee_window must be at most {}", MAX_ADDRESSEE_WINDOW),
            ));
        }

        if self.meeting.capability_timeout_secs == 0 {
            return Err(Error::config_field_invalid(
                "meeting.capability_timeout_secs",
                "timeout must be greater than zero",
            ));
        }

        let provider = ProviderKind::parse(&self.capability.provider).ok_or_else(|| {
            let known: Vec<&str> = ProviderKind::all().iter().map(|k| k.name()).collect();
            Error::config_field_invalid(
                "capability.provider",
                format!(
                    "unknown provider '{}'. Must be one of: {}",
                    self.capability.provider,
                    known.join(", ")
                ),
            )
        })?;

        if self.capability.max_retries > MAX_RETRIES {
            return Err(Error::config_field_invalid(
                "capability.max_retries",
                format!("max_retries must be at most {}", MAX_RETRIES),
            ));
        }

        if provider == ProviderKind::OpenAi {
            let url = &self.capability.base_url;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::config_field_invalid(
                    "capability.base_url",
                    "base URL must start with http:// or https://",
                ));
            }
            if self.capability.timeout_secs == 0 {
                return Err(Error::config_field_invalid(
                    "capability.timeout_secs",
                    "timeout must be greater than zero",
                ));
            }
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Roster file, if one is configured
    pub fn roster_path(&self) -> Option<PathBuf> {
        self.roster.path.as_ref().map(PathBuf::from)
    }

    /// Export directory as a PathBuf
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.export.output_dir)
    }

    /// Per-call capability deadline
    pub fn capability_timeout(&self) -> Duration {
        Duration::from_secs(self.meeting.capability_timeout_secs)
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".meetsim")
                .join("config.toml")
        });

    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# meetsim configuration

[meeting]
# Your display name in the transcript
user_name = "User"

# Recent persona lines considered when deciding who you addressed (0-10)
addressee_window = 3

# Fixed seed for reproducible speaker selection
# seed = 42

# Upper bound on a single model call, in seconds
capability_timeout_secs = 60

[roster]
# JSON array of {"name": ..., "mbti": ...} records (comment out for the bundled roster)
# path = "~/.meetsim/personas.json"

[capability]
# Provider: openai, mock, none
provider = "openai"

# Any OpenAI-compatible endpoint (Gemini, OpenAI, Ollama, vLLM, ...)
base_url = "https://generativelanguage.googleapis.com/v1beta/openai"

# API key (or set MEETSIM_API_KEY / GOOGLE_API_KEY)
api_key = ""

# Model identifier
model = "gemini-2.0-flash"

# Sampling temperature
temperature = 0.9

# Maximum completion tokens per call
max_tokens = 512

# HTTP request timeout in seconds
timeout_secs = 30

# Maximum retries on transient failures
max_retries = 2

[export]
# Directory for saved meeting logs and summaries
output_dir = "."

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log file path (comment out to disable file logging)
# file = "~/.meetsim/logs/meetsim.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = MeetingConfig::default();
        assert_eq!(config.meeting.user_name, "User");
        assert_eq!(config.meeting.addressee_window, 3);
        assert_eq!(config.capability.provider, "openai");
        assert_eq!(config.capability.model, "gemini-2.0-flash");
        assert_eq!(config.logging.level, "warn");
        assert!(config.roster.path.is_none());
    }

    #[test]
    fn test_env_override() {
        env::set_var("MEETSIM_USER_NAME", "Kim");
        env::set_var("MEETSIM_ADDRESSEE_WINDOW", "5");
        env::set_var("MEETSIM_SEED", "7");

        let mut config = MeetingConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.meeting.user_name, "Kim");
        assert_eq!(config.meeting.addressee_window, 5);
        assert_eq!(config.meeting.seed, Some(7));

        env::remove_var("MEETSIM_USER_NAME");
        env::remove_var("MEETSIM_ADDRESSEE_WINDOW");
        env::remove_var("MEETSIM_SEED");
    }

    #[test]
    fn test_validation_valid_config() {
        let config = MeetingConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_unknown_provider() {
        let mut config = MeetingConfig::default();
        config.capability.provider = "carrier-pigeon".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut config = MeetingConfig::default();
        config.capability.base_url = "ftp://models.example.com".to_string();
        assert!(config.validate().is_err());

        // URL is irrelevant for the mock provider
        config.capability.provider = "mock".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_window_and_timeouts() {
        let mut config = MeetingConfig::default();
        config.meeting.addressee_window = MAX_ADDRESSEE_WINDOW + 1;
        assert!(config.validate().is_err());

        let mut config = MeetingConfig::default();
        config.meeting.capability_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = MeetingConfig::default();
        config.capability.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = MeetingConfig::default();
        config.capability.max_retries = MAX_RETRIES;
        assert!(config.validate().is_ok());
        config.capability.max_retries = MAX_RETRIES + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_user_name() {
        let mut config = MeetingConfig::default();
        config.meeting.user_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = MeetingConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = MeetingConfig::default();
        config.export.output_dir = "~/meetings".to_string();
        config.roster.path = Some("~/personas.json".to_string());
        config.expand_paths();

        assert!(!config.export.output_dir.contains('~'));
        assert!(!config.roster.path.unwrap().contains('~'));
    }

    #[test]
    fn test_default_config_template_parses() {
        let config = MeetingConfig::parse(&generate_default_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.meeting.addressee_window, 3);
    }

    #[test]
    fn test_parse_config_file() {
        let config_str = r#"
[meeting]
user_name = "Kim"
seed = 42

[roster]
path = "/tmp/personas.json"

[capability]
provider = "mock"
"#;

        let config = MeetingConfig::parse(config_str).unwrap();

        assert_eq!(config.meeting.user_name, "Kim");
        assert_eq!(config.meeting.seed, Some(42));
        assert_eq!(config.meeting.addressee_window, 3);
        assert_eq!(config.roster_path(), Some(PathBuf::from("/tmp/personas.json")));
        assert_eq!(config.capability.provider, "mock");
        assert_eq!(config.capability.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_parse_error() {
        let err = MeetingConfig::parse("[meeting\nuser_name = ").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }
}
