use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{Result, SportsHubError};

const CONFIG_DIR_NAME: &str = "sportshub-cli";
const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_PROJECT_KEY: &str = "SH";

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PROJECT_KEY_PATTERN: &str = r"^[A-Z]{1,10}$";

/// Credentials and defaults for the `sportshub` CLI.
///
/// Stored as camelCase JSON. Fields missing from the file load as empty and
/// make the configuration incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CliConfig {
    pub jira_base_url: String,
    pub email: String,
    pub api_token: String,
    pub default_project_key: String,
    pub open_router_api_token: String,
}

impl CliConfig {
    /// Whether every field has a value.
    pub fn is_complete(&self) -> bool {
        [
            &self.jira_base_url,
            &self.email,
            &self.api_token,
            &self.default_project_key,
            &self.open_router_api_token,
        ]
        .iter()
        .all(|field| !field.is_empty())
    }
}

/// Reads and writes the CLI configuration file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager for `<config dir>/sportshub-cli/config.json`.
    pub fn new() -> Result<Self> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SportsHubError::Validation("Could not determine the configuration directory".into())
        })?;
        Ok(Self::at(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    /// Manager for a configuration file at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored configuration, or `None` if there is no readable file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Option<CliConfig> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable configuration file");
                None
            }
        }
    }

    /// Write `config` as pretty-printed JSON, creating the directory if needed.
    #[instrument(skip(self, config), fields(path = %self.path.display()))]
    pub fn save(&self, config: &CliConfig) -> Result<()> {
        let io_err = |source: std::io::Error| SportsHubError::Io {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(config)?).map_err(io_err)?;
        debug!("saved configuration");
        Ok(())
    }

    pub fn validate(config: &CliConfig) -> bool {
        config.is_complete()
    }

    /// The complete configuration, or an error telling the user to run
    /// `sportshub configure`.
    pub fn get(&self) -> Result<CliConfig> {
        let config = self.load().ok_or(SportsHubError::NotConfigured)?;
        if !Self::validate(&config) {
            return Err(SportsHubError::IncompleteConfig);
        }
        Ok(config)
    }

    pub fn is_configured(&self) -> bool {
        self.get().is_ok()
    }
}

fn is_match(pattern: &str, input: &str) -> bool {
    Regex::new(pattern).is_ok_and(|re| re.is_match(input))
}

fn required<'a>(input: &'a str, what: &str) -> Result<&'a str> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SportsHubError::Validation(format!("{what} is required")));
    }
    Ok(input)
}

/// Check a Jira site URL and strip any trailing slash.
pub fn validate_jira_base_url(input: &str) -> Result<String> {
    let input = required(input, "Jira base URL")?;
    let url = reqwest::Url::parse(input)
        .map_err(|_| SportsHubError::Validation("Please provide a valid URL".into()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SportsHubError::Validation(
            "Please provide a valid HTTP/HTTPS URL".into(),
        ));
    }
    Ok(input.trim_end_matches('/').to_string())
}

pub fn validate_email(input: &str) -> Result<String> {
    let input = required(input, "Email address")?;
    if !is_match(EMAIL_PATTERN, input) {
        return Err(SportsHubError::Validation(
            "Please provide a valid email address".into(),
        ));
    }
    Ok(input.to_string())
}

/// Upper-case a Jira project key and check it is 1-10 letters.
pub fn validate_project_key(input: &str) -> Result<String> {
    let key = required(input, "Project key")?.to_uppercase();
    if !is_match(PROJECT_KEY_PATTERN, &key) {
        return Err(SportsHubError::Validation(
            "Project key should be 1-10 uppercase letters".into(),
        ));
    }
    Ok(key)
}

/// Non-empty, trimmed secret such as an API token.
pub fn validate_token(input: &str, what: &str) -> Result<String> {
    required(input, what).map(str::to_string)
}
