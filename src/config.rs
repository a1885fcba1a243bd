use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{PushError, Result};
use crate::http::DEFAULT_TIMEOUT;

/// Everything needed to build a `Client`.
///
/// The JSON form uses the keys of the service's own fixtures:
///
/// ```json
/// { "appSecret": "...", "packageName": ["com.example.app"], "sandbox": false }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub app_secret: String,
    #[serde(rename = "packageName", alias = "packageNames")]
    pub package_names: Vec<String>,
    #[serde(default)]
    pub sandbox: bool,
    /// Replaces both the production and sandbox API hosts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Replaces the feedback host serving invalid registration ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl ClientConfig {
    /// Production config with the default timeout.
    pub fn new<I, S>(app_secret: impl Into<String>, package_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            app_secret: app_secret.into(),
            package_names: package_names.into_iter().map(Into::into).collect(),
            sandbox: false,
            api_url: None,
            feedback_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Reads a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading client config from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| {
            PushError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            PushError::InvalidConfig(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// A client needs a secret, at least one package name and a non-zero
    /// timeout.
    pub fn validate(&self) -> Result<()> {
        if self.app_secret.is_empty() {
            return Err(PushError::InvalidConfig("app secret is empty".to_string()));
        }
        if self.package_names.is_empty() || self.package_names.iter().any(String::is_empty) {
            return Err(PushError::InvalidConfig(
                "at least one non-empty package name is required".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(PushError::InvalidConfig(
                "timeoutSecs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
