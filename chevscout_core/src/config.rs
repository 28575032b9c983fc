use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::AdvisorError;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Gemini API key. The GEMINI_API_KEY environment variable wins over
    /// the file value.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_theme() -> String {
    "auto".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("chevscout");

        let config_path = config_dir.join("config.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).await?;
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    pub async fn save(&self) -> Result<()> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("chevscout");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).await?;
        }

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).await?;
        Ok(())
    }

    /// The credential the app will actually use, env override first.
    /// Absence is a hard configuration failure: the whole form is replaced
    /// by a static error screen for the session.
    pub fn credential(&self) -> Result<String, AdvisorError> {
        if let Some(key) = clean_optional(std::env::var(API_KEY_ENV).ok()) {
            return Ok(key);
        }
        clean_optional(self.api_key.clone()).ok_or_else(|| {
            AdvisorError::Configuration(format!(
                "No Gemini API key found. Set {} or add api_key to the chevscout config file.",
                API_KEY_ENV
            ))
        })
    }
}

fn clean_optional(input: Option<String>) -> Option<String> {
    input.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.theme, "auto");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn blank_file_key_is_treated_as_missing() {
        let config: Config = toml::from_str(r#"api_key = "   ""#).unwrap();
        // Only meaningful when the env override is absent in the test run.
        if std::env::var(API_KEY_ENV).is_err() {
            assert!(matches!(
                config.credential(),
                Err(AdvisorError::Configuration(_))
            ));
        }
    }
}
