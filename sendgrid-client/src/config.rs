// sendgrid-client/src/config.rs
use anyhow::{anyhow, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "sendgrid-cli";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    /// API key sent as a bearer token
    #[serde(default)]
    pub api_key: String,
    /// Override for the API base URL (defaults to the public v3 endpoint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Subuser every call is made on behalf of, unless overridden per call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_behalf_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load from the user config directory with environment overrides applied
    pub fn load() -> Result<Self> {
        Ok(Self::load_stored()?.with_env_overrides(|k| std::env::var(k).ok()))
    }

    /// Load the file as stored, creating a default one on first use
    pub fn load_stored() -> Result<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            let default = Self::default();
            default.save_to(&config_path)?;
            return Ok(default);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `SENDGRID_*` environment overrides through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("SENDGRID_API_KEY") {
            self.api_key = key;
        }
        if let Some(url) = lookup("SENDGRID_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(subuser) = lookup("SENDGRID_ON_BEHALF_OF") {
            self.on_behalf_of = Some(subuser);
        }
        self
    }

    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir)?;
        self.save_to(&config_dir.join(CONFIG_FILE_NAME))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        // Set permissions to 600 (owner read/write only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    fn config_dir() -> Result<PathBuf> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("Cannot determine config directory"))?;
        Ok(base_dirs.config_dir().join(CONFIG_DIR_NAME))
    }

    /// API key, or an error telling the user how to set one
    pub fn require_api_key(&self) -> Result<&str> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!(
                "API key not set. Run `sendgrid setup` or set SENDGRID_API_KEY"
            ));
        }
        Ok(&self.api_key)
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(sendgrid_api::DEFAULT_BASE_URL)
    }

    /// API key with everything but the prefix hidden
    pub fn masked_api_key(&self) -> String {
        match self.api_key.get(..6) {
            Some(prefix) if self.api_key.len() > 10 => format!("{}…", prefix),
            _ if self.api_key.is_empty() => String::new(),
            _ => "…".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: Config = toml::from_str(r#"api_key = "SG.abc""#).unwrap();
        assert_eq!(config.api_key, "SG.abc");
        assert!(config.on_behalf_of.is_none());
        assert_eq!(config.base_url(), "https://api.sendgrid.com/v3");
    }

    #[test]
    fn test_toml_round_trip_skips_unset_options() {
        let config = Config {
            api_key: "SG.abc".to_string(),
            on_behalf_of: Some("sub".to_string()),
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(!text.contains("base_url"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SENDGRID_API_KEY", "SG.env"),
            ("SENDGRID_ON_BEHALF_OF", "envsub"),
        ]
        .into_iter()
        .collect();
        let config = Config {
            api_key: "SG.file".to_string(),
            base_url: Some("http://localhost:3000".to_string()),
            ..Default::default()
        }
        .with_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_key, "SG.env");
        assert_eq!(config.on_behalf_of.as_deref(), Some("envsub"));
        assert_eq!(config.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_require_api_key() {
        assert!(Config::default().require_api_key().is_err());
        let config = Config {
            api_key: "SG.abc".to_string(),
            ..Default::default()
        };
        assert_eq!(config.require_api_key().unwrap(), "SG.abc");
    }

    #[test]
    fn test_masked_api_key() {
        let config = Config {
            api_key: "SG.abcdefghijklmnop".to_string(),
            ..Default::default()
        };
        assert_eq!(config.masked_api_key(), "SG.abc…");
        assert_eq!(Config::default().masked_api_key(), "");
    }

    #[test]
    fn test_save_to_and_load_from() {
        let path = std::env::temp_dir()
            .join(format!("sendgrid-cli-test-{}.toml", std::process::id()));
        let config = Config {
            api_key: "SG.saved".to_string(),
            timeout_secs: Some(30),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
