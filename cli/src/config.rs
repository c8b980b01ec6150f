//! CLI Configuration

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use ticketflow_core::infrastructure::GenerationConfig;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub detect_escalation: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self { detect_escalation: true }
    }
}

/// Keys accepted by `config get` / `config set`.
pub const KEYS: [&str; 7] = [
    "generation.enabled",
    "generation.api_key",
    "generation.model",
    "generation.base_url",
    "generation.timeout_secs",
    "storage.data_dir",
    "intake.detect_escalation",
];

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Apply environment overrides on top of the file values.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(flag) = var("USE_GEMINI") {
            self.generation.enabled = flag.trim().eq_ignore_ascii_case("true");
        }
        if let Some(key) = var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY")) {
            self.generation.api_key = Some(key);
        }
        if let Some(model) = var("GEMINI_MODEL") {
            self.generation.model = model;
        }
        if let Some(dir) = var("TICKETFLOW_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::home()?.join("data")),
        }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "generation.enabled" => Some(self.generation.enabled.to_string()),
            "generation.api_key" => self.generation.api_key.as_deref().map(mask),
            "generation.model" => Some(self.generation.model.clone()),
            "generation.base_url" => Some(self.generation.base_url.clone()),
            "generation.timeout_secs" => Some(self.generation.timeout_secs.to_string()),
            "storage.data_dir" => self.storage.data_dir.as_ref().map(|d| d.display().to_string()),
            "intake.detect_escalation" => Some(self.intake.detect_escalation.to_string()),
            _ => bail!("unknown config key: {key}"),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "generation.enabled" => self.generation.enabled = parse_bool(value)?,
            "generation.api_key" => self.generation.api_key = Some(value.to_string()),
            "generation.model" => self.generation.model = value.to_string(),
            "generation.base_url" => self.generation.base_url = value.to_string(),
            "generation.timeout_secs" => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("timeout_secs must be a whole number of seconds"))?;
                if secs == 0 {
                    bail!("timeout_secs must be at least 1");
                }
                self.generation.timeout_secs = secs;
            }
            "storage.data_dir" => self.storage.data_dir = Some(PathBuf::from(value)),
            "intake.detect_escalation" => self.intake.detect_escalation = parse_bool(value)?,
            _ => bail!("unknown config key: {key}"),
        }
        Ok(())
    }

    fn home() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot find home directory"))?;
        Ok(home.join(".ticketflow"))
    }

    pub fn config_path(profile: Option<&str>) -> Result<PathBuf> {
        let filename = match profile {
            Some(p) => format!("config.{p}.toml"),
            None => "config.toml".to_string(),
        };
        Ok(Self::home()?.join(filename))
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    value
        .trim()
        .to_lowercase()
        .parse()
        .map_err(|_| anyhow!("expected true or false, got '{value}'"))
}

fn mask(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{visible}****")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_parse_from_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.generation.enabled);
        assert_eq!(config.generation.timeout_secs, 10);
        assert!(config.intake.detect_escalation);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_sections_parse() {
        let config: Config = toml::from_str(
            r#"
            [generation]
            enabled = true
            api_key = "abc"
            model = "gemini-pro"

            [storage]
            data_dir = "/tmp/tf"

            [intake]
            detect_escalation = false
            "#,
        )
        .unwrap();
        assert!(config.generation.is_active());
        assert_eq!(config.generation.model, "gemini-pro");
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/tf"));
        assert!(!config.intake.detect_escalation);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("USE_GEMINI", "TRUE"),
            ("GOOGLE_API_KEY", "google-key"),
            ("TICKETFLOW_DATA_DIR", "/srv/tickets"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert!(config.generation.enabled);
        assert_eq!(config.generation.api_key.as_deref(), Some("google-key"));
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/srv/tickets")));
    }

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        config.set("generation.timeout_secs", "30").unwrap();
        config.set("generation.api_key", "secret-key").unwrap();
        assert_eq!(config.get("generation.timeout_secs").unwrap().as_deref(), Some("30"));
        assert_eq!(config.get("generation.api_key").unwrap().as_deref(), Some("secr****"));
        assert!(config.set("generation.enabled", "maybe").is_err());
        assert!(config.set("generation.timeout_secs", "0").is_err());
        assert_eq!(config.generation.timeout_secs, 30);
        assert!(config.get("nope").is_err());
    }
}
