use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// Category definitions live in lorekeep_core so the pipeline can run without
// a config file.
use lorekeep_core::store::{CategorySpec, default_categories};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_categories")]
    pub categories: Vec<CategorySpec>,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub persona: PersonaConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            rules: RulesConfig::default(),
            persona: PersonaConfig::default(),
        }
    }
}

/// Where the bundled default-rules document comes from.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RulesConfig {
    /// Local JSON file; takes precedence when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_rules_path: Option<PathBuf>,
    /// HTTP fallback when no local file is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_rules_url: Option<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            default_rules_path: Config::config_dir().ok().map(|d| d.join("defaultrules.json")),
            default_rules_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PersonaConfig {
    #[serde(default = "PersonaConfig::default_name")]
    pub name: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
        }
    }
}

impl PersonaConfig {
    fn default_name() -> String {
        "default".to_string()
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            tracing::info!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;

        Ok(config)
    }

    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("lorekeep"))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Write the config template and the bundled default-rules document.
    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let template = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(&config_path, template)?;

        let rules_path = config_dir.join("defaultrules.json");
        if !rules_path.exists() {
            std::fs::write(&rules_path, DEFAULT_RULES_TEMPLATE)?;
        }

        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Next steps:");
        println!("   1. Adjust categories/tags in config.json if needed");
        println!("   2. Edit defaultrules.json to taste");
        println!("   3. Run 'lorekeep chat' to start a session");
        println!();
        Ok(())
    }
}

const DEFAULT_RULES_TEMPLATE: &str = r#"{
  "rules": [
    "Track every named character and location you introduce.",
    "When a tracked entity changes, emit an updated block with the same id.",
    "Wrap character records in <namedcharacter> tags and location records in <location> tags.",
    "Each record is a YAML mapping with at least an id and a name."
  ]
}
"#;
