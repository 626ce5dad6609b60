use anyhow::{anyhow, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_suggestion_count() -> usize {
    3
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: usize,
    #[serde(default)]
    pub skip_confirm: bool,
    #[serde(default)]
    pub context_mode: bool,
    #[serde(default)]
    pub use_mock: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            api_base: None,
            max_tokens: None,
            suggestion_count: default_suggestion_count(),
            skip_confirm: false,
            context_mode: false,
            use_mock: false,
        }
    }
}

impl Config {
    /// Load configuration from file and overlay environment variables.
    pub fn load() -> Result<Self> {
        let mut config = Self::get_config_path()
            .and_then(|path| Self::load_from_path(&path))
            .unwrap_or_else(|_| {
                info!("No config file found, using defaults");
                Self::default()
            });

        // Environment variables override config file
        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            config.openai_api_key = Some(api_key);
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.model = model;
        }
        if let Ok(api_base) = std::env::var("OPENAI_API_BASE") {
            config.api_base = Some(api_base);
        }
        if let Ok(max_tokens) = std::env::var("OPENAI_MAX_TOKENS") {
            config.max_tokens = max_tokens.parse().ok();
        }
        if let Ok(count) = std::env::var("SHAI_SUGGESTION_COUNT") {
            if let Ok(count) = count.parse() {
                config.suggestion_count = count;
            }
        }
        if let Ok(skip) = std::env::var("SHAI_SKIP_CONFIRM") {
            config.skip_confirm = is_truthy(&skip);
        }
        if let Ok(ctx) = std::env::var("CTX") {
            config.context_mode = is_truthy(&ctx);
        }
        if std::env::var("SHAI_USE_MOCK").is_ok() {
            config.use_mock = true;
        }

        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            info!("Loaded config from: {}", path.display());
            Ok(config)
        } else {
            Err(anyhow!("Config file not found"))
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        info!("Saved config to: {}", config_path.display());
        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        let home = home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(".config").join("shell-ai").join("config.toml"))
    }

    /// Set API key and save config
    pub fn set_api_key(&mut self, api_key: String) -> Result<()> {
        self.openai_api_key = Some(api_key);
        self.save()?;
        info!("API key saved to config file");
        Ok(())
    }

    pub fn is_mock_mode(&self) -> bool {
        self.use_mock
    }

    /// Error shown when no credential is available outside mock mode.
    pub fn missing_api_key_error() -> anyhow::Error {
        anyhow!(
            "No OpenAI API key found. Please set it using one of these methods:

1. Set API key in config:
   shai --set-api-key sk-your-key-here

2. Set environment variable:
   export OPENAI_API_KEY=sk-your-key-here

3. Check current config:
   shai --config

Get your API key from: https://platform.openai.com/account/api-keys"
        )
    }

    pub fn show_config_info() -> Result<()> {
        let config_path = Self::get_config_path()?;
        println!("Configuration file: {}", config_path.display());

        if config_path.exists() {
            println!("Status: Found");
            let config = Self::load_from_path(&config_path)?;
            println!(
                "API Key: {}",
                if config.openai_api_key.is_some() { "Set" } else { "Not set" }
            );
            println!("Model: {}", config.model);
            println!("Suggestion count: {}", config.suggestion_count);
            println!("Context mode: {}", config.context_mode);
        } else {
            println!("Status: Not found (using defaults)");
        }

        println!("\nTo set API key:");
        println!("  shai --set-api-key <your-key>");
        println!("\nOr set environment variable:");
        println!("  export OPENAI_API_KEY=<your-key>");

        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
