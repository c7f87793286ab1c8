use super::{EnrichmentConfig, GatewayConfig, LinkedInConfig, WorkflowConfig};
use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    pub api_key: Option<String>,
    /// OpenAI-compatible API root, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub default_model: Option<String>,
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,

    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    #[serde(default)]
    pub linkedin: LinkedInConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_temperature() -> f64 {
    0.7
}

pub(crate) const DEFAULT_MODEL: &str = "gpt-4o";

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let postcraft_dir = home.join(".postcraft");

        Self {
            workspace_dir: postcraft_dir.join("workspace"),
            config_path: postcraft_dir.join("config.toml"),
            api_key: None,
            base_url: default_base_url(),
            default_model: Some(DEFAULT_MODEL.to_string()),
            default_temperature: default_temperature(),
            enrichment: EnrichmentConfig::default(),
            linkedin: LinkedInConfig::default(),
            workflow: WorkflowConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_in(&home.join(".postcraft"))
    }

    /// Load `config.toml` from `dir`, writing a default one on first use.
    pub fn load_or_init_in(dir: &Path) -> Result<Self> {
        let config_path = dir.join("config.toml");

        if !dir.exists() {
            fs::create_dir_all(dir).context("Failed to create .postcraft directory")?;
            fs::create_dir_all(dir.join("workspace"))
                .context("Failed to create workspace directory")?;
        }

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path.clone_from(&config_path);
            config.workspace_dir = dir.join("workspace");
            config.validate()?;
            Ok(config)
        } else {
            let config = Self {
                config_path,
                workspace_dir: dir.join("workspace"),
                ..Self::default()
            };
            config.validate()?;
            config.save()?;
            Ok(config)
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::Validation(format!(
                "default_temperature must be within 0.0..=2.0, got {}",
                self.default_temperature
            )));
        }
        if self.enrichment.max_search_results == 0 {
            return Err(ConfigError::Validation(
                "enrichment.max_search_results must be at least 1".into(),
            ));
        }
        if self.enrichment.summary_word_cap == 0 {
            return Err(ConfigError::Validation(
                "enrichment.summary_word_cap must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn model(&self) -> &str {
        self.default_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.workspace_dir.join("runs")
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides using `lookup` as the variable source.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let first = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.trim().is_empty())
        };

        if let Some(key) = first(&["POSTCRAFT_API_KEY", "OPENAI_API_KEY"]) {
            self.api_key = Some(key);
        }

        if let Some(model) = first(&["POSTCRAFT_MODEL"]) {
            self.default_model = Some(model);
        }

        if let Some(base_url) = first(&["POSTCRAFT_BASE_URL"]) {
            self.base_url = base_url;
        }

        if let Some(workspace) = first(&["POSTCRAFT_WORKSPACE"]) {
            self.workspace_dir = PathBuf::from(workspace);
        }

        if let Some(token) = first(&["LINKEDIN_ACCESS_TOKEN"]) {
            self.linkedin.access_token = Some(token);
        }

        if let Some(urn) = first(&["LINKEDIN_PERSON_URN", "USER_URN"]) {
            self.linkedin.author_urn = Some(urn);
        }

        if let Some(port) = first(&["POSTCRAFT_GATEWAY_PORT", "PORT"])
            .and_then(|value| value.parse::<u16>().ok())
        {
            self.gateway.port = port;
        }

        if let Some(host) = first(&["POSTCRAFT_GATEWAY_HOST", "HOST"]) {
            self.gateway.host = host;
        }

        if let Some(temp) = first(&["POSTCRAFT_TEMPERATURE"])
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|temp| (0.0..=2.0).contains(temp))
        {
            self.default_temperature = temp;
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
