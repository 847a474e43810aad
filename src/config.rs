use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::step::StepSettings;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Per-wizard settings keyed by wizard name
    #[serde(default)]
    pub wizards: BTreeMap<String, WizardConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally visible base URL used to build redirect targets
    /// (defaults to `http://{host}:{port}`)
    #[serde(default)]
    pub public_url: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7010
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
        }
    }
}

impl ServerConfig {
    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a file in `dir` instead of stderr
    #[serde(default)]
    pub to_file: bool,

    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
            dir: default_log_dir(),
        }
    }
}

/// Settings for one wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WizardConfig {
    /// Show the first step when no step is requested
    /// (false = first incomplete step)
    #[serde(default = "default_true")]
    pub first_step_as_default: bool,
    /// Redirect to the first incomplete step before the requested one
    #[serde(default = "default_true")]
    pub adjust_step: bool,
    /// Page under the content URL shown after the wizard completes
    #[serde(default)]
    pub confirmation_page_name: Option<String>,
    /// Menu CSS class of the selected step
    #[serde(default = "default_css_active")]
    pub css_active: String,
    /// Menu CSS class of the other steps (none skips the class)
    #[serde(default)]
    pub css_inactive: Option<String>,
    /// Step overrides keyed by step name
    #[serde(default)]
    pub steps: BTreeMap<String, StepOverrides>,
}

fn default_true() -> bool {
    true
}

fn default_css_active() -> String {
    "selected".to_string()
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            first_step_as_default: true,
            adjust_step: true,
            confirmation_page_name: None,
            css_active: default_css_active(),
            css_inactive: None,
            steps: BTreeMap::new(),
        }
    }
}

/// Registration-time changes to a step; unset keys keep the step's own value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepOverrides {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub weight: Option<i32>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub handle_apply_on_back: Option<bool>,
    #[serde(default)]
    pub handle_apply_on_next: Option<bool>,
    #[serde(default)]
    pub handle_apply_on_complete: Option<bool>,
    #[serde(default)]
    pub apply_button: Option<bool>,
}

impl StepOverrides {
    pub fn apply_to(&self, settings: &mut StepSettings) {
        if let Some(ref label) = self.label {
            settings.label = label.clone();
        }
        if let Some(weight) = self.weight {
            settings.weight = weight;
        }
        if let Some(available) = self.available {
            settings.available = available;
        }
        if let Some(visible) = self.visible {
            settings.visible = visible;
        }
        if let Some(apply) = self.handle_apply_on_back {
            settings.handle_apply_on_back = apply;
        }
        if let Some(apply) = self.handle_apply_on_next {
            settings.handle_apply_on_next = apply;
        }
        if let Some(apply) = self.handle_apply_on_complete {
            settings.handle_apply_on_complete = apply;
        }
        if let Some(button) = self.apply_button {
            settings.apply_button = button;
        }
    }
}

impl Config {
    /// Project-local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("formwizard.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so formwizard works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/formwizard/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("formwizard").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with FORMWIZARD_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("FORMWIZARD")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Write the config as TOML
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to the log directory
    pub fn logs_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.logging.dir);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }
}
