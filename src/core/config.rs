//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::Project;

/// Default currency label for printed amounts
pub const DEFAULT_CURRENCY: &str = "Rp";

/// Default country calling code for phone normalization (Indonesia)
pub const DEFAULT_COUNTRY_CODE: &str = "62";

/// Baskit configuration with layered hierarchy
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default author for purchase orders
    pub author: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Default supplier sort mode
    pub default_sort: Option<String>,

    /// Currency label used when printing money
    pub currency: Option<String>,

    /// Country calling code for wa.me links
    pub country_code: Option<String>,

    /// Buyer e-mail address quoted in purchase order mails
    pub buyer_email: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        Self::load_for(Project::discover().ok().as_ref())
    }

    /// Load configuration with an already-resolved project
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessors below)

        // 2. Global user config (~/.config/baskit/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.baskit/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.baskit_dir().join("config.yaml"))
            {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(author) = std::env::var("BASKIT_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(currency) = std::env::var("BASKIT_CURRENCY") {
            config.currency = Some(currency);
        }
        if let Ok(code) = std::env::var("BASKIT_COUNTRY_CODE") {
            config.country_code = Some(code);
        }

        config
    }

    fn read_file(path: &std::path::Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "baskit")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.default_sort.is_some() {
            self.default_sort = other.default_sort;
        }
        if other.currency.is_some() {
            self.currency = other.currency;
        }
        if other.country_code.is_some() {
            self.country_code = other.country_code;
        }
        if other.buyer_email.is_some() {
            self.buyer_email = other.buyer_email;
        }
    }

    /// Get the author name, falling back to the login name
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Currency label for printed amounts
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Country calling code without a leading '+'
    pub fn country_code(&self) -> &str {
        self.country_code
            .as_deref()
            .map(|c| c.trim_start_matches('+'))
            .unwrap_or(DEFAULT_COUNTRY_CODE)
    }
}
