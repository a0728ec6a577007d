//! Configuration management for Studynotes
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    CONFIG_GENERATED, DEFAULT_API_KEY_ENV, DEFAULT_BACKEND_URL, DEFAULT_CATEGORY_IMAGE_BUCKET,
    DEFAULT_NOTE_IMAGE_BUCKET, DEFAULT_REQUEST_TIMEOUT_SECS, SIDEBAR_DEFAULT_WIDTH, SIDEBAR_MAX_WIDTH,
    SIDEBAR_MIN_WIDTH,
};
use crate::icons::IconTheme;
use crate::utils::datetime;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Views that can be opened on startup
pub const START_VIEWS: [&str; 4] = ["notes", "favorites", "categories", "study_plan"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub ui: UiConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// Remote backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend type: "supabase" for the hosted service, "memory" for an offline demo
    pub backend_type: String,
    /// Project URL, e.g. https://<project>.supabase.co
    pub url: String,
    /// Name of the environment variable holding the public (anon) API key
    pub api_key_env: String,
    /// Bucket receiving note images
    pub note_image_bucket: String,
    /// Bucket receiving category cover images
    pub category_image_bucket: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Keep the signed-in session on disk so the next start skips the login screen
    pub persist: bool,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// View to open after login
    /// Options: "notes", "favorites", "categories", "study_plan"
    pub start_view: String,
    /// Sidebar width in columns
    pub sidebar_width: u16,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Date format for note and study plan dates
    pub date_format: String,
    /// Show the first line of a note's content in the list view
    pub show_content_preview: bool,
    /// Icon theme: "emoji", "unicode" or "ascii"
    pub icon_theme: IconTheme,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging to a file
    pub enabled: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend_type: "supabase".to_string(),
            url: DEFAULT_BACKEND_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            note_image_bucket: DEFAULT_NOTE_IMAGE_BUCKET.to_string(),
            category_image_bucket: DEFAULT_CATEGORY_IMAGE_BUCKET.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { persist: true }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            start_view: "notes".to_string(),
            sidebar_width: SIDEBAR_DEFAULT_WIDTH,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: datetime::DATE_FORMAT.to_string(),
            show_content_preview: true,
            icon_theme: IconTheme::default(),
        }
    }
}

impl BackendConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|key| !key.is_empty())
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("studynotes.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("studynotes").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.ui.sidebar_width < SIDEBAR_MIN_WIDTH || self.ui.sidebar_width > SIDEBAR_MAX_WIDTH {
            anyhow::bail!(
                "sidebar_width must be between {} and {} columns, got {}",
                SIDEBAR_MIN_WIDTH,
                SIDEBAR_MAX_WIDTH,
                self.ui.sidebar_width
            );
        }

        if !START_VIEWS.contains(&self.ui.start_view.as_str()) {
            anyhow::bail!(
                "start_view '{}' is not one of: {}",
                self.ui.start_view,
                START_VIEWS.join(", ")
            );
        }

        if !datetime::is_valid_output_format(&self.display.date_format) {
            anyhow::bail!("Invalid date_format '{}'", self.display.date_format);
        }

        self.validate_backend()?;

        Ok(())
    }

    /// Validate the backend section
    fn validate_backend(&self) -> Result<()> {
        let backend = &self.backend;

        if backend.request_timeout_secs == 0 || backend.request_timeout_secs > 300 {
            anyhow::bail!(
                "request_timeout_secs must be between 1 and 300, got {}",
                backend.request_timeout_secs
            );
        }

        if backend.note_image_bucket.is_empty() || backend.category_image_bucket.is_empty() {
            anyhow::bail!("Storage bucket names cannot be empty");
        }

        match backend.backend_type.as_str() {
            "supabase" => {
                if backend.url.is_empty() {
                    anyhow::bail!("Backend 'supabase': url cannot be empty");
                }
                if !backend.url.starts_with("http://") && !backend.url.starts_with("https://") {
                    anyhow::bail!("Backend 'supabase': url must start with http:// or https://, got '{}'", backend.url);
                }
                if backend.api_key_env.is_empty() {
                    anyhow::bail!("Backend 'supabase': api_key_env cannot be empty");
                }
            }
            "memory" => {}
            backend_type => {
                anyhow::bail!("Unsupported backend_type '{}'", backend_type);
            }
        }

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        let header = format!(
            "# Studynotes Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format(datetime::DATE_FORMAT)
        );

        let full_content = header + &toml_content;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("studynotes"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
