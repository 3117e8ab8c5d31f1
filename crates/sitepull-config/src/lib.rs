//! Configuration management for sitepull.
//!
//! Parses `sitepull.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values in the `[sanity]` section support environment variable
//! expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! ```toml
//! [sanity]
//! project_id = "${SANITY_PROJECT_ID}"
//! token = "${SANITY_TOKEN:-}"
//! dataset = "production"
//!
//! [site]
//! generator = "hugo"
//! output_dir = "site"
//! ```

mod expand;

use serde::Deserialize;
use sitepull_core::Generator;
use std::path::{Path, PathBuf};

use crate::expand::{expand_env, expand_opt};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content store project id.
    pub project_id: Option<String>,
    /// Override read token.
    pub token: Option<String>,
    /// Override dataset name.
    pub dataset: Option<String>,
    /// Override API version.
    pub api_version: Option<String>,
    /// Override target site generator.
    pub generator: Option<Generator>,
    /// Override preview (draft overlay) flag.
    pub preview: Option<bool>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sitepull.toml";

/// Dataset used when none is configured.
const DEFAULT_DATASET: &str = "production";

/// API version used when none is configured.
const DEFAULT_API_VERSION: &str = "v2021-10-21";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content store connection settings.
    pub sanity: SanityConfig,
    /// Site settings (output dir is a relative string from TOML).
    site: SiteConfigRaw,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Content store connection settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    /// Project identifier.
    pub project_id: Option<String>,
    /// Read token, needed for drafts and private datasets.
    pub token: Option<String>,
    /// Dataset name.
    pub dataset: String,
    /// Dated API version.
    pub api_version: String,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            token: None,
            dataset: DEFAULT_DATASET.to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
        }
    }
}

/// Raw site configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    generator: Option<Generator>,
    output_dir: Option<String>,
    preview: Option<bool>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Target site generator, if configured.
    pub generator: Option<Generator>,
    /// Directory output files are written under.
    pub output_dir: PathBuf,
    /// Overlay drafts on top of published documents.
    pub preview: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`sanity.token`").
        field: String,
        /// Error message (e.g., "${`SANITY_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sitepull.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(project_id) = &settings.project_id {
            self.sanity.project_id = Some(project_id.clone());
        }
        if let Some(token) = &settings.token {
            self.sanity.token = Some(token.clone());
        }
        if let Some(dataset) = &settings.dataset {
            self.sanity.dataset.clone_from(dataset);
        }
        if let Some(api_version) = &settings.api_version {
            self.sanity.api_version.clone_from(api_version);
        }
        if let Some(generator) = settings.generator {
            self.site_resolved.generator = Some(generator);
        }
        if let Some(preview) = settings.preview {
            self.site_resolved.preview = preview;
        }
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.output_dir.clone_from(output_dir);
        }
    }

    /// Get the configured project id.
    ///
    /// Use this instead of reading `sanity.project_id` directly when the
    /// command talks to the content store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no project id is configured.
    pub fn require_project_id(&self) -> Result<&str, ConfigError> {
        let project_id = self.sanity.project_id.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "sanity.project_id required (set it in sitepull.toml or pass --project-id)".into(),
            )
        })?;
        require_non_empty(project_id, "sanity.project_id")?;
        Ok(project_id)
    }

    /// Get the configured site generator.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no generator is configured.
    pub fn require_generator(&self) -> Result<Generator, ConfigError> {
        self.site_resolved.generator.ok_or_else(|| {
            ConfigError::Validation(
                "site.generator required (one of jekyll, hugo, gatsby)".into(),
            )
        })
    }

    /// Read token, if one is configured and non-empty.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.sanity.token.as_deref().filter(|t| !t.is_empty())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            sanity: SanityConfig::default(),
            site: SiteConfigRaw::default(),
            site_resolved: SiteConfig {
                generator: None,
                output_dir: base.to_path_buf(),
                preview: false,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI settings
    /// are applied. The project id and generator are only required by the
    /// commands that need them, see [`Config::require_project_id`] and
    /// [`Config::require_generator`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.sanity.dataset, "sanity.dataset")?;
        require_non_empty(&self.sanity.api_version, "sanity.api_version")?;
        if !self.sanity.api_version.starts_with('v') {
            return Err(ConfigError::Validation(format!(
                "sanity.api_version must look like v2021-10-21, got '{}'",
                self.sanity.api_version
            )));
        }
        Ok(())
    }

    /// Expand environment variables in the `[sanity]` section.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand_opt(&mut self.sanity.project_id, "sanity.project_id")?;
        expand_opt(&mut self.sanity.token, "sanity.token")?;
        self.sanity.dataset = expand_env(&self.sanity.dataset, "sanity.dataset")?;
        self.sanity.api_version = expand_env(&self.sanity.api_version, "sanity.api_version")?;
        Ok(())
    }

    /// Resolve relative paths against the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let output_dir = match &self.site.output_dir {
            Some(dir) => config_dir.join(dir),
            None => config_dir.to_path_buf(),
        };
        self.site_resolved = SiteConfig {
            generator: self.site.generator,
            output_dir,
            preview: self.site.preview.unwrap_or(false),
        };
    }
}
