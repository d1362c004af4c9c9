use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CatalogError;
use crate::navigator::DEFAULT_PAGE_SIZE;

/// Settings for a browsing session
#[derive(Debug, Deserialize, Clone)]
pub struct NavigatorConfig {
    /// JSON feed the catalog is loaded from
    #[serde(default = "default_recipes_file")]
    pub recipes_file: PathBuf,
    /// Recipes shown per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Directory downloaded images are written to
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
    /// Image download timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with image downloads
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            recipes_file: default_recipes_file(),
            page_size: default_page_size(),
            image_dir: default_image_dir(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

// Default value functions
fn default_recipes_file() -> PathBuf {
    PathBuf::from("recipes.json")
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_image_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("recipe-navigator/{}", env!("CARGO_PKG_VERSION"))
}

impl NavigatorConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_NAVIGATOR__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_NAVIGATOR__PAGE_SIZE
    pub fn load() -> Result<Self, CatalogError> {
        let config = load_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings nothing downstream can recover from
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.page_size == 0 {
            return Err(CatalogError::InvalidPageSize(self.page_size));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Load configuration from file and environment variables without validating it
pub fn load_config() -> Result<NavigatorConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_NAVIGATOR__PAGE_SIZE
        .add_source(
            Environment::with_prefix("RECIPE_NAVIGATOR")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
