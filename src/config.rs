//! Configuration for the Stackforge CLI.
//!
//! Handles loading and merging configuration from multiple sources:
//! - Default values
//! - Project configuration (./stackforge.toml)
//! - An explicit `--config` path
//! - Environment variables (`STACKFORGE_*`)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use stackforge::blueprints::WordPressParams;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Synthesis settings
    pub synth: SynthConfig,

    /// Blueprint parameter overrides
    pub wordpress: WordPressConfig,
}

/// Synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Assembly output directory
    pub output_dir: PathBuf,

    /// Target region recorded in the manifest
    pub region: Option<String>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            output_dir: PathBuf::from("stackforge.out"),
            region: None,
        }
    }
}

/// Overrides for the WordPress blueprint. Unset fields keep the blueprint's
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WordPressConfig {
    pub stack_name: Option<String>,
    pub vpc_cidr: Option<String>,
    pub instance_type: Option<String>,
    pub image_id: Option<String>,
    pub db_instance_class: Option<String>,
    pub db_name: Option<String>,
    pub db_username: Option<String>,
    pub db_password: Option<String>,
}

impl Config {
    /// Loads configuration: defaults, then `./stackforge.toml` (or the
    /// explicit path), then environment overrides.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Config::default();

        let path = match config_path {
            Some(explicit) => Some(explicit.clone()),
            None => {
                let project = PathBuf::from("stackforge.toml");
                project.exists().then_some(project)
            }
        };
        if let Some(path) = path {
            config = Self::from_file(&path)?;
        }

        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    /// Applies `STACKFORGE_*` environment variables on top of file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("STACKFORGE_OUTPUT_DIR") {
            self.synth.output_dir = PathBuf::from(dir);
        }
        if let Ok(region) = std::env::var("STACKFORGE_REGION") {
            self.synth.region = Some(region);
        }
        if let Ok(name) = std::env::var("STACKFORGE_STACK_NAME") {
            self.wordpress.stack_name = Some(name);
        }
        if let Ok(image_id) = std::env::var("STACKFORGE_IMAGE_ID") {
            self.wordpress.image_id = Some(image_id);
        }
        if let Ok(username) = std::env::var("STACKFORGE_DB_USERNAME") {
            self.wordpress.db_username = Some(username);
        }
        if let Ok(password) = std::env::var("STACKFORGE_DB_PASSWORD") {
            self.wordpress.db_password = Some(password);
        }
    }

    /// Resolves the effective blueprint parameters.
    pub fn wordpress_params(&self) -> WordPressParams {
        let mut params = WordPressParams::default();
        let overrides = &self.wordpress;
        if let Some(name) = &overrides.stack_name {
            params.stack_name = name.clone();
        }
        if let Some(cidr) = &overrides.vpc_cidr {
            params.vpc_cidr = cidr.clone();
        }
        if let Some(instance_type) = &overrides.instance_type {
            params.instance_type = instance_type.clone();
        }
        if let Some(image_id) = &overrides.image_id {
            params.image_id = image_id.clone();
        }
        if let Some(class) = &overrides.db_instance_class {
            params.db_instance_class = class.clone();
        }
        if let Some(name) = &overrides.db_name {
            params.db_name = name.clone();
        }
        if let Some(username) = &overrides.db_username {
            params.db_username = username.clone();
        }
        if let Some(password) = &overrides.db_password {
            params.db_password = password.clone();
        }
        params
    }
}
