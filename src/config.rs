//! Configuration loading from TOML with environment variable overrides.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! field has a default, so a missing file means "run with defaults".
//! Snapshot paths can be overridden per game through
//! `MEGASURP_CACHE_PATH` / `LOTOFACIL_CACHE_PATH` (see
//! [`crate::storage::SnapshotCache::from_config`]); the seed through
//! `SURPRESINHAS_SEED`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fetcher::guidi::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::types::Game;

pub const SEED_ENV: &str = "SURPRESINHAS_SEED";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for `cache_<game>.json`. Defaults to the user data dir.
    pub cache_dir: Option<PathBuf>,
    pub history_dir: Option<PathBuf>,
    pub save_history: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            history_dir: None,
            save_history: true,
        }
    }
}

/// What a run of the binary generates.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    pub game: Game,
    /// Number of combinations.
    pub surpresinhas: usize,
    /// Numbers per combination.
    pub dezenas: usize,
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            game: Game::MegaSena,
            surpresinhas: 3,
            dezenas: 6,
            seed: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Like [`AppConfig::load`], but a missing file yields the defaults.
    /// A present-but-invalid file is still an error.
    pub fn load_or_default(path: &str) -> Result<Self> {
        let mut cfg = if Path::new(path).exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `SURPRESINHAS_SEED` if set. An empty value means "no seed".
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(SEED_ENV) {
            let raw = raw.trim();
            self.generation.seed = if raw.is_empty() {
                None
            } else {
                Some(
                    raw.parse()
                        .with_context(|| format!("{SEED_ENV} is not a valid seed: {raw}"))?,
                )
            };
        }
        Ok(())
    }
}
