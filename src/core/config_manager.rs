// src/core/config_manager.rs
//! Configuration: optional config.yaml per environment, overridden by env vars

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use crate::app_log;

use crate::core::FsOps;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Single-row CSV file, overwritten on every save.
    Csv,
    /// SQLite table keeping every analysed profile.
    Database,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cv_folder: PathBuf,
    pub data_folder: PathBuf,
    pub csv_file: PathBuf,
    pub database_path: PathBuf,
    pub storage: StorageBackend,
    pub log_file: PathBuf,
    pub port: u16,
    pub openai: OpenAiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cv_folder: PathBuf::from("cv"),
            data_folder: PathBuf::from("data"),
            csv_file: PathBuf::from("data/cv_data.csv"),
            database_path: PathBuf::from("data/cv_coach.db"),
            storage: StorageBackend::Database,
            log_file: PathBuf::from("/tmp/cv_coach.log"),
            port: 8080,
            openai: OpenAiConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: Option<AppConfig>,
    production: Option<AppConfig>,
}

pub struct ConfigManager;

impl ConfigManager {
    /// Load `config.yaml` from the working directory (defaults if absent),
    /// apply environment overrides and resolve relative paths.
    pub fn load() -> Result<AppConfig> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        let environment = Self::get_environment();
        app_log!(info, "Loading configuration for environment: {}", environment);

        let mut config = Self::load_from_file(&current_dir.join(CONFIG_FILE), &environment)?;
        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(Self::resolve_paths(config, &current_dir))
    }

    fn get_environment() -> String {
        std::env::var("CVCOACH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(path: &Path, environment: &str) -> Result<AppConfig> {
        if !path.exists() {
            app_log!(info, "{} not found, using built-in defaults", path.display());
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content, environment)
    }

    fn parse(content: &str, environment: &str) -> Result<AppConfig> {
        let file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        let selected = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(selected.unwrap_or_default())
    }

    fn apply_env_overrides<F>(config: &mut AppConfig, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = var("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            config.openai.api_key = Some(key);
        }
        if let Some(url) = var("OPENAI_BASE_URL") {
            config.openai.base_url = url;
        }
        if let Some(model) = var("OPENAI_MODEL") {
            config.openai.model = model;
        }
        if let Some(port) = var("ROCKET_PORT") {
            config.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;
        }
        Ok(())
    }

    fn resolve_paths(mut config: AppConfig, base: &Path) -> AppConfig {
        config.cv_folder = FsOps::normalize_path(base, &config.cv_folder);
        config.data_folder = FsOps::normalize_path(base, &config.data_folder);
        config.csv_file = FsOps::normalize_path(base, &config.csv_file);
        config.database_path = FsOps::normalize_path(base, &config.database_path);
        config.log_file = FsOps::normalize_path(base, &config.log_file);
        config
    }
}

impl AppConfig {
    /// Ensure the folders the application reads from and writes to exist.
    pub async fn ensure_directories(&self) -> Result<()> {
        FsOps::ensure_dir_exists(&self.data_folder).await?;
        FsOps::ensure_dir_exists(&self.cv_folder).await?;
        if let Some(parent) = self.log_file.parent() {
            FsOps::ensure_dir_exists(parent).await?;
        }
        Ok(())
    }
}
