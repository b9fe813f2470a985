use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::analysis::EngineConfig;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_size_mb: usize,
    pub max_recommendations: usize,
    pub enable_summary_generation: bool,
    pub processing_timeout_secs: u64,
    /// Overrides the bundled skill taxonomy when set.
    pub taxonomy_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_size_mb: 10,
            max_recommendations: 5,
            enable_summary_generation: true,
            processing_timeout_secs: 30,
            taxonomy_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let config = Config {
            port: parse_or("PORT", &lookup, defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_size_mb: parse_or("MAX_UPLOAD_SIZE_MB", &lookup, defaults.max_upload_size_mb)?,
            max_recommendations: parse_or(
                "MAX_RECOMMENDATIONS",
                &lookup,
                defaults.max_recommendations,
            )?,
            enable_summary_generation: match lookup("ENABLE_SUMMARY_GENERATION") {
                Some(raw) => parse_flag(&raw)
                    .context("ENABLE_SUMMARY_GENERATION must be true or false")?,
                None => defaults.enable_summary_generation,
            },
            processing_timeout_secs: parse_or(
                "PROCESSING_TIMEOUT_SECS",
                &lookup,
                defaults.processing_timeout_secs,
            )?,
            taxonomy_path: lookup("TAXONOMY_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        };

        if config.max_upload_size_mb == 0 {
            bail!("MAX_UPLOAD_SIZE_MB must be at least 1");
        }
        if config.processing_timeout_secs == 0 {
            bail!("PROCESSING_TIMEOUT_SECS must be at least 1");
        }
        Ok(config)
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_mb * 1024 * 1024
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_upload_size_bytes: self.max_upload_size_bytes(),
            max_recommendations: self.max_recommendations,
            enable_summary_generation: self.enable_summary_generation,
        }
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("unrecognized flag value '{other}'"),
    }
}
