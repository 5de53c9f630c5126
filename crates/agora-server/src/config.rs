use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::info;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
    /// When set, CORS is restricted to this origin (with credentials).
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            host: load(&lookup, "AGORA_HOST", "0.0.0.0")?,
            port: load(&lookup, "AGORA_PORT", "10000")?,
            db_path: load(&lookup, "AGORA_DB_PATH", "agora.db")?,
            static_dir: load(&lookup, "AGORA_STATIC_DIR", "frontend")?,
            cors_origin: lookup("AGORA_CORS_ORIGIN").filter(|v| !v.is_empty()),
        })
    }
}

fn load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw}"))
}
