use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub fixture_dir: PathBuf,
    pub cache_ttl: Duration,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr =
            std::env::var("DASH_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8088".to_string());

        let fixture_dir = PathBuf::from(
            std::env::var("DASH_FIXTURE_DIR").unwrap_or_else(|_| "fixtures".to_string()),
        );

        let cache_ttl_secs = get_parsed("DASH_CACHE_TTL_SECS", 300u64)?;
        let max_upload_bytes = get_parsed("DASH_MAX_UPLOAD_BYTES", 10 * 1024 * 1024usize)?;

        // Tiny sanity checks (fail fast, fail loud)
        if !bind_addr.contains(':') {
            bail!("DASH_BIND_ADDR must be host:port, got {bind_addr:?}");
        }
        if cache_ttl_secs > 24 * 60 * 60 {
            bail!("DASH_CACHE_TTL_SECS too large ({cache_ttl_secs}); max is one day");
        }
        if max_upload_bytes < 1024 {
            bail!("DASH_MAX_UPLOAD_BYTES too small ({max_upload_bytes}); min is 1024");
        }

        Ok(Self {
            bind_addr,
            fixture_dir,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            max_upload_bytes,
        })
    }
}

fn get_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("{key} is not a valid number: {raw:?}")),
        Err(_) => Ok(default),
    }
}
