//! Environment-driven service configuration.

use std::net::SocketAddr;

use anyhow::{Context, bail};

use sellerhub_observability::LogFormat;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Where records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Process-local maps; everything is lost on restart.
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    /// Base for absolute link hrefs. When unset, links are built from the
    /// request's `Host` header.
    pub public_base_url: Option<String>,
    /// Put the raw fault text in 500 bodies (otherwise a generic message).
    pub expose_fault_details: bool,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            storage: StorageConfig::InMemory,
            public_base_url: None,
            expose_fault_details: true,
            log_format: LogFormat::Json,
        }
    }
}

impl ApiConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:8080")?;

        let use_persistent = parse_flag("USE_PERSISTENT_STORES", get("USE_PERSISTENT_STORES"), false)?;
        let storage = if use_persistent {
            let database_url = get("DATABASE_URL")
                .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;
            StorageConfig::Postgres { database_url }
        } else {
            StorageConfig::InMemory
        };

        let public_base_url = get("PUBLIC_BASE_URL").map(|url| url.trim_end_matches('/').to_string());

        let expose_fault_details =
            parse_flag("EXPOSE_FAULT_DETAILS", get("EXPOSE_FAULT_DETAILS"), true)?;

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(anyhow::Error::msg)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            storage,
            public_base_url,
            expose_fault_details,
            log_format,
        })
    }
}

fn parse_flag(key: &str, raw: Option<String>, default: bool) -> anyhow::Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("{key} must be true or false, got `{other}`"),
    }
}
