//! Runtime configuration, read from `TRADEDESK_*` environment variables.

use crate::application::trade_editor::DEFAULT_FETCH_PAGE_SIZE;
use crate::domain::error::DomainError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreKind {
    #[default]
    Memory,
    Sqlite,
    Http,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Memory => write!(f, "memory"),
            StoreKind::Sqlite => write!(f, "sqlite"),
            StoreKind::Http => write!(f, "http"),
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "sqlite" => Ok(StoreKind::Sqlite),
            "http" => Ok(StoreKind::Http),
            _ => Err(format!("Unknown store kind: {s} (expected memory, sqlite or http)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreKind,
    pub db_path: String,
    pub base_url: String,
    pub http_timeout: Duration,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub fetch_page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::Memory,
            db_path: "./tradedesk.db".into(),
            base_url: "http://127.0.0.1:3000".into(),
            http_timeout: Duration::from_secs(10),
            log_level: "info".into(),
            log_dir: None,
            fetch_page_size: DEFAULT_FETCH_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("TRADEDESK_STORE") {
            cfg.store = v.parse().map_err(DomainError::InvalidInput)?;
        }
        if let Some(v) = get("TRADEDESK_DB") {
            cfg.db_path = v;
        }
        if let Some(v) = get("TRADEDESK_URL") {
            cfg.base_url = v;
        }
        if let Some(v) = get("TRADEDESK_HTTP_TIMEOUT_SECS") {
            let secs: u64 = v.trim().parse().map_err(|_| {
                DomainError::InvalidInput(format!("TRADEDESK_HTTP_TIMEOUT_SECS must be an integer, got {v}"))
            })?;
            cfg.http_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get("TRADEDESK_LOG") {
            cfg.log_level = v;
        }
        cfg.log_dir = get("TRADEDESK_LOG_DIR");
        if let Some(v) = get("TRADEDESK_FETCH_PAGE_SIZE") {
            cfg.fetch_page_size = v
                .trim()
                .parse()
                .ok()
                .filter(|n: &usize| *n > 0)
                .ok_or_else(|| {
                    DomainError::InvalidInput(format!(
                        "TRADEDESK_FETCH_PAGE_SIZE must be a positive integer, got {v}"
                    ))
                })?;
        }
        Ok(cfg)
    }
}
