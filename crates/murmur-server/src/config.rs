use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Number of status sharer lists kept in memory. 0 disables the cache.
    pub share_cache_capacity: usize,
    pub auto_activate: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            jwt_secret: var("MURMUR_JWT_SECRET", "dev-secret-change-me"),
            db_path: PathBuf::from(var("MURMUR_DB_PATH", "murmur.db")),
            host: var("MURMUR_HOST", "0.0.0.0"),
            port: var("MURMUR_PORT", "3000")
                .parse()
                .context("MURMUR_PORT must be a port number")?,
            share_cache_capacity: var("MURMUR_SHARE_CACHE_CAPACITY", "1024")
                .parse()
                .context("MURMUR_SHARE_CACHE_CAPACITY must be a non-negative integer")?,
            auto_activate: var("MURMUR_AUTO_ACTIVATE", "false")
                .parse()
                .context("MURMUR_AUTO_ACTIVATE must be true or false")?,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}
