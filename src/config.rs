use crate::cache::CacheTtls;
use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Key for the Steam Web API. Required.
    pub steam_api_key: String,
    /// Directory holding `fonts/`, `icons/` and `watermark.svg` (default: `assets`).
    pub assets_dir: PathBuf,
    pub cache_ttls: CacheTtls,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// | Env Var                  | Default   |
    /// |--------------------------|-----------|
    /// | `HOST`                   | `0.0.0.0` |
    /// | `PORT`                   | `3000`    |
    /// | `STEAM_API_KEY`          | required  |
    /// | `ASSETS_DIR`             | `assets`  |
    /// | `CACHE_TTL_PROFILE_SECS` | `3600`    |
    /// | `CACHE_TTL_AVATAR_SECS`  | `86400`   |
    /// | `CACHE_TTL_STEAMID_SECS` | `604800`  |
    /// | `CACHE_TTL_LIBRARY_SECS` | `21600`   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration reading each variable through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = CacheTtls::default();
        let ttl = |name: &'static str, default: Duration| {
            parse_or(var(name), name, default.as_secs()).map(Duration::from_secs)
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(var("PORT"), "PORT", 3000)?,
            steam_api_key: var("STEAM_API_KEY").ok_or(ConfigError::Missing("STEAM_API_KEY"))?,
            assets_dir: var("ASSETS_DIR").map_or_else(|| PathBuf::from("assets"), PathBuf::from),
            cache_ttls: CacheTtls {
                profile: ttl("CACHE_TTL_PROFILE_SECS", defaults.profile)?,
                avatar: ttl("CACHE_TTL_AVATAR_SECS", defaults.avatar)?,
                steamid: ttl("CACHE_TTL_STEAMID_SECS", defaults.steamid)?,
                library: ttl("CACHE_TTL_LIBRARY_SECS", defaults.library)?,
            },
        })
    }

    /// Address to bind, e.g. `0.0.0.0:3000`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
{
    match value {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value,
        }),
        None => Ok(default),
    }
}
