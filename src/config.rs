use std::{net::SocketAddr, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub data_dir: PathBuf,
    pub storage: StorageBackend,
    pub profiles: u32,
    pub posts_per_profile: u32,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

impl Config {
    /// Read configuration from the process environment (after `.env` is loaded).
    ///
    /// - `VIBEVERSE_ADDR`: listen address, default `127.0.0.1:3000`
    /// - `VIBEVERSE_DATA_DIR`: where file storage lives, default `./vibeverse-data`
    /// - `VIBEVERSE_STORAGE`: `file` or `memory`, default `file`
    /// - `VIBEVERSE_PROFILES` / `VIBEVERSE_POSTS_PER_PROFILE`: catalog size, default 20 / 20
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = parse(&lookup, "VIBEVERSE_ADDR")?
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));
        let data_dir = lookup("VIBEVERSE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./vibeverse-data"));

        let storage = match lookup("VIBEVERSE_STORAGE").as_deref() {
            None | Some("file") => StorageBackend::File,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "VIBEVERSE_STORAGE",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            addr,
            data_dir,
            storage,
            profiles: parse(&lookup, "VIBEVERSE_PROFILES")?.unwrap_or(20),
            posts_per_profile: parse(&lookup, "VIBEVERSE_POSTS_PER_PROFILE")?.unwrap_or(20),
        })
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
