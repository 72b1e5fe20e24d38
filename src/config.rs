use std::{env, net::SocketAddr, num::ParseIntError, path::PathBuf};

const ENV_PREFIX: &str = "DDRAGON_SKETCH_";

const DOCS_URL: &str = "https://developer.riotgames.com/docs/lol";
const ARCHIVE_MARKER: &str = "ddragon";
const CDN_URL: &str = "https://ddragon.leagueoflegends.com/cdn";
const LANGUAGE: &str = "en_US";
const MAX_CONCURRENT_FETCHES: usize = 32;
const BIND_ADDR: &str = "127.0.0.1:3000";
const SNAPSHOT_FILE: &str = "cache.json";

#[derive(Debug, displaydoc::Display, thiserror::Error)]
pub enum ConfigError {
    /// {0} must be a positive number
    Number(String, #[source] ParseIntError),
    /// {0} must be greater than zero
    Zero(String),
    /// {0} is not a socket address
    Address(String, #[source] std::net::AddrParseError),
    /// failed to find the project cache directory
    ProjectDirs,
}

/// Where to find Data Dragon and how to run against it.
///
/// Every field can be overridden through a `DDRAGON_SKETCH_*` environment
/// variable, see [`Config::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Page scraped for the link to the latest Data Dragon tarball.
    pub docs_url: String,
    /// Substring identifying the tarball link on the docs page.
    pub archive_marker: String,
    /// Base URL the archive's member paths are resolved against.
    pub cdn_url: String,
    pub language: String,
    pub max_concurrent_fetches: usize,
    pub snapshot_path: PathBuf,
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_url: DOCS_URL.to_string(),
            archive_marker: ARCHIVE_MARKER.to_string(),
            cdn_url: CDN_URL.to_string(),
            language: LANGUAGE.to_string(),
            max_concurrent_fetches: MAX_CONCURRENT_FETCHES,
            snapshot_path: PathBuf::from(SNAPSHOT_FILE),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// The snapshot lives in the platform cache directory unless
    /// `DDRAGON_SKETCH_SNAPSHOT` says otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let defaults = Self::default();

        let max_concurrent_fetches = match var("MAX_FETCHES") {
            None => defaults.max_concurrent_fetches,
            Some(raw) => {
                let max: usize = raw
                    .trim()
                    .parse()
                    .map_err(|err| ConfigError::Number(format!("{ENV_PREFIX}MAX_FETCHES"), err))?;
                if max == 0 {
                    return Err(ConfigError::Zero(format!("{ENV_PREFIX}MAX_FETCHES")));
                }
                max
            }
        };

        let bind_addr = var("BIND")
            .unwrap_or_else(|| BIND_ADDR.to_string())
            .trim()
            .parse()
            .map_err(|err| ConfigError::Address(format!("{ENV_PREFIX}BIND"), err))?;

        let snapshot_path = match var("SNAPSHOT") {
            Some(path) => PathBuf::from(path),
            None => default_snapshot_path().ok_or(ConfigError::ProjectDirs)?,
        };

        Ok(Self {
            docs_url: var("DOCS_URL").unwrap_or(defaults.docs_url),
            archive_marker: var("ARCHIVE_MARKER").unwrap_or(defaults.archive_marker),
            cdn_url: var("CDN_URL").unwrap_or(defaults.cdn_url),
            language: var("LANGUAGE").unwrap_or(defaults.language),
            max_concurrent_fetches,
            snapshot_path,
            bind_addr,
        })
    }
}

fn default_snapshot_path() -> Option<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", "ddragon-sketch")?;
    Some(proj_dirs.cache_dir().join(SNAPSHOT_FILE))
}
