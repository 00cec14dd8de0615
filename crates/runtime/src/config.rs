//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;

pub const DEFAULT_CREATURES_URL: &str = "https://script.google.com/macros/s/AKfycbwIT3OS2bdCv2kkDPh6IjRRirv17iPnuttlPcY47LCHBbpNPuHF_IjVq0mCt7TkkWoW/exec?action=pokemon";
pub const DEFAULT_MOVES_URL: &str = "https://script.google.com/macros/s/AKfycbwIT3OS2bdCv2kkDPh6IjRRirv17iPnuttlPcY47LCHBbpNPuHF_IjVq0mCt7TkkWoW/exec?action=moves";
pub const DEFAULT_CONFIG_URL: &str =
    "https://raw.githubusercontent.com/Benjakronk/shima-pokedex/main/pokedex_config.json";
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://raw.githubusercontent.com/Benjakronk/shima-pokedex/main/images/";
pub const DEFAULT_ADMIN_SECRET: &str = "shimamaster";

const DAY_SECS: u64 = 24 * 60 * 60;

/// Endpoints, cache location, admin secret and freshness windows.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub creatures_url: String,
    pub moves_url: String,
    pub config_url: String,
    pub image_base_url: String,
    /// File-backed cache directory. `None` keeps the cache in memory.
    pub cache_dir: Option<PathBuf>,
    /// Serve sheet data from a saved dump instead of the network.
    pub dump_dir: Option<PathBuf>,
    pub admin_secret: String,
    /// Freshness window of cached creature and move data.
    pub data_ttl: Duration,
    /// Freshness window reported for the cached config. Loads always try remote first.
    pub config_ttl: Duration,
    /// Lifetime of an admin session, counted from login.
    pub session_ttl: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            creatures_url: DEFAULT_CREATURES_URL.to_string(),
            moves_url: DEFAULT_MOVES_URL.to_string(),
            config_url: DEFAULT_CONFIG_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            cache_dir: None,
            dump_dir: None,
            admin_secret: DEFAULT_ADMIN_SECRET.to_string(),
            data_ttl: Duration::from_secs(DAY_SECS),
            config_ttl: Duration::from_secs(5 * 60),
            session_ttl: Duration::from_secs(DAY_SECS),
        }
    }
}

impl RuntimeConfig {
    /// Reads every `DEX_*` variable, keeping the default for any that is unset
    /// or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            creatures_url: read_env("DEX_CREATURES_URL").unwrap_or(defaults.creatures_url),
            moves_url: read_env("DEX_MOVES_URL").unwrap_or(defaults.moves_url),
            config_url: read_env("DEX_CONFIG_URL").unwrap_or(defaults.config_url),
            image_base_url: read_env("DEX_IMAGE_BASE_URL").unwrap_or(defaults.image_base_url),
            cache_dir: read_env::<PathBuf>("DEX_CACHE_DIR").or_else(default_cache_dir),
            dump_dir: read_env("DEX_DUMP_DIR"),
            admin_secret: read_env("DEX_ADMIN_SECRET").unwrap_or(defaults.admin_secret),
            data_ttl: read_secs("DEX_DATA_TTL_SECS").unwrap_or(defaults.data_ttl),
            config_ttl: read_secs("DEX_CONFIG_TTL_SECS").unwrap_or(defaults.config_ttl),
            session_ttl: read_secs("DEX_SESSION_TTL_SECS").unwrap_or(defaults.session_ttl),
        }
    }
}

/// Platform cache directory, e.g. `~/.cache/dex` on Linux.
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dex").map(|dirs| dirs.cache_dir().to_path_buf())
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())?
        .parse()
        .ok()
}

fn read_secs(key: &str) -> Option<Duration> {
    read_env::<u64>(key).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_published_endpoints() {
        let config = RuntimeConfig::default();
        assert!(config.creatures_url.ends_with("action=pokemon"));
        assert!(config.moves_url.ends_with("action=moves"));
        assert_eq!(config.data_ttl, Duration::from_secs(86_400));
        assert_eq!(config.config_ttl, Duration::from_secs(300));
        assert_eq!(config.session_ttl, Duration::from_secs(86_400));
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_read_env_ignores_blank_and_unparsable_values() {
        // SAFETY: test-local variable names not read anywhere else.
        unsafe {
            env::set_var("DEX_TEST_BLANK_SECS", "  ");
            env::set_var("DEX_TEST_BAD_SECS", "soon");
            env::set_var("DEX_TEST_GOOD_SECS", "42");
        }
        assert_eq!(read_secs("DEX_TEST_BLANK_SECS"), None);
        assert_eq!(read_secs("DEX_TEST_BAD_SECS"), None);
        assert_eq!(read_secs("DEX_TEST_GOOD_SECS"), Some(Duration::from_secs(42)));
        assert_eq!(read_secs("DEX_TEST_MISSING_SECS"), None);
    }
}
