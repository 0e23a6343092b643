//! Configuration management for Smart Encyclopedia.
//!
//! Configuration is read from `~/.config/smart-encyclopedia/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! A couple of API settings can also be overridden from the environment.

use std::fs;
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::gateway::proxy::Platform;

/// Environment variable overriding [`ApiConfig::api_base`].
pub const ENV_API_BASE: &str = "SMART_ENCYCLOPEDIA_API_BASE";
/// Environment variable overriding [`ApiConfig::proxy_path`].
pub const ENV_WIKI_SUMMARY_PATH: &str = "SMART_ENCYCLOPEDIA_WIKI_SUMMARY_PATH";

pub const DEFAULT_PROXY_PATH: &str = "/api/wiki-summary";
pub const DEFAULT_REST_BASE: &str = "https://en.wikipedia.org/api/rest_v1";
pub const DEFAULT_SEARCH_BASE: &str = "https://en.wikipedia.org/w/rest.php/v1";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; SmartEncyclopedia/1.0; +https://smartencyclopedia.uk)";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub content: ContentConfig,
    pub api: ApiConfig,
    pub platform: PlatformConfig,
    pub edge: EdgeConfig,
}

/// Which backend answers lookups and searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Bundled or file-backed dataset, no network
    #[default]
    Local,
    /// Live Wikipedia REST API
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub mode: SourceMode,
    /// JSON dataset to load instead of the bundled one
    pub dataset: Option<PathBuf>,
    /// Allowed article categories, in display order
    pub categories: Vec<String>,
    /// Base of canonical links for local articles
    pub site_base_url: String,
    pub search_limit: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Local,
            dataset: None,
            categories: [
                "Science",
                "History",
                "Technology",
                "Space",
                "Biology",
                "People",
                "Places",
                "Events",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            site_base_url: "https://smartencyclopedia.uk".to_string(),
            search_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin of the first-party edge proxy; empty means `https://{hostname}`
    pub api_base: String,
    pub proxy_path: String,
    pub rest_base: String,
    pub search_base: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            proxy_path: DEFAULT_PROXY_PATH.to_string(),
            rest_base: DEFAULT_REST_BASE.to_string(),
            search_base: DEFAULT_SEARCH_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub kind: Platform,
    pub hostname: String,
    /// Defaults to `true` everywhere except the browser
    pub cross_origin_section_fetch: Option<bool>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            kind: Platform::Native,
            hostname: "localhost".to_string(),
            cross_origin_section_fetch: None,
        }
    }
}

impl PlatformConfig {
    pub fn supports_cross_origin_section_fetch(&self) -> bool {
        self.cross_origin_section_fetch
            .unwrap_or(!self.kind.is_browser())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub listen: SocketAddr,
    /// REST base the proxy forwards summary lookups to
    pub upstream: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8788)),
            upstream: DEFAULT_REST_BASE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path.
    ///
    /// If the default config file doesn't exist, creates one with comments.
    /// An explicit path must exist. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = Self::default_config_path()?;
                if !p.exists() {
                    Self::create_default_config(&p)?;
                    return Ok(Self::default());
                }
                p
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(base) = value(ENV_API_BASE) {
            self.api.api_base = base;
        }
        if let Some(path) = value(ENV_WIKI_SUMMARY_PATH) {
            self.api.proxy_path = path;
        }
    }

    /// Get the default config file path: `~/.config/smart-encyclopedia/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("smart-encyclopedia").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Smart Encyclopedia Configuration

[content]
# "local" serves the bundled dataset, "remote" queries Wikipedia
mode = "local"

# Load articles from a JSON file instead of the bundled dataset
# dataset = "/path/to/articles.json"

# Allowed article categories, in display order
categories = ["Science", "History", "Technology", "Space", "Biology", "People", "Places", "Events"]

# Canonical links for local articles are {site_base_url}/article/{slug}
site_base_url = "https://smartencyclopedia.uk"

search_limit = 20

[api]
# Origin of the wiki-summary proxy (empty = https://<platform.hostname>).
# Overridden by SMART_ENCYCLOPEDIA_API_BASE.
api_base = ""

# Overridden by SMART_ENCYCLOPEDIA_WIKI_SUMMARY_PATH.
proxy_path = "/api/wiki-summary"

rest_base = "https://en.wikipedia.org/api/rest_v1"
search_base = "https://en.wikipedia.org/w/rest.php/v1"
user_agent = "Mozilla/5.0 (compatible; SmartEncyclopedia/1.0; +https://smartencyclopedia.uk)"
timeout_secs = 10

[platform]
# "native" or "web"; the proxy is only used from the web on a public host
kind = "native"
hostname = "localhost"

# Fetch mobile-sections for full article bodies (default: not on web)
# cross_origin_section_fetch = true

[edge]
listen = "127.0.0.1:8788"
upstream = "https://en.wikipedia.org/api/rest_v1"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.content.mode, SourceMode::Local);
        assert_eq!(config.content.categories.len(), 8);
        assert_eq!(config.api.proxy_path, DEFAULT_PROXY_PATH);
        assert_eq!(config.platform.kind, Platform::Native);
        assert_eq!(config.edge.listen.port(), 8788);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[content]
mode = "remote"
categories = ["Concepts", "People"]

[platform]
kind = "web"
hostname = "smartencyclopedia.uk"
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.content.mode, SourceMode::Remote);
        assert_eq!(config.content.categories, vec!["Concepts", "People"]);
        assert_eq!(config.content.search_limit, 20);
        assert!(!config.platform.supports_cross_origin_section_fetch());
        assert_eq!(config.api.rest_base, DEFAULT_REST_BASE);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.content.mode, SourceMode::Local);
        assert!(config.platform.supports_cross_origin_section_fetch());
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_section_fetch_override() {
        let content = r##"
[platform]
kind = "web"
cross_origin_section_fetch = true
"##;
        let config: Config = toml::from_str(content).unwrap();
        assert!(config.platform.supports_cross_origin_section_fetch());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            ENV_API_BASE => Some("https://smartencyclopedia.uk".to_string()),
            ENV_WIKI_SUMMARY_PATH => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config.api.api_base, "https://smartencyclopedia.uk");
        assert_eq!(config.api.proxy_path, DEFAULT_PROXY_PATH);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\ntimeout_secs = 3\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.api.timeout_secs, 3);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[content]\nmode = 42\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
