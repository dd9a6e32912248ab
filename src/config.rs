use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for the rendering proxy backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyFetcherConfig {
    /// Endpoint of the rendering proxy (FlareSolverr-compatible)
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,

    /// Wait budget handed to the proxy, in milliseconds
    #[serde(default = "default_max_timeout_ms")]
    pub max_timeout_ms: u64,
}

/// Configuration for the WebDriver backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebDriverFetcherConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Wait budget for navigation plus source retrieval, in milliseconds
    #[serde(default = "default_max_timeout_ms")]
    pub max_timeout_ms: u64,
}

/// Enum containing all fetcher configuration types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FetcherConfigType {
    /// Rendering proxy
    Proxy(ProxyFetcherConfig),

    /// Local browser through WebDriver
    WebDriver(WebDriverFetcherConfig),
}

impl Default for FetcherConfigType {
    fn default() -> Self {
        FetcherConfigType::Proxy(ProxyFetcherConfig::default())
    }
}

/// Credentials and location of the WordPress REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordPressConfig {
    /// Site root, without the `/wp-json` suffix
    pub base_url: String,
    pub username: String,
    pub password: String,
}

/// How mirrored pages are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Path of the page template
    #[serde(default = "default_template")]
    pub template: String,

    #[serde(default = "default_status")]
    pub status: String,

    #[serde(default = "default_author")]
    pub author: u64,

    /// Parent of the first breadcrumb page (0 for top level)
    #[serde(default)]
    pub root_page: u64,
}

/// Which images are mirrored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Substring an image `src` must contain
    #[serde(default = "default_host_marker")]
    pub host_marker: String,

    /// Regex patterns for image URLs to drop
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Top-level configuration of a mirror run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub fetcher: FetcherConfigType,

    pub wordpress: WordPressConfig,

    #[serde(default)]
    pub page: PageConfig,

    #[serde(default)]
    pub images: ImageConfig,
}

impl MirrorConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply overrides from `FLARESOLVERR_URL`, `WEBDRIVER_URL` and `WORDPRESS_PASSWORD`
    pub fn apply_env_overrides(&mut self) {
        match &mut self.fetcher {
            FetcherConfigType::Proxy(cfg) => {
                if let Some(url) = non_empty_env("FLARESOLVERR_URL") {
                    cfg.proxy_url = url;
                }
            }
            FetcherConfigType::WebDriver(cfg) => {
                if let Some(url) = non_empty_env("WEBDRIVER_URL") {
                    cfg.webdriver_url = url;
                }
            }
        }

        if let Some(password) = non_empty_env("WORDPRESS_PASSWORD") {
            self.wordpress.password = password;
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Default value for proxy_url
fn default_proxy_url() -> String {
    "http://localhost:8191/v1".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default wait budget
fn default_max_timeout_ms() -> u64 {
    60_000
}

fn default_template() -> String {
    "templates/page_template.txt".to_string()
}

fn default_status() -> String {
    "publish".to_string()
}

fn default_author() -> u64 {
    1
}

fn default_host_marker() -> String {
    "https://addons.prestashop.com/".to_string()
}

impl Default for ProxyFetcherConfig {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            max_timeout_ms: default_max_timeout_ms(),
        }
    }
}

impl Default for WebDriverFetcherConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            max_timeout_ms: default_max_timeout_ms(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            status: default_status(),
            author: default_author(),
            root_page: 0,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            host_marker: default_host_marker(),
            exclude_patterns: Vec::new(),
        }
    }
}
