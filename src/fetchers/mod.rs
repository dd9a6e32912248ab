pub mod proxy;
pub mod web;

use crate::config::FetcherConfigType;
use crate::results::FetchedPage;
use reqwest::StatusCode;
use std::time::Duration;

/// Why a page could not be fetched. Any of these ends the run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to rendering proxy failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("rendering proxy answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed proxy envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    #[error("proxy returned no solution: {0}")]
    MissingSolution(String),

    #[error("WebDriver failed: {0}")]
    WebDriver(String),

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
}

// Base trait for fetch backends
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Retrieve the rendered HTML of `url`
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// The backend selected by configuration
pub enum AnyFetcher {
    Proxy(proxy::ProxyFetcher),
    WebDriver(web::WebDriverFetcher),
}

impl AnyFetcher {
    pub fn from_config(config: &FetcherConfigType) -> Result<Self, FetchError> {
        match config {
            FetcherConfigType::Proxy(cfg) => Ok(AnyFetcher::Proxy(proxy::ProxyFetcher::new(cfg)?)),
            FetcherConfigType::WebDriver(cfg) => {
                Ok(AnyFetcher::WebDriver(web::WebDriverFetcher::new(cfg)))
            }
        }
    }
}

impl Fetcher for AnyFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        match self {
            AnyFetcher::Proxy(fetcher) => fetcher.fetch(url).await,
            AnyFetcher::WebDriver(fetcher) => fetcher.fetch(url).await,
        }
    }
}
