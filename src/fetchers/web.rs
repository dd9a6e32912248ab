use crate::config::WebDriverFetcherConfig;
use crate::fetchers::{FetchError, Fetcher};
use crate::results::FetchedPage;
use fantoccini::{Client, ClientBuilder};
use std::time::Duration;
use tokio::time::timeout;

/// Common local WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Renders pages in a browser driven over WebDriver
pub struct WebDriverFetcher {
    webdriver_url: String,
    budget: Duration,
}

impl WebDriverFetcher {
    pub fn new(config: &WebDriverFetcherConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            budget: Duration::from_millis(config.max_timeout_ms),
        }
    }
}

impl Fetcher for WebDriverFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        ::log::info!("Fetching {} through WebDriver", url);
        let start = std::time::Instant::now();

        // Connecting and loading share one wait budget
        let client = timeout(self.budget, connect_to_webdriver(&self.webdriver_url))
            .await
            .map_err(|_| FetchError::Timeout(self.budget))?
            .ok_or_else(|| FetchError::WebDriver("no WebDriver server reachable".to_string()))?;

        let remaining = self.budget.saturating_sub(start.elapsed());
        let result = timeout(remaining, load(&client, url)).await;

        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }

        let page = result.map_err(|_| FetchError::Timeout(self.budget))??;
        ::log::debug!(
            "Rendered {} in {:.2} seconds",
            page.url,
            start.elapsed().as_secs_f64()
        );
        Ok(page)
    }
}

/// Navigates to `url` and reads back the rendered source
async fn load(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    client
        .goto(url)
        .await
        .map_err(|e| navigation_error(e, "accessing", url))?;

    let html = client
        .source()
        .await
        .map_err(|e| navigation_error(e, "getting source for", url))?;

    // Redirects are only visible through the browser's current URL
    let resolved = match client.current_url().await {
        Ok(current) => current.to_string(),
        Err(e) => {
            ::log::debug!("Could not read current URL, keeping {}: {}", url, e);
            url.to_string()
        }
    };

    Ok(FetchedPage {
        url: resolved,
        html,
    })
}

/// Connects to the WebDriver instance, falling back to well-known local ports
async fn connect_to_webdriver(webdriver_url: &str) -> Option<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Some(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    for url in FALLBACK_URLS.iter().filter(|url| **url != webdriver_url) {
        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Some(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    None
}

fn navigation_error(error: fantoccini::error::CmdError, context: &str, url: &str) -> FetchError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost session while {} {}", context, url);
    }
    FetchError::WebDriver(format!("failed {} {}: {}", context, url, error))
}
