use crate::config::ProxyFetcherConfig;
use crate::fetchers::{FetchError, Fetcher};
use crate::results::FetchedPage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Body posted to the rendering proxy
#[derive(Debug, Serialize)]
pub struct ProxyRequest<'a> {
    pub cmd: &'a str,
    pub url: &'a str,
    #[serde(rename = "maxTimeout")]
    pub max_timeout: u64,
}

/// Response envelope of the rendering proxy
#[derive(Debug, Deserialize)]
pub struct ProxyEnvelope {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub message: String,

    pub solution: Option<Solution>,
}

#[derive(Debug, Deserialize)]
pub struct Solution {
    pub url: String,
    pub response: String,
}

/// Fetches pages through a FlareSolverr-compatible rendering proxy
pub struct ProxyFetcher {
    client: Client,
    proxy_url: String,
    max_timeout_ms: u64,
}

impl ProxyFetcher {
    pub fn new(config: &ProxyFetcherConfig) -> Result<Self, FetchError> {
        // Transport timeout equals the wait budget handed to the proxy
        let client = Client::builder()
            .timeout(Duration::from_millis(config.max_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            proxy_url: config.proxy_url.clone(),
            max_timeout_ms: config.max_timeout_ms,
        })
    }
}

impl Fetcher for ProxyFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        ::log::info!("Fetching {} through {}", url, self.proxy_url);

        let request = ProxyRequest {
            cmd: "request.get",
            url,
            max_timeout: self.max_timeout_ms,
        };

        let response = self
            .client
            .post(&self.proxy_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status { status, body });
        }

        let page = decode_envelope(&body)?;
        ::log::info!("Fetched {} ({} bytes of HTML)", page.url, page.html.len());
        Ok(page)
    }
}

/// Decode the proxy envelope into a fetched page
pub fn decode_envelope(body: &str) -> Result<FetchedPage, FetchError> {
    let envelope: ProxyEnvelope = serde_json::from_str(body)?;

    match envelope.solution {
        Some(solution) => Ok(FetchedPage {
            url: solution.url,
            html: solution.response,
        }),
        None => {
            let reason = if envelope.message.is_empty() {
                format!("status '{}'", envelope.status)
            } else {
                envelope.message
            };
            Err(FetchError::MissingSolution(reason))
        }
    }
}
