use addons_mirror::config::{FetcherConfigType, ProxyFetcherConfig, WebDriverFetcherConfig};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "addons-mirror")]
#[command(about = "Mirror a PrestaShop Addons product page into WordPress pages")]
#[command(version)]
pub struct Args {
    /// Product page URL to mirror
    pub url: String,

    /// JSON configuration file
    #[arg(short, long, default_value = "mirror.json")]
    pub config: String,

    /// Fetch backend, overriding the configured one
    #[arg(short, long, value_enum)]
    pub fetcher: Option<FetcherArg>,

    /// Parent page id of the first breadcrumb level
    #[arg(long)]
    pub root_page: Option<u64>,

    /// Page template path, overriding the configured one
    #[arg(short, long)]
    pub template: Option<String>,

    /// Write into an in-memory store and print the resulting pages
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FetcherArg {
    Proxy,
    Webdriver,
}

/// Swap the configured backend for the one named on the command line,
/// keeping the configured settings when the type already matches
pub fn convert_fetcher(arg: FetcherArg, configured: FetcherConfigType) -> FetcherConfigType {
    match (arg, configured) {
        (FetcherArg::Proxy, cfg @ FetcherConfigType::Proxy(_)) => cfg,
        (FetcherArg::Webdriver, cfg @ FetcherConfigType::WebDriver(_)) => cfg,
        (FetcherArg::Proxy, _) => FetcherConfigType::Proxy(ProxyFetcherConfig::default()),
        (FetcherArg::Webdriver, _) => {
            FetcherConfigType::WebDriver(WebDriverFetcherConfig::default())
        }
    }
}
