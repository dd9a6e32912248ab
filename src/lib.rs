// Re-export modules
pub mod config;
pub mod fetchers;
pub mod filter;
pub mod parsers;
pub mod results;
pub mod taxonomy;
pub mod template;
pub mod upsert;
pub mod utils;
pub mod wordpress;

// Re-export commonly used types for convenience
pub use fetchers::{AnyFetcher, FetchError, Fetcher};
pub use parsers::{Diagnostic, Extractor};
pub use results::{BreadcrumbEntry, FetchedPage, ProductRecord};
pub use template::Template;
pub use upsert::{PageUpserter, UpsertAction, UpsertOutcome};
pub use wordpress::{ContentStore, MemoryStore, WordPressClient};

use config::{FetcherConfigType, ImageConfig, MirrorConfig, PageConfig};
use filter::ImageFilter;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("invalid product URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("cannot read template {path:?}: {source}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid image exclude pattern: {0}")]
    Filter(#[from] regex::Error),
}

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct MirrorReport {
    pub record: ProductRecord,
    pub diagnostics: Vec<Diagnostic>,
    pub breadcrumbs: Vec<BreadcrumbEntry>,
    pub pages: Vec<UpsertOutcome>,
}

/// Main builder for mirroring one product page into the content store
pub struct Mirror {
    url: String,
    fetcher: FetcherConfigType,
    page: PageConfig,
    images: ImageConfig,
    template: Option<Template>,
}

impl Mirror {
    /// Create a new Mirror builder for the given product URL
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            fetcher: FetcherConfigType::default(),
            page: PageConfig::default(),
            images: ImageConfig::default(),
            template: None,
        }
    }

    /// Take fetcher, page and image settings from a configuration
    pub fn with_config(mut self, config: &MirrorConfig) -> Self {
        self.fetcher = config.fetcher.clone();
        self.page = config.page.clone();
        self.images = config.images.clone();
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = MirrorConfig::from_file(path)?;
        Ok(self.with_config(&config))
    }

    pub fn with_fetcher(mut self, fetcher: FetcherConfigType) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Parent id of the first breadcrumb page
    pub fn with_root_page(mut self, root_page: u64) -> Self {
        self.page.root_page = root_page;
        self
    }

    /// Read the page template from this path instead of the configured one
    pub fn with_template_file(mut self, path: &str) -> Self {
        self.page.template = path.to_string();
        self.template = None;
        self
    }

    /// Use an already loaded template
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self
    }

    pub fn fetcher_config(&self) -> &FetcherConfigType {
        &self.fetcher
    }

    /// Fetch the page with the configured backend and mirror it into `store`
    pub async fn run<S: ContentStore>(&self, store: &S) -> Result<MirrorReport, MirrorError> {
        let fetcher = AnyFetcher::from_config(&self.fetcher)?;
        self.run_with(&fetcher, store).await
    }

    /// Mirror the page using the given fetcher.
    ///
    /// A fetch failure aborts the run before anything is written. Extraction
    /// misses and write failures are reported but never stop it.
    pub async fn run_with<F: Fetcher, S: ContentStore>(
        &self,
        fetcher: &F,
        store: &S,
    ) -> Result<MirrorReport, MirrorError> {
        let url = Url::parse(&self.url)?;
        let template = self.load_template()?;
        let extractor = Extractor::new(ImageFilter::new(&self.images)?);

        ::log::info!("Fetching {}", url);
        let page = fetcher.fetch(url.as_str()).await?;

        let (extraction, breadcrumbs) = extractor.parse(&page);
        ::log::info!(
            "Extracted '{}' with {} images, {} misses, {} breadcrumb levels",
            extraction.record.title,
            extraction.record.image_urls.len(),
            extraction.diagnostics.len(),
            breadcrumbs.len()
        );
        if breadcrumbs.is_empty() {
            ::log::warn!("No breadcrumb found on {}, nothing to write", page.url);
        }

        let pages = PageUpserter::new(store, &template)
            .with_status(&self.page.status)
            .with_author(self.page.author)
            .upsert(&breadcrumbs, &extraction.record, self.page.root_page)
            .await;

        Ok(MirrorReport {
            record: extraction.record,
            diagnostics: extraction.diagnostics,
            breadcrumbs,
            pages,
        })
    }

    fn load_template(&self) -> Result<Template, MirrorError> {
        if let Some(template) = &self.template {
            return Ok(template.clone());
        }

        Template::from_file(&self.page.template).map_err(|source| MirrorError::Template {
            path: PathBuf::from(&self.page.template),
            source,
        })
    }
}
