pub mod client;
pub mod memory;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub use client::WordPressClient;
pub use memory::MemoryStore;

/// Page fields sent on create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDraft {
    pub title: String,
    pub content: String,
    pub status: String,
    pub author: u64,
    /// Parent page id, 0 for a top-level page
    pub parent: u64,
}

/// An uploaded image registered in the media library
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaAsset {
    pub id: u64,
    pub source_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation} answered {status}: {body}")]
    Status {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{0}")]
    Rejected(String),
}

/// Capabilities of the host content system used by the page upserter
#[allow(async_fn_in_trait)]
pub trait ContentStore {
    /// Id of the page whose title matches exactly, if any
    async fn find_page_by_title(&self, title: &str) -> Result<Option<u64>, StoreError>;

    /// Create a page and return its id
    async fn create_page(&self, page: &PageDraft) -> Result<u64, StoreError>;

    /// Update an existing page in place and return its id
    async fn update_page(&self, id: u64, page: &PageDraft) -> Result<u64, StoreError>;

    /// Download a remote image and register it in the media library
    async fn upload_image(&self, image_url: &str) -> Result<MediaAsset, StoreError>;
}
