use crate::wordpress::{ContentStore, MediaAsset, PageDraft, StoreError};
use std::collections::HashSet;
use tokio::sync::Mutex;

/// A page held by the in-memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPage {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub status: String,
    pub author: u64,
    pub parent: u64,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    pages: Vec<StoredPage>,
    media: Vec<MediaAsset>,
}

impl State {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process content store used for dry runs and tests.
///
/// Pages and media share one id sequence, as in WordPress where both are
/// posts. Titles and image URLs can be marked as failing to simulate host
/// errors.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    failing_titles: HashSet<String>,
    failing_images: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write of a page with this title fail
    pub fn with_failing_title(mut self, title: &str) -> Self {
        self.failing_titles.insert(title.to_string());
        self
    }

    /// Make uploads of this image URL fail
    pub fn with_failing_image(mut self, url: &str) -> Self {
        self.failing_images.insert(url.to_string());
        self
    }

    /// Snapshot of every stored page, in creation order
    pub async fn pages(&self) -> Vec<StoredPage> {
        self.state.lock().await.pages.clone()
    }

    /// Snapshot of every uploaded image, in upload order
    pub async fn media(&self) -> Vec<MediaAsset> {
        self.state.lock().await.media.clone()
    }

    /// Insert an existing page directly
    pub async fn seed_page(&self, title: &str, parent: u64) -> u64 {
        let mut state = self.state.lock().await;
        let id = state.allocate();
        state.pages.push(StoredPage {
            id,
            title: title.to_string(),
            content: String::new(),
            status: "publish".to_string(),
            author: 1,
            parent,
        });
        id
    }

    fn check_writable(&self, page: &PageDraft) -> Result<(), StoreError> {
        if self.failing_titles.contains(&page.title) {
            return Err(StoreError::Rejected(format!(
                "write refused for '{}'",
                page.title
            )));
        }
        Ok(())
    }
}

impl ContentStore for MemoryStore {
    async fn find_page_by_title(&self, title: &str) -> Result<Option<u64>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.pages.iter().find(|p| p.title == title).map(|p| p.id))
    }

    async fn create_page(&self, page: &PageDraft) -> Result<u64, StoreError> {
        self.check_writable(page)?;

        let mut state = self.state.lock().await;
        let id = state.allocate();
        state.pages.push(StoredPage {
            id,
            title: page.title.clone(),
            content: page.content.clone(),
            status: page.status.clone(),
            author: page.author,
            parent: page.parent,
        });
        Ok(id)
    }

    async fn update_page(&self, id: u64, page: &PageDraft) -> Result<u64, StoreError> {
        self.check_writable(page)?;

        let mut state = self.state.lock().await;
        let stored = state
            .pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::Rejected(format!("no page with id {}", id)))?;
        stored.title = page.title.clone();
        stored.content = page.content.clone();
        stored.status = page.status.clone();
        stored.author = page.author;
        stored.parent = page.parent;
        Ok(id)
    }

    async fn upload_image(&self, image_url: &str) -> Result<MediaAsset, StoreError> {
        if self.failing_images.contains(image_url) {
            return Err(StoreError::Rejected(format!("download failed for {}", image_url)));
        }

        let mut state = self.state.lock().await;
        let asset = MediaAsset {
            id: state.allocate(),
            source_url: image_url.to_string(),
        };
        state.media.push(asset.clone());
        Ok(asset)
    }
}
