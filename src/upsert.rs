use crate::results::{BreadcrumbEntry, ProductRecord};
use crate::template::Template;
use crate::wordpress::{ContentStore, PageDraft};

/// What happened to one breadcrumb level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Created,
    Updated,
    Failed,
}

/// Result of writing one breadcrumb level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub title: String,
    pub action: UpsertAction,
    /// Id handed to the next level as its parent
    pub page_id: u64,
    pub parent_id: u64,
    pub images: usize,
}

/// Writes the breadcrumb path as a chain of pages
pub struct PageUpserter<'a, S: ContentStore> {
    store: &'a S,
    template: &'a Template,
    status: String,
    author: u64,
}

impl<'a, S: ContentStore> PageUpserter<'a, S> {
    pub fn new(store: &'a S, template: &'a Template) -> Self {
        Self {
            store,
            template,
            status: "publish".to_string(),
            author: 1,
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn with_author(mut self, author: u64) -> Self {
        self.author = author;
        self
    }

    /// Walk the breadcrumbs top-down, creating or updating one page per level.
    ///
    /// Each level is attached to the id produced by the previous one, starting
    /// from `root`. Every level receives the same rendered product content.
    /// A failed level does not stop the walk: after a failed create the next
    /// level is attached to 0 (top level), after a failed update it keeps the
    /// existing page id.
    pub async fn upsert(
        &self,
        breadcrumbs: &[BreadcrumbEntry],
        record: &ProductRecord,
        root: u64,
    ) -> Vec<UpsertOutcome> {
        let mut parent = root;
        let mut outcomes = Vec::with_capacity(breadcrumbs.len());

        for crumb in breadcrumbs {
            let outcome = self.upsert_level(&crumb.name, record, parent).await;
            parent = outcome.page_id;
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn upsert_level(&self, title: &str, record: &ProductRecord, parent: u64) -> UpsertOutcome {
        let existing = match self.store.find_page_by_title(title).await {
            Ok(existing) => existing,
            Err(e) => {
                ::log::error!("Lookup of page '{}' failed: {}", title, e);
                return UpsertOutcome {
                    title: title.to_string(),
                    action: UpsertAction::Failed,
                    page_id: 0,
                    parent_id: parent,
                    images: 0,
                };
            }
        };

        let (img_tags, images) = self.upload_images(record).await;
        let page = PageDraft {
            title: title.to_string(),
            content: self.template.render(record, &img_tags),
            status: self.status.clone(),
            author: self.author,
            parent,
        };

        ::log::info!("Writing page '{}' under parent {}", title, parent);
        let (action, page_id) = match existing {
            None => match self.store.create_page(&page).await {
                Ok(id) => {
                    ::log::info!("Created page {} '{}'", id, title);
                    (UpsertAction::Created, id)
                }
                Err(e) => {
                    ::log::error!("Failed to create page '{}': {}", title, e);
                    (UpsertAction::Failed, 0)
                }
            },
            Some(id) => match self.store.update_page(id, &page).await {
                Ok(_) => {
                    ::log::info!("Updated page {} '{}'", id, title);
                    (UpsertAction::Updated, id)
                }
                Err(e) => {
                    ::log::error!("Failed to update page {} '{}': {}", id, title, e);
                    (UpsertAction::Failed, id)
                }
            },
        };

        UpsertOutcome {
            title: title.to_string(),
            action,
            page_id,
            parent_id: parent,
            images,
        }
    }

    /// Upload every record image and build the image block markers
    async fn upload_images(&self, record: &ProductRecord) -> (String, usize) {
        let mut tags = String::new();
        let mut uploaded = 0;

        for image_url in &record.image_urls {
            match self.store.upload_image(image_url).await {
                Ok(asset) => {
                    ::log::debug!("Uploaded {} as media {}", image_url, asset.id);
                    tags.push_str(&image_block(image_url, asset.id));
                    uploaded += 1;
                }
                Err(e) => {
                    ::log::warn!("Failed to upload image {}: {}", image_url, e);
                }
            }
        }

        (tags, uploaded)
    }
}

/// Image block shortcode referencing an uploaded asset
pub fn image_block(image_url: &str, asset_id: u64) -> String {
    format!(
        "[fusion_image linktarget=\"_self\" image=\"{}\" image_id=\"{}|full\" /]",
        image_url, asset_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordpress::MemoryStore;

    fn record() -> ProductRecord {
        ProductRecord {
            id_product: Some(123),
            title: "Example Module".to_string(),
            price_ht: "9.99".to_string(),
            image_urls: vec![
                "https://addons.prestashop.com/img/a.jpg".to_string(),
                "https://addons.prestashop.com/img/b.jpg".to_string(),
            ],
            ..ProductRecord::default()
        }
    }

    fn crumbs() -> Vec<BreadcrumbEntry> {
        vec![
            BreadcrumbEntry::new(1, "/2-modules", "Modules"),
            BreadcrumbEntry::new(2, "/481-paiement", "Payment"),
        ]
    }

    fn template() -> Template {
        Template::new("<h1>[TITLE]</h1>[PRICE_HT]|[IMG_TAGS]")
    }

    #[tokio::test]
    async fn test_chain_under_root() {
        let store = MemoryStore::new();
        let template = template();
        let upserter = PageUpserter::new(&store, &template);

        let outcomes = upserter.upsert(&crumbs(), &record(), 50).await;
        let pages = store.pages().await;

        assert_eq!(pages.len(), 2);
        let modules = pages.iter().find(|p| p.title == "Modules").unwrap();
        let payment = pages.iter().find(|p| p.title == "Payment").unwrap();
        assert_eq!(modules.parent, 50);
        assert_eq!(payment.parent, modules.id);

        assert_eq!(outcomes[0].action, UpsertAction::Created);
        assert_eq!(outcomes[0].page_id, modules.id);
        assert_eq!(outcomes[1].parent_id, modules.id);
        assert_eq!(outcomes[1].page_id, payment.id);
    }

    #[tokio::test]
    async fn test_every_level_gets_product_content() {
        let store = MemoryStore::new();
        let template = template();
        PageUpserter::new(&store, &template)
            .with_status("draft")
            .with_author(7)
            .upsert(&crumbs(), &record(), 0)
            .await;

        for page in store.pages().await {
            assert!(page.content.starts_with("<h1>Example Module</h1>9.99|"));
            assert!(page.content.contains("image=\"https://addons.prestashop.com/img/a.jpg\""));
            assert_eq!(page.status, "draft");
            assert_eq!(page.author, 7);
        }
    }

    #[tokio::test]
    async fn test_rerun_updates_instead_of_duplicating() {
        let store = MemoryStore::new();
        let template = template();
        let upserter = PageUpserter::new(&store, &template);

        let first = upserter.upsert(&crumbs(), &record(), 0).await;
        let second = upserter.upsert(&crumbs(), &record(), 0).await;

        let pages = store.pages().await;
        assert_eq!(pages.len(), 2);
        assert!(second.iter().all(|o| o.action == UpsertAction::Updated));
        assert_eq!(
            first.iter().map(|o| o.page_id).collect::<Vec<_>>(),
            second.iter().map(|o| o.page_id).collect::<Vec<_>>()
        );

        // Images are uploaded again for every level on every run
        assert_eq!(store.media().await.len(), 8);
    }

    #[tokio::test]
    async fn test_existing_page_is_reused_by_title() {
        let store = MemoryStore::new();
        let existing = store.seed_page("Modules", 0).await;
        let template = template();

        let outcomes = PageUpserter::new(&store, &template)
            .upsert(&crumbs(), &record(), 9)
            .await;

        assert_eq!(outcomes[0].action, UpsertAction::Updated);
        assert_eq!(outcomes[0].page_id, existing);
        let pages = store.pages().await;
        let modules = pages.iter().find(|p| p.id == existing).unwrap();
        assert_eq!(modules.parent, 9);
        assert!(modules.content.contains("Example Module"));
    }

    #[tokio::test]
    async fn test_failed_image_contributes_no_marker() {
        let store = MemoryStore::new().with_failing_image("https://addons.prestashop.com/img/a.jpg");
        let template = template();

        let outcomes = PageUpserter::new(&store, &template)
            .upsert(&crumbs()[..1], &record(), 0)
            .await;

        assert_eq!(outcomes[0].images, 1);
        let page = &store.pages().await[0];
        assert!(!page.content.contains("img/a.jpg"));
        assert!(page.content.ends_with(&image_block(
            "https://addons.prestashop.com/img/b.jpg",
            store.media().await[0].id
        )));
    }

    #[tokio::test]
    async fn test_failed_create_continues_at_top_level() {
        let store = MemoryStore::new().with_failing_title("Modules");
        let template = template();

        let outcomes = PageUpserter::new(&store, &template)
            .upsert(&crumbs(), &record(), 50)
            .await;

        assert_eq!(outcomes[0].action, UpsertAction::Failed);
        assert_eq!(outcomes[0].page_id, 0);
        assert_eq!(outcomes[1].action, UpsertAction::Created);
        assert_eq!(outcomes[1].parent_id, 0);

        let pages = store.pages().await;
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title, "Payment");
        assert_eq!(pages[0].parent, 0);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_existing_id() {
        let store = MemoryStore::new().with_failing_title("Modules");
        let existing = store.seed_page("Modules", 0).await;
        let template = template();

        let outcomes = PageUpserter::new(&store, &template)
            .upsert(&crumbs(), &record(), 0)
            .await;

        assert_eq!(outcomes[0].action, UpsertAction::Failed);
        assert_eq!(outcomes[0].page_id, existing);
        assert_eq!(outcomes[1].parent_id, existing);
    }

    #[tokio::test]
    async fn test_empty_breadcrumbs_write_nothing() {
        let store = MemoryStore::new();
        let template = template();

        let outcomes = PageUpserter::new(&store, &template)
            .upsert(&[], &record(), 0)
            .await;

        assert!(outcomes.is_empty());
        assert!(store.pages().await.is_empty());
        assert!(store.media().await.is_empty());
    }
}
