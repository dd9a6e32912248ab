use crate::config::WordPressConfig;
use crate::utils::image_file_name;
use crate::wordpress::{ContentStore, MediaAsset, PageDraft, StoreError};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use scraper::Html;
use serde::Deserialize;

/// Page title as returned with `context=edit`
#[derive(Debug, Deserialize)]
struct Title {
    /// Stored title, as sent on create
    #[serde(default)]
    raw: Option<String>,
    rendered: String,
}

impl Title {
    /// The title to compare against. `rendered` has gone through the
    /// texturizer (curly quotes, dashes), so it is only used without `raw`.
    fn stored(&self) -> String {
        match &self.raw {
            Some(raw) => raw.clone(),
            None => decode_rendered(&self.rendered),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    id: u64,
    title: Title,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: u64,
}

/// Content store backed by the WordPress REST API
pub struct WordPressClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl WordPressClient {
    pub fn new(config: &WordPressConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/wp-json/wp/v2/{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }

    async fn expect_success(operation: &'static str, response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            operation,
            status,
            body,
        })
    }

    async fn save_page(&self, url: String, page: &PageDraft) -> Result<u64, StoreError> {
        let response = self.authed(self.client.post(url)).json(page).send().await?;
        let response = Self::expect_success("page write", response).await?;
        let created: Created = response.json().await?;
        Ok(created.id)
    }
}

/// Rendered titles come back entity-encoded; compare on the decoded text
fn decode_rendered(rendered: &str) -> String {
    Html::parse_fragment(rendered)
        .root_element()
        .text()
        .collect::<String>()
}

/// Id of the first search result whose stored title is exactly `title`
fn matching_page(pages: &[PageSummary], title: &str) -> Option<u64> {
    pages
        .iter()
        .find(|page| page.title.stored() == title)
        .map(|page| page.id)
}

impl ContentStore for WordPressClient {
    async fn find_page_by_title(&self, title: &str) -> Result<Option<u64>, StoreError> {
        let request = self.client.get(self.endpoint("pages")).query(&[
            ("search", title),
            ("status", "draft,publish"),
            ("per_page", "100"),
            ("context", "edit"),
        ]);
        let response = self.authed(request).send().await?;
        let response = Self::expect_success("page search", response).await?;
        let pages: Vec<PageSummary> = response.json().await?;

        Ok(matching_page(&pages, title))
    }

    async fn create_page(&self, page: &PageDraft) -> Result<u64, StoreError> {
        self.save_page(self.endpoint("pages"), page).await
    }

    async fn update_page(&self, id: u64, page: &PageDraft) -> Result<u64, StoreError> {
        self.save_page(self.endpoint(&format!("pages/{}", id)), page)
            .await
    }

    async fn upload_image(&self, image_url: &str) -> Result<MediaAsset, StoreError> {
        let image = self.client.get(image_url).send().await?;
        let image = Self::expect_success("image download", image).await?;

        let content_type = image
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = image.bytes().await?;

        let part = Part::stream(bytes)
            .file_name(image_file_name(image_url))
            .mime_str(&content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .authed(self.client.post(self.endpoint("media")))
            .multipart(form)
            .send()
            .await?;
        let response = Self::expect_success("media upload", response).await?;
        Ok(response.json().await?)
    }
}
