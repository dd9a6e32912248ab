use serde::{Deserialize, Serialize};

/// Metadata scraped from a single product page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Numeric product id found in the page scripts
    pub id_product: Option<u64>,

    /// Price without tax, kept as scraped
    pub price_ht: String,

    /// Content of the `<title>` tag
    pub title: String,

    /// Developer name from the manufacturer link
    pub dev_name: String,

    pub module_version: String,
    pub publication_date: String,
    pub last_update: String,

    /// Minimum platform version required by the module
    pub prestashop_version: String,

    pub as_overrides: String,
    pub is_multistore: String,

    /// Inner HTML of the first description block
    pub description: String,

    /// Inner HTML of the second description block
    pub caracteristiques: String,

    /// Content of `<meta name="description">`
    pub meta_description: String,

    /// Resolved URL reported by the fetcher
    pub url: String,

    /// Image URLs in document order, duplicates kept
    pub image_urls: Vec<String>,
}

/// One level of the category path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbEntry {
    pub position: i64,
    pub id: String,
    pub name: String,
}

impl BreadcrumbEntry {
    pub fn new(position: i64, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            position,
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Page returned by a fetcher backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPage {
    /// URL after redirects
    pub url: String,

    /// Rendered HTML
    pub html: String,
}
