pub mod breadcrumb;
pub mod html;

#[cfg(test)]
pub(crate) mod tests;

use crate::filter::ImageFilter;
use crate::results::{BreadcrumbEntry, FetchedPage, ProductRecord};
use html::SiblingLookup;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

static PRODUCT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""id_product":(\d+)"#).expect("valid product id regex"));

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""price":(\d+(\.\d+)?)"#).expect("valid price regex"));

/// Description and characteristics blocks share this class signature and are
/// told apart only by document order.
const DESCRIPTION_SELECTOR: &str =
    "div[class*='ui-text-collapse collapsed product-description__content puik-body-large']";

/// Fields found by locating a label div and reading its next element sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelledField {
    PrestashopVersion,
    Multistore,
    Overrides,
    LastUpdate,
    PublicationDate,
}

impl LabelledField {
    pub const ALL: [LabelledField; 5] = [
        LabelledField::PrestashopVersion,
        LabelledField::Multistore,
        LabelledField::Overrides,
        LabelledField::LastUpdate,
        LabelledField::PublicationDate,
    ];

    /// Label text as it appears on the product page
    pub fn label(self) -> &'static str {
        match self {
            LabelledField::PrestashopVersion => "Version de PrestaShop requise",
            LabelledField::Multistore => "Compatibilité multiboutique",
            LabelledField::Overrides => "Contient des surcharges",
            LabelledField::LastUpdate => "Dernière mise à jour",
            LabelledField::PublicationDate => "Date de publication",
        }
    }

    fn field_name(self) -> &'static str {
        match self {
            LabelledField::PrestashopVersion => "prestashop_version",
            LabelledField::Multistore => "is_multistore",
            LabelledField::Overrides => "as_overrides",
            LabelledField::LastUpdate => "last_update",
            LabelledField::PublicationDate => "publication_date",
        }
    }

    fn slot(self, record: &mut ProductRecord) -> &mut String {
        match self {
            LabelledField::PrestashopVersion => &mut record.prestashop_version,
            LabelledField::Multistore => &mut record.is_multistore,
            LabelledField::Overrides => &mut record.as_overrides,
            LabelledField::LastUpdate => &mut record.last_update,
            LabelledField::PublicationDate => &mut record.publication_date,
        }
    }
}

/// A field that could not be extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub field: &'static str,
    pub message: String,
}

/// Result of running every extraction rule over one page
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub record: ProductRecord,
    pub diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    fn miss(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        ::log::warn!("{}: {}", field, message);
        self.diagnostics.push(Diagnostic { field, message });
    }

    /// Whether extraction reported a miss for `field`
    pub fn missed(&self, field: &str) -> bool {
        self.diagnostics.iter().any(|d| d.field == field)
    }
}

/// Applies the fixed set of field rules to product page HTML.
///
/// Every rule runs independently; a miss leaves its field empty and records
/// a diagnostic without affecting the others.
pub struct Extractor {
    image_filter: ImageFilter,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ImageFilter::default())
    }
}

impl Extractor {
    pub fn new(image_filter: ImageFilter) -> Self {
        Self { image_filter }
    }

    /// Extract the record and breadcrumb path of a fetched page
    pub fn parse(&self, page: &FetchedPage) -> (Extraction, Vec<BreadcrumbEntry>) {
        let doc = Html::parse_document(&page.html);
        let extraction = self.extract_document(&doc, &page.html, &page.url);
        let breadcrumbs = breadcrumb::resolve_document(&doc);
        (extraction, breadcrumbs)
    }

    /// Extract the record from raw HTML
    pub fn extract(&self, html: &str, url: &str) -> Extraction {
        let doc = Html::parse_document(html);
        self.extract_document(&doc, html, url)
    }

    fn extract_document(&self, doc: &Html, raw: &str, url: &str) -> Extraction {
        let mut out = Extraction::default();

        if url.is_empty() {
            out.miss("url", "no resolved URL reported by the fetcher");
        } else {
            out.record.url = url.to_string();
        }

        match Self::product_id(doc) {
            Some(id) => out.record.id_product = Some(id),
            None => out.miss("id_product", "no script contains \"id_product\""),
        }

        match PRICE_RE.captures(raw).and_then(|caps| caps.get(1)) {
            Some(price) => out.record.price_ht = price.as_str().to_string(),
            None => out.miss("price_ht", "no \"price\" value in the page"),
        }

        match html::first_text(doc, "title") {
            Some(title) => out.record.title = title,
            None => out.miss("title", "no <title> tag"),
        }

        match html::first_attr(doc, "a#ps_link_manufacturer", "title") {
            Some(dev_name) => out.record.dev_name = dev_name,
            None => out.miss("dev_name", "no link with id 'ps_link_manufacturer'"),
        }

        match html::first_text(doc, "span[class*='module__title-version']") {
            Some(version) => out.record.module_version = version,
            None => out.miss("module_version", "no span with class 'module__title-version'"),
        }

        match html::first_attr(doc, "meta[name='description']", "content") {
            Some(meta) => out.record.meta_description = meta,
            None => out.miss("meta_description", "no <meta name=\"description\">"),
        }

        for field in LabelledField::ALL {
            match html::labelled_sibling_text(doc, field.label()) {
                SiblingLookup::Found(value) => *field.slot(&mut out.record) = value,
                SiblingLookup::LabelMissing => out.miss(
                    field.field_name(),
                    format!("no div containing '{}'", field.label()),
                ),
                SiblingLookup::SiblingMissing => out.miss(
                    field.field_name(),
                    format!("no element follows the '{}' div", field.label()),
                ),
            }
        }

        match html::nth_inner_html(doc, DESCRIPTION_SELECTOR, 0) {
            Some(description) => out.record.description = description,
            None => out.miss("description", "no product description block"),
        }

        match html::nth_inner_html(doc, DESCRIPTION_SELECTOR, 1) {
            Some(caracteristiques) => out.record.caracteristiques = caracteristiques,
            None => out.miss("caracteristiques", "no second product description block"),
        }

        out.record.image_urls = html::image_sources(doc)
            .into_iter()
            .filter(|src| self.image_filter.should_keep(src))
            .collect();
        for src in &out.record.image_urls {
            ::log::debug!("Image found: {}", src);
        }
        if out.record.image_urls.is_empty() {
            out.miss("image_urls", "no image from the asset host");
        }

        ::log::info!(
            "Extracted '{}' with {} missing field(s)",
            out.record.title,
            out.diagnostics.len()
        );
        out
    }

    fn product_id(doc: &Html) -> Option<u64> {
        html::script_texts(doc).iter().find_map(|script| {
            PRODUCT_ID_RE
                .captures(script)
                .and_then(|caps| caps.get(1))
                .and_then(|id| id.as_str().parse().ok())
        })
    }
}
