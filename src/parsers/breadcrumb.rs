use crate::parsers::html::selector;
use crate::results::BreadcrumbEntry;
use scraper::Html;
use serde_json::Value;

const BREADCRUMB_TYPE: &str = "BreadcrumbList";

/// Resolves the category path from raw HTML
pub fn resolve(html: &str) -> Vec<BreadcrumbEntry> {
    resolve_document(&Html::parse_document(html))
}

/// Resolves the category path from the first JSON-LD `BreadcrumbList` block.
///
/// Blocks that are not valid JSON are skipped. Only the first matching block
/// is used; entries keep the order in which the block declares them.
pub fn resolve_document(doc: &Html) -> Vec<BreadcrumbEntry> {
    let ld_json = selector("script[type='application/ld+json']");

    for script in doc.select(&ld_json) {
        let raw = script.text().collect::<String>();
        let data: Value = match serde_json::from_str(raw.trim()) {
            Ok(data) => data,
            Err(e) => {
                ::log::debug!("Skipping undecodable JSON-LD block: {}", e);
                continue;
            }
        };

        if data.get("@type").and_then(Value::as_str) != Some(BREADCRUMB_TYPE) {
            continue;
        }

        let entries = data
            .get("itemListElement")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(to_entry).collect())
            .unwrap_or_default();

        ::log::debug!("Resolved breadcrumb: {:?}", entries);
        return entries;
    }

    ::log::warn!("No {} block found", BREADCRUMB_TYPE);
    Vec::new()
}

fn to_entry(element: &Value) -> BreadcrumbEntry {
    let position = match element.get("position") {
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        Some(v) => v.as_i64().unwrap_or_default(),
        None => 0,
    };
    let item = element.get("item");
    let field = |key: &str| {
        item.and_then(|item| item.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    BreadcrumbEntry {
        position,
        id: field("@id"),
        name: field("name"),
    }
}
