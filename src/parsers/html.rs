use scraper::{ElementRef, Html, Selector};

/// Outcome of a label-then-sibling lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiblingLookup {
    /// Text of the first element sibling after the label
    Found(String),
    /// No div carries the label
    LabelMissing,
    /// The label div has no element sibling after it
    SiblingMissing,
}

/// Parses a selector known at compile time
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// Concatenated, trimmed text of an element and its descendants
pub fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first element matching `css`
pub fn first_text(doc: &Html, css: &str) -> Option<String> {
    doc.select(&selector(css)).next().map(|e| element_text(&e))
}

/// Attribute value of the first element matching `css`
pub fn first_attr(doc: &Html, css: &str, attr: &str) -> Option<String> {
    doc.select(&selector(css))
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(|value| value.to_string())
}

/// Inner markup of the `n`th element matching `css`, with bare `<div>`/`</div>` strings removed
pub fn nth_inner_html(doc: &Html, css: &str, n: usize) -> Option<String> {
    doc.select(&selector(css))
        .nth(n)
        .map(|e| e.inner_html().replace("<div>", "").replace("</div>", ""))
}

/// Text of every `<script>` element, in document order
pub fn script_texts(doc: &Html) -> Vec<String> {
    doc.select(&selector("script"))
        .map(|e| e.text().collect::<String>())
        .collect()
}

/// Every `src` attribute of `<img>` elements, in document order
pub fn image_sources(doc: &Html) -> Vec<String> {
    doc.select(&selector("img"))
        .filter_map(|e| e.value().attr("src"))
        .map(|s| s.to_string())
        .collect()
}

/// Finds the first div whose own leading text contains `label`, then returns
/// the text of the first element sibling that follows it.
///
/// Only the div's first direct text node is inspected, so wrapper divs whose
/// descendants happen to contain the label are not matched. Whitespace and
/// comment siblings between the label and its value are skipped.
pub fn labelled_sibling_text(doc: &Html, label: &str) -> SiblingLookup {
    let label_div = doc
        .select(&selector("div"))
        .find(|div| first_own_text(div).is_some_and(|text| text.contains(label)));

    let Some(div) = label_div else {
        return SiblingLookup::LabelMissing;
    };

    match div.next_siblings().find_map(ElementRef::wrap) {
        Some(value) => SiblingLookup::Found(element_text(&value)),
        None => SiblingLookup::SiblingMissing,
    }
}

fn first_own_text<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    element
        .children()
        .find_map(|child| child.value().as_text())
        .map(|text| &**text)
}
