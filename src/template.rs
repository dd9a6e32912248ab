use crate::results::ProductRecord;
use std::io;
use std::path::Path;

/// Placeholder tokens, in the order they are substituted
pub const PLACEHOLDERS: [&str; 14] = [
    "[ID_PS_PRODUCT]",
    "[PRICE_HT]",
    "[TITLE]",
    "[DEV_NAME]",
    "[MODULE_VERSION]",
    "[PUBLICATION_DATE]",
    "[LAST_UPDATE]",
    "[PRESTASHOP_VERSION]",
    "[AS_OVERRIDES]",
    "[IS_MULTISTORE]",
    "[DESCRIPTION]",
    "[CARACTERISTIQUES]",
    "#URL_MODULE",
    "[IMG_TAGS]",
];

/// Page body template with literal placeholder tokens
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Load a template from a plain text file
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute every placeholder with the record's values.
    ///
    /// Values are inserted verbatim, without escaping. Tokens are replaced one
    /// after another over the running result, so a value that itself contains
    /// a later token is substituted again.
    pub fn render(&self, record: &ProductRecord, img_tags: &str) -> String {
        let id_product = record
            .id_product
            .map(|id| id.to_string())
            .unwrap_or_default();

        let values: [&str; 14] = [
            &id_product,
            &record.price_ht,
            &record.title,
            &record.dev_name,
            &record.module_version,
            &record.publication_date,
            &record.last_update,
            &record.prestashop_version,
            &record.as_overrides,
            &record.is_multistore,
            &record.description,
            &record.caracteristiques,
            &record.url,
            img_tags,
        ];

        PLACEHOLDERS
            .iter()
            .zip(values)
            .fold(self.source.clone(), |page, (token, value)| {
                page.replace(token, value)
            })
    }
}
