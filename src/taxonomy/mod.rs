//! Custom meta fields for the product category taxonomy and for products.
//!
//! [`register`] wires every field and handler of the extension into an
//! [`ExtensionRegistry`]; the host collections then call them at the
//! matching extension points.

pub mod forms;
pub mod meta;
pub mod registry;
pub mod rest;

#[cfg(test)]
mod tests;

use meta::{MetaField, MetaStore, MetaType, MetaValue, ObjectKind, is_supplied, lenient_int, numeric_int};
use registry::{
    CollectionQuery, ExtensionRegistry, FormData, MetaClause, MetaWrite, PersistValidator,
    QueryAugmenter, ResponseTransform, RestRequest, TermEvent, TermHook,
};
use rest::RestError;
use serde_json::{Map, Value, json};

pub const PS_ADDONS_CAT_ID: &str = "ps_addons_cat_id";
pub const PS_PRODUCT_ID: &str = "ps_product_id";
pub const PS_PRODUCT_URL: &str = "ps_product_url";

/// Register every field and handler of the extension
pub fn register(registry: &mut ExtensionRegistry) {
    for key in [PS_PRODUCT_ID, PS_PRODUCT_URL] {
        registry.register_meta(MetaField {
            object: ObjectKind::Product,
            key,
            kind: MetaType::String,
            single: true,
            show_in_rest: true,
        });
    }
    registry.register_meta(MetaField {
        object: ObjectKind::ProductCat,
        key: PS_ADDONS_CAT_ID,
        kind: MetaType::Integer,
        single: true,
        show_in_rest: false,
    });

    registry.add_form_renderer("category_id_field", ObjectKind::ProductCat, forms::CategoryIdField);
    registry.add_term_hook(
        "save_category_id",
        ObjectKind::ProductCat,
        &[TermEvent::Created, TermEvent::Edited],
        SaveCategoryId,
    );
    registry.add_response_transform("expose_category_id", ObjectKind::ProductCat, ExposeCategoryId);
    registry.add_persist_validator("write_category_id", ObjectKind::ProductCat, WriteCategoryId);
    registry.add_query_augmenter("filter_category_id", ObjectKind::ProductCat, FilterCategoryId);
    registry.add_query_augmenter("filter_product_meta", ObjectKind::Product, FilterProductMeta);
}

/// Persists the category id submitted from the admin forms
struct SaveCategoryId;

impl TermHook for SaveCategoryId {
    fn on_saved(&self, term_id: u64, form: &FormData, meta: &mut MetaStore) {
        if let Some(raw) = form.get(PS_ADDONS_CAT_ID) {
            meta.update(
                ObjectKind::ProductCat,
                term_id,
                PS_ADDONS_CAT_ID,
                MetaValue::Integer(lenient_int(raw)),
            );
        }
    }
}

/// Adds the category id to every category payload, 0 when unset
struct ExposeCategoryId;

impl ResponseTransform for ExposeCategoryId {
    fn prepare(&self, item_id: u64, meta: &MetaStore, payload: &mut Map<String, Value>) {
        let value = meta
            .get(ObjectKind::ProductCat, item_id, PS_ADDONS_CAT_ID)
            .map(MetaValue::as_int)
            .unwrap_or_default();
        payload.insert(PS_ADDONS_CAT_ID.to_string(), json!(value));
    }
}

/// Accepts numeric category ids on create and update, rejects anything else
struct WriteCategoryId;

impl PersistValidator for WriteCategoryId {
    fn validate(&self, request: &RestRequest) -> Result<Vec<MetaWrite>, RestError> {
        // Absent and null both mean "not sent"
        let raw = match request.get_param(PS_ADDONS_CAT_ID) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(raw) => raw,
        };

        match numeric_int(raw) {
            Some(value) => Ok(vec![MetaWrite {
                key: PS_ADDONS_CAT_ID.to_string(),
                value: MetaValue::Integer(value),
            }]),
            None => Err(RestError::invalid_type(format!(
                "The value of {} must be an integer",
                PS_ADDONS_CAT_ID
            ))),
        }
    }
}

/// `?ps_addons_cat_id=N` on the category listing
struct FilterCategoryId;

impl QueryAugmenter for FilterCategoryId {
    fn augment(&self, request: &RestRequest, query: &mut CollectionQuery) {
        let raw = request.get_param(PS_ADDONS_CAT_ID);
        if !is_supplied(raw) {
            return;
        }

        let value = match raw {
            Some(Value::String(s)) => lenient_int(s),
            Some(other) => numeric_int(other).unwrap_or_default(),
            None => return,
        };
        query.meta_query = vec![MetaClause::equal(PS_ADDONS_CAT_ID, value.to_string())];
    }
}

/// `?meta_key=K&meta_value=V` on the product listing
struct FilterProductMeta;

impl QueryAugmenter for FilterProductMeta {
    fn augment(&self, request: &RestRequest, query: &mut CollectionQuery) {
        if !is_supplied(request.get_param("meta_key")) || !is_supplied(request.get_param("meta_value")) {
            return;
        }

        if let (Some(key), Some(value)) = (request.param_str("meta_key"), request.param_str("meta_value")) {
            query.meta_query = vec![MetaClause::equal(&key, value)];
        }
    }
}
