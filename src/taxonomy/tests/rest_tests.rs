use super::registry;
use crate::taxonomy::meta::{MetaValue, ObjectKind};
use crate::taxonomy::registry::{MetaClause, RestRequest};
use crate::taxonomy::rest::Collection;
use crate::taxonomy::{PS_ADDONS_CAT_ID, PS_PRODUCT_ID, PS_PRODUCT_URL};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> RestRequest {
        RestRequest::new().with_param("name", name)
    }

    #[test]
    fn test_non_numeric_category_id_rejected() {
        let registry = registry();
        let mut categories = Collection::new(ObjectKind::ProductCat, &registry);

        let err = categories
            .create(&named("Payment").with_param(PS_ADDONS_CAT_ID, "abc"))
            .unwrap_err();

        assert_eq!(err.code, "invalid_type");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_json(),
            json!({
                "code": "invalid_type",
                "message": "The value of ps_addons_cat_id must be an integer",
                "data": { "status": 400 }
            })
        );
        assert!(categories.list(&RestRequest::new()).is_empty());
    }

    #[test]
    fn test_numeric_category_id_read_back_as_integer() {
        let registry = registry();
        let mut categories = Collection::new(ObjectKind::ProductCat, &registry);

        let created = categories
            .create(&named("Payment").with_param(PS_ADDONS_CAT_ID, "42"))
            .unwrap();
        let id = created["id"].as_u64().unwrap();

        assert_eq!(created[PS_ADDONS_CAT_ID], json!(42));
        assert_eq!(categories.get(id).unwrap()[PS_ADDONS_CAT_ID], json!(42));
        assert_eq!(
            categories.meta().get(ObjectKind::ProductCat, id, PS_ADDONS_CAT_ID),
            Some(&MetaValue::Integer(42))
        );
    }

    #[test]
    fn test_fractional_category_id_truncated() {
        let registry = registry();
        let mut categories = Collection::new(ObjectKind::ProductCat, &registry);

        let created = categories
            .create(&named("Payment").with_param(PS_ADDONS_CAT_ID, 42.7))
            .unwrap();

        assert_eq!(created[PS_ADDONS_CAT_ID], json!(42));
    }

    #[test]
    fn test_unset_category_id_reads_zero() {
        let registry = registry();
        let mut categories = Collection::new(ObjectKind::ProductCat, &registry);

        let created = categories.create(&named("Payment")).unwrap();

        assert_eq!(created[PS_ADDONS_CAT_ID], json!(0));
        assert_eq!(created["name"], json!("Payment"));
        assert!(created.get("meta").is_none());
    }

    #[test]
    fn test_null_category_id_is_skipped() {
        let registry = registry();
        let mut categories = Collection::new(ObjectKind::ProductCat, &registry);

        let created = categories
            .create(&named("Payment").with_param(PS_ADDONS_CAT_ID, Value::Null))
            .unwrap();
        let id = created["id"].as_u64().unwrap();

        assert_eq!(created[PS_ADDONS_CAT_ID], json!(0));
        assert_eq!(categories.meta().get(ObjectKind::ProductCat, id, PS_ADDONS_CAT_ID), None);

        categories
            .update(id, &RestRequest::new().with_param(PS_ADDONS_CAT_ID, 9))
            .unwrap();
        let updated = categories
            .update(id, &RestRequest::new().with_param(PS_ADDONS_CAT_ID, Value::Null))
            .unwrap();
        assert_eq!(updated[PS_ADDONS_CAT_ID], json!(9));
    }

    #[test]
    fn test_rejected_update_keeps_previous_value() {
        let registry = registry();
        let mut categories = Collection::new(ObjectKind::ProductCat, &registry);
        let id = categories
            .create(&named("Payment").with_param(PS_ADDONS_CAT_ID, 7))
            .unwrap()["id"]
            .as_u64()
            .unwrap();

        let err = categories
            .update(id, &named("Renamed").with_param(PS_ADDONS_CAT_ID, "nope"))
            .unwrap_err();
        assert_eq!(err.code, "invalid_type");

        let item = categories.get(id).unwrap();
        assert_eq!(item["name"], json!("Payment"));
        assert_eq!(item[PS_ADDONS_CAT_ID], json!(7));

        let updated = categories
            .update(id, &RestRequest::new().with_param(PS_ADDONS_CAT_ID, "8"))
            .unwrap();
        assert_eq!(updated[PS_ADDONS_CAT_ID], json!(8));
    }

    #[test]
    fn test_missing_item() {
        let registry = registry();
        let mut categories = Collection::new(ObjectKind::ProductCat, &registry);

        let err = categories.update(99, &named("x")).unwrap_err();
        assert_eq!(err.code, "invalid_id");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(categories.get(99).unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_create_requires_name() {
        let registry = registry();
        let mut categories = Collection::new(ObjectKind::ProductCat, &registry);

        let err = categories
            .create(&RestRequest::new().with_param(PS_ADDONS_CAT_ID, 3))
            .unwrap_err();
        assert_eq!(err.code, "missing_name");
    }

    #[test]
    fn test_list_filter_by_category_id() {
        let registry = registry();
        let mut categories = Collection::new(ObjectKind::ProductCat, &registry);
        categories
            .create(&named("Payment").with_param(PS_ADDONS_CAT_ID, 10))
            .unwrap();
        categories
            .create(&named("Shipping").with_param(PS_ADDONS_CAT_ID, 20))
            .unwrap();
        categories.create(&named("Unmapped")).unwrap();

        let found = categories.list(&RestRequest::new().with_param(PS_ADDONS_CAT_ID, "20"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], json!("Shipping"));

        let found = categories.list(&RestRequest::new().with_param(PS_ADDONS_CAT_ID, 10));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], json!("Payment"));

        assert_eq!(categories.list(&RestRequest::new()).len(), 3);
        assert_eq!(
            categories
                .list(&RestRequest::new().with_param(PS_ADDONS_CAT_ID, ""))
                .len(),
            3
        );
        assert_eq!(
            categories
                .list(&RestRequest::new().with_param(PS_ADDONS_CAT_ID, "0"))
                .len(),
            3
        );
        assert!(
            categories
                .list(&RestRequest::new().with_param(PS_ADDONS_CAT_ID, "30"))
                .is_empty()
        );
    }

    #[test]
    fn test_product_meta_exposed_and_filtered() {
        let registry = registry();
        let mut products = Collection::new(ObjectKind::Product, &registry);
        let url = "https://addons.prestashop.com/fr/paiement/123-example.html";

        let created = products
            .create(&RestRequest::from_json(json!({
                "name": "Example Module",
                "meta": { PS_PRODUCT_ID: "123", PS_PRODUCT_URL: url }
            })))
            .unwrap();
        products.create(&named("Other Module")).unwrap();

        assert_eq!(created["meta"][PS_PRODUCT_ID], json!("123"));
        assert_eq!(created["meta"][PS_PRODUCT_URL], json!(url));
        assert!(created.get(PS_ADDONS_CAT_ID).is_none());

        let found = products.list(
            &RestRequest::new()
                .with_param("meta_key", PS_PRODUCT_ID)
                .with_param("meta_value", "123"),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], json!("Example Module"));

        // Both params are needed for the filter to apply
        let found = products.list(&RestRequest::new().with_param("meta_key", PS_PRODUCT_ID));
        assert_eq!(found.len(), 2);
        let found = products.list(
            &RestRequest::new()
                .with_param("meta_key", PS_PRODUCT_ID)
                .with_param("meta_value", ""),
        );
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_product_meta_filter_ignores_falsy_values() {
        let registry = registry();
        let mut products = Collection::new(ObjectKind::Product, &registry);
        products
            .create(&RestRequest::from_json(json!({
                "name": "Zero",
                "meta": { PS_PRODUCT_ID: "0" }
            })))
            .unwrap();
        products.create(&named("Other Module")).unwrap();

        let zero_value = RestRequest::new()
            .with_param("meta_key", PS_PRODUCT_ID)
            .with_param("meta_value", "0");
        assert!(registry.build_query(ObjectKind::Product, &zero_value).meta_query.is_empty());
        assert_eq!(products.list(&zero_value).len(), 2);

        let zero_key = RestRequest::new()
            .with_param("meta_key", "0")
            .with_param("meta_value", "123");
        assert!(registry.build_query(ObjectKind::Product, &zero_key).meta_query.is_empty());

        let numeric_value = RestRequest::new()
            .with_param("meta_key", PS_PRODUCT_ID)
            .with_param("meta_value", 123);
        assert_eq!(
            registry.build_query(ObjectKind::Product, &numeric_value).meta_query,
            vec![MetaClause::equal(PS_PRODUCT_ID, "123")]
        );
    }

    #[test]
    fn test_product_meta_defaults_and_type_check() {
        let registry = registry();
        let mut products = Collection::new(ObjectKind::Product, &registry);

        let created = products.create(&named("Bare")).unwrap();
        assert_eq!(created["meta"][PS_PRODUCT_ID], json!(""));

        let err = products
            .create(&RestRequest::from_json(json!({
                "name": "Broken",
                "meta": { PS_PRODUCT_ID: ["123"] }
            })))
            .unwrap_err();
        assert_eq!(err.code, "rest_invalid_type");
        assert_eq!(products.list(&RestRequest::new()).len(), 1);
    }

    #[test]
    fn test_handlers_registered_by_name() {
        let registry = registry();

        assert_eq!(
            registry.handler_names(ObjectKind::ProductCat),
            vec![
                "expose_category_id",
                "write_category_id",
                "filter_category_id",
                "category_id_field",
                "save_category_id",
            ]
        );
        assert_eq!(registry.handler_names(ObjectKind::Product), vec!["filter_product_meta"]);
        assert_eq!(registry.fields(ObjectKind::Product).count(), 2);
        assert_eq!(registry.fields(ObjectKind::ProductCat).count(), 1);
    }
}
