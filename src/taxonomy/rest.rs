use crate::taxonomy::meta::{MetaStore, MetaType, MetaValue, ObjectKind};
use crate::taxonomy::registry::{
    CollectionQuery, ExtensionRegistry, FormData, MetaWrite, RestRequest, TermEvent,
};
use reqwest::StatusCode;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Error returned to a REST caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct RestError {
    pub code: &'static str,
    pub message: String,
    pub status: StatusCode,
}

impl RestError {
    pub fn new(code: &'static str, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            code,
            message: message.into(),
            status,
        }
    }

    pub fn invalid_type(message: impl Into<String>) -> Self {
        Self::new("invalid_type", message, StatusCode::BAD_REQUEST)
    }

    /// Error body in the host's format
    pub fn to_json(&self) -> Value {
        json!({
            "code": self.code,
            "message": self.message,
            "data": { "status": self.status.as_u16() }
        })
    }
}

#[derive(Debug, Clone)]
struct Item {
    id: u64,
    name: String,
}

/// In-memory REST collection of one object type.
///
/// Plays the host side: it stores items and their meta, exposes registered
/// meta fields under `meta`, and calls the handlers registered on the
/// [`ExtensionRegistry`] at each extension point.
pub struct Collection<'r> {
    object: ObjectKind,
    registry: &'r ExtensionRegistry,
    items: BTreeMap<u64, Item>,
    meta: MetaStore,
    next_id: u64,
}

impl<'r> Collection<'r> {
    pub fn new(object: ObjectKind, registry: &'r ExtensionRegistry) -> Self {
        Self {
            object,
            registry,
            items: BTreeMap::new(),
            meta: MetaStore::new(),
            next_id: 0,
        }
    }

    pub fn meta(&self) -> &MetaStore {
        &self.meta
    }

    /// `POST /<collection>`
    pub fn create(&mut self, request: &RestRequest) -> Result<Value, RestError> {
        let name = request
            .param_str("name")
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                RestError::new("missing_name", "name is required", StatusCode::BAD_REQUEST)
            })?;

        let writes = self.writes_for(request)?;

        self.next_id += 1;
        let id = self.next_id;
        self.items.insert(id, Item { id, name });
        self.apply(id, writes);

        ::log::info!("Created {:?} {}", self.object, id);
        self.get(id)
    }

    /// `POST /<collection>/<id>`
    pub fn update(&mut self, id: u64, request: &RestRequest) -> Result<Value, RestError> {
        if !self.items.contains_key(&id) {
            return Err(Self::not_found(id));
        }

        let writes = self.writes_for(request)?;
        if let (Some(name), Some(item)) = (request.param_str("name"), self.items.get_mut(&id)) {
            item.name = name;
        }
        self.apply(id, writes);
        self.get(id)
    }

    /// `GET /<collection>/<id>`
    pub fn get(&self, id: u64) -> Result<Value, RestError> {
        let item = self.items.get(&id).ok_or_else(|| Self::not_found(id))?;
        Ok(self.prepare(item))
    }

    /// `GET /<collection>`
    pub fn list(&self, request: &RestRequest) -> Vec<Value> {
        let query = self.registry.build_query(self.object, request);
        self.items
            .values()
            .filter(|item| self.matches(item.id, &query))
            .map(|item| self.prepare(item))
            .collect()
    }

    /// Admin form save of an existing term
    pub fn save_form(&mut self, id: u64, event: TermEvent, form: &FormData) {
        self.registry
            .term_saved(self.object, event, id, form, &mut self.meta);
    }

    /// Admin add-term form, with injected fields
    pub fn add_form(&self) -> String {
        self.registry.render_add_form(self.object)
    }

    /// Admin edit-term form rows, with injected fields
    pub fn edit_form(&self, id: u64) -> String {
        self.registry.render_edit_form(self.object, id, &self.meta)
    }

    fn not_found(id: u64) -> RestError {
        RestError::new("invalid_id", format!("no item {}", id), StatusCode::NOT_FOUND)
    }

    /// Registered `meta` fields from the request plus validator output
    fn writes_for(&self, request: &RestRequest) -> Result<Vec<MetaWrite>, RestError> {
        let mut writes = Vec::new();

        if let Some(Value::Object(meta)) = request.get_param("meta") {
            for field in self.registry.fields(self.object).filter(|f| f.show_in_rest) {
                let Some(value) = meta.get(field.key) else {
                    continue;
                };
                let value = match (field.kind, value) {
                    (MetaType::String, Value::String(s)) => MetaValue::Text(s.clone()),
                    (MetaType::String, Value::Number(n)) => MetaValue::Text(n.to_string()),
                    (MetaType::Integer, Value::Number(n)) if n.is_i64() => {
                        MetaValue::Integer(n.as_i64().unwrap_or_default())
                    }
                    _ => {
                        return Err(RestError::new(
                            "rest_invalid_type",
                            format!("meta.{} has the wrong type", field.key),
                            StatusCode::BAD_REQUEST,
                        ));
                    }
                };
                writes.push(MetaWrite {
                    key: field.key.to_string(),
                    value,
                });
            }
        }

        writes.extend(self.registry.validate(self.object, request)?);
        Ok(writes)
    }

    fn apply(&mut self, id: u64, writes: Vec<MetaWrite>) {
        for write in writes {
            self.meta.update(self.object, id, &write.key, write.value);
        }
    }

    fn matches(&self, id: u64, query: &CollectionQuery) -> bool {
        query.meta_query.iter().all(|clause| {
            self.meta
                .get(self.object, id, &clause.key)
                .is_some_and(|value| value.as_query_string() == clause.value)
        })
    }

    fn prepare(&self, item: &Item) -> Value {
        let mut payload = Map::new();
        payload.insert("id".to_string(), json!(item.id));
        payload.insert("name".to_string(), json!(item.name));

        let exposed: Map<String, Value> = self
            .registry
            .fields(self.object)
            .filter(|f| f.show_in_rest)
            .map(|f| {
                let value = match (self.meta.get(self.object, item.id, f.key), f.kind) {
                    (Some(value), _) => json!(value),
                    (None, MetaType::String) => json!(""),
                    (None, MetaType::Integer) => json!(0),
                };
                (f.key.to_string(), value)
            })
            .collect();
        if !exposed.is_empty() {
            payload.insert("meta".to_string(), Value::Object(exposed));
        }

        self.registry
            .prepare_response(self.object, item.id, &self.meta, &mut payload);
        Value::Object(payload)
    }
}
