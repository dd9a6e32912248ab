//! Named extension points of the host REST collections.
//!
//! Each point has a fixed contract:
//! - a [`ResponseTransform`] runs after an item payload is built and before
//!   it is returned, and may only add or change payload keys;
//! - a [`PersistValidator`] runs before anything is written for a create or
//!   update request and turns the request into meta writes, or rejects the
//!   whole request;
//! - a [`QueryAugmenter`] runs before a list request is executed and may add
//!   clauses to the collection query;
//! - a [`TermHook`] runs after an admin form save of a term;
//! - a [`FormRenderer`] contributes markup to the term add/edit admin forms.

use crate::taxonomy::meta::{MetaField, MetaStore, MetaValue, ObjectKind};
use crate::taxonomy::rest::RestError;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Parameters of a REST request, query string and body merged
#[derive(Debug, Clone, Default)]
pub struct RestRequest {
    params: Map<String, Value>,
}

impl RestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(params: Value) -> Self {
        match params {
            Value::Object(params) => Self { params },
            _ => Self::default(),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn get_param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// String form of a scalar parameter
    pub fn param_str(&self, key: &str) -> Option<String> {
        match self.params.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compare {
    Equal,
}

/// Exact-match constraint on a meta value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaClause {
    pub key: String,
    pub value: String,
    pub compare: Compare,
}

impl MetaClause {
    pub fn equal(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
            compare: Compare::Equal,
        }
    }
}

/// Constraints applied to a collection listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionQuery {
    pub meta_query: Vec<MetaClause>,
}

/// A meta value to persist for the item being written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaWrite {
    pub key: String,
    pub value: MetaValue,
}

/// Submitted admin form fields
pub type FormData = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermEvent {
    Created,
    Edited,
}

pub trait ResponseTransform {
    fn prepare(&self, item_id: u64, meta: &MetaStore, payload: &mut Map<String, Value>);
}

pub trait PersistValidator {
    fn validate(&self, request: &RestRequest) -> Result<Vec<MetaWrite>, RestError>;
}

pub trait QueryAugmenter {
    fn augment(&self, request: &RestRequest, query: &mut CollectionQuery);
}

pub trait TermHook {
    fn on_saved(&self, term_id: u64, form: &FormData, meta: &mut MetaStore);
}

pub trait FormRenderer {
    fn add_form(&self) -> String;
    fn edit_form(&self, term_id: u64, meta: &MetaStore) -> String;
}

struct Registered<H: ?Sized> {
    name: &'static str,
    object: ObjectKind,
    handler: Box<H>,
}

struct RegisteredHook {
    name: &'static str,
    object: ObjectKind,
    events: Vec<TermEvent>,
    handler: Box<dyn TermHook>,
}

/// Every meta field and handler registered against the host collections
#[derive(Default)]
pub struct ExtensionRegistry {
    fields: Vec<MetaField>,
    transforms: Vec<Registered<dyn ResponseTransform>>,
    validators: Vec<Registered<dyn PersistValidator>>,
    augmenters: Vec<Registered<dyn QueryAugmenter>>,
    renderers: Vec<Registered<dyn FormRenderer>>,
    hooks: Vec<RegisteredHook>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_meta(&mut self, field: MetaField) {
        ::log::debug!("Registered meta {:?}.{}", field.object, field.key);
        self.fields.push(field);
    }

    pub fn add_response_transform(
        &mut self,
        name: &'static str,
        object: ObjectKind,
        handler: impl ResponseTransform + 'static,
    ) {
        self.transforms.push(Registered {
            name,
            object,
            handler: Box::new(handler),
        });
    }

    pub fn add_persist_validator(
        &mut self,
        name: &'static str,
        object: ObjectKind,
        handler: impl PersistValidator + 'static,
    ) {
        self.validators.push(Registered {
            name,
            object,
            handler: Box::new(handler),
        });
    }

    pub fn add_query_augmenter(
        &mut self,
        name: &'static str,
        object: ObjectKind,
        handler: impl QueryAugmenter + 'static,
    ) {
        self.augmenters.push(Registered {
            name,
            object,
            handler: Box::new(handler),
        });
    }

    pub fn add_form_renderer(
        &mut self,
        name: &'static str,
        object: ObjectKind,
        handler: impl FormRenderer + 'static,
    ) {
        self.renderers.push(Registered {
            name,
            object,
            handler: Box::new(handler),
        });
    }

    pub fn add_term_hook(
        &mut self,
        name: &'static str,
        object: ObjectKind,
        events: &[TermEvent],
        handler: impl TermHook + 'static,
    ) {
        self.hooks.push(RegisteredHook {
            name,
            object,
            events: events.to_vec(),
            handler: Box::new(handler),
        });
    }

    /// Meta fields registered on `object`
    pub fn fields(&self, object: ObjectKind) -> impl Iterator<Item = &MetaField> {
        self.fields.iter().filter(move |f| f.object == object)
    }

    /// Names of every handler registered on `object`, in registration order
    pub fn handler_names(&self, object: ObjectKind) -> Vec<&'static str> {
        let names = self
            .transforms
            .iter()
            .filter(|r| r.object == object)
            .map(|r| r.name)
            .chain(self.validators.iter().filter(|r| r.object == object).map(|r| r.name))
            .chain(self.augmenters.iter().filter(|r| r.object == object).map(|r| r.name))
            .chain(self.renderers.iter().filter(|r| r.object == object).map(|r| r.name))
            .chain(self.hooks.iter().filter(|h| h.object == object).map(|h| h.name));
        names.collect()
    }

    pub fn prepare_response(
        &self,
        object: ObjectKind,
        item_id: u64,
        meta: &MetaStore,
        payload: &mut Map<String, Value>,
    ) {
        for r in self.transforms.iter().filter(|r| r.object == object) {
            r.handler.prepare(item_id, meta, payload);
        }
    }

    /// Run every validator; the first rejection wins and nothing is written
    pub fn validate(&self, object: ObjectKind, request: &RestRequest) -> Result<Vec<MetaWrite>, RestError> {
        let mut writes = Vec::new();
        for r in self.validators.iter().filter(|r| r.object == object) {
            match r.handler.validate(request) {
                Ok(more) => writes.extend(more),
                Err(e) => {
                    ::log::warn!("{} rejected the request: {}", r.name, e);
                    return Err(e);
                }
            }
        }
        Ok(writes)
    }

    pub fn build_query(&self, object: ObjectKind, request: &RestRequest) -> CollectionQuery {
        let mut query = CollectionQuery::default();
        for r in self.augmenters.iter().filter(|r| r.object == object) {
            r.handler.augment(request, &mut query);
        }
        query
    }

    pub fn render_add_form(&self, object: ObjectKind) -> String {
        self.renderers
            .iter()
            .filter(|r| r.object == object)
            .map(|r| r.handler.add_form())
            .collect()
    }

    pub fn render_edit_form(&self, object: ObjectKind, term_id: u64, meta: &MetaStore) -> String {
        self.renderers
            .iter()
            .filter(|r| r.object == object)
            .map(|r| r.handler.edit_form(term_id, meta))
            .collect()
    }

    pub fn term_saved(
        &self,
        object: ObjectKind,
        event: TermEvent,
        term_id: u64,
        form: &FormData,
        meta: &mut MetaStore,
    ) {
        for hook in self
            .hooks
            .iter()
            .filter(|h| h.object == object && h.events.contains(&event))
        {
            ::log::debug!("Running {} for term {}", hook.name, term_id);
            hook.handler.on_saved(term_id, form, meta);
        }
    }
}
