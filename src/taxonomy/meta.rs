use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Object types that can carry meta fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Catalog item
    Product,
    /// Product category taxonomy term
    ProductCat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaType {
    String,
    Integer,
}

/// A persisted meta field registered on an object type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaField {
    pub object: ObjectKind,
    pub key: &'static str,
    pub kind: MetaType,
    pub single: bool,
    /// Exposed under `meta` in REST payloads
    pub show_in_rest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Integer(i64),
    Text(String),
}

impl MetaValue {
    /// Form used by exact-match query clauses
    pub fn as_query_string(&self) -> String {
        match self {
            MetaValue::Integer(i) => i.to_string(),
            MetaValue::Text(s) => s.clone(),
        }
    }

    /// Integer reading of the value, 0 when it is not numeric
    pub fn as_int(&self) -> i64 {
        match self {
            MetaValue::Integer(i) => *i,
            MetaValue::Text(s) => lenient_int(s),
        }
    }
}

/// Host-side storage of object meta
#[derive(Debug, Default)]
pub struct MetaStore {
    values: HashMap<(ObjectKind, u64, String), MetaValue>,
}

impl MetaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, object: ObjectKind, id: u64, key: &str) -> Option<&MetaValue> {
        self.values.get(&(object, id, key.to_string()))
    }

    pub fn update(&mut self, object: ObjectKind, id: u64, key: &str, value: MetaValue) {
        ::log::debug!("Meta {:?}#{} {} = {:?}", object, id, key, value);
        self.values.insert((object, id, key.to_string()), value);
    }
}

/// Integer coercion used for admin form input: leading whitespace, an
/// optional sign and leading digits; anything else reads as 0.
pub fn lenient_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}

/// Strict numeric check followed by truncation to an integer.
///
/// Accepts JSON numbers and strings holding a decimal number (optionally
/// signed, fractional or with an exponent, surrounding whitespace allowed).
/// Returns `None` for anything else.
pub fn numeric_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            let looks_numeric = s.chars().any(|c| c.is_ascii_digit())
                && s.chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
            if !looks_numeric {
                return None;
            }
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Whether a request value counts as supplied for filtering: missing,
/// null, false, empty strings, "0" and 0 do not.
pub fn is_supplied(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty() && s != "0",
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}
