use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use courier_types::invocation::Invocation;

use crate::error::ApiError;

/// Request parameters gathered from the query string and the JSON body.
///
/// Read actions look in the body first and fall back to the query string;
/// write actions only ever read the body. `null`, `""`, `0` and `false`
/// count as absent for identifiers and text, so defaults still apply.
#[derive(Debug, Clone, Default)]
pub struct Params {
    query: BTreeMap<String, String>,
    body: Map<String, Value>,
}

impl Params {
    pub fn from_invocation(inv: &Invocation) -> Self {
        let query = inv.query_string_parameters.clone().unwrap_or_default();
        let body = inv.body.as_deref().map(parse_body).unwrap_or_default();
        Self { query, body }
    }

    /// The action discriminator. A non-empty query string wins even when it
    /// carries no `action` key.
    pub fn action(&self) -> &str {
        if !self.query.is_empty() {
            return self.query.get("action").map(String::as_str).unwrap_or("");
        }
        self.body.get("action").and_then(Value::as_str).unwrap_or("")
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// Identifier from the body or, failing that, the query string.
    pub fn lookup_id(&self, key: &str, default: i64) -> Result<i64, ApiError> {
        if let Some(value) = self.body_value(key) {
            return value_to_id(key, value);
        }
        match self.query.get(key).filter(|v| !v.is_empty()) {
            Some(raw) => parse_id(key, raw),
            None => Ok(default),
        }
    }

    pub fn body_id(&self, key: &str) -> Result<Option<i64>, ApiError> {
        self.body_value(key).map(|v| value_to_id(key, v)).transpose()
    }

    pub fn body_str(&self, key: &str) -> Result<Option<&str>, ApiError> {
        match self.body_value(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(invalid(key)),
        }
    }

    /// Booleans keep an explicit `false`; only a missing key or `null` is absent.
    pub fn body_bool(&self, key: &str) -> Result<Option<bool>, ApiError> {
        match self.body.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(invalid(key)),
        }
    }

    fn body_value(&self, key: &str) -> Option<&Value> {
        self.body.get(key).filter(|v| is_present(v))
    }
}

/// Malformed or non-object bodies are treated as empty.
fn parse_body(raw: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            debug!("Ignoring non-object request body of type {}", json_type(&other));
            Map::new()
        }
        Err(e) => {
            debug!("Ignoring malformed request body: {}", e);
            Map::new()
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn value_to_id(key: &str, value: &Value) -> Result<i64, ApiError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| invalid(key)),
        Value::String(s) => parse_id(key, s),
        _ => Err(invalid(key)),
    }
}

fn parse_id(key: &str, raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| invalid(key))
}

fn invalid(key: &str) -> ApiError {
    ApiError::validation(format!("Invalid {}", key))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
