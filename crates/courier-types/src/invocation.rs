use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One call into the router, shaped like a serverless HTTP event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    #[serde(default = "default_method")]
    pub http_method: String,

    #[serde(default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl Default for Invocation {
    fn default() -> Self {
        Self {
            http_method: default_method(),
            query_string_parameters: None,
            body: None,
            headers: None,
        }
    }
}

impl Invocation {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            ..Self::default()
        }
    }

    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query_string_parameters = Some(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Convenience for a POST carrying a JSON body.
    pub fn post_json(body: &serde_json::Value) -> Self {
        Self::new("POST").with_body(body.to_string())
    }
}

/// What the router hands back to the HTTP shim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    /// Bodies are always plain JSON text or empty.
    pub is_base64_encoded: bool,
}

impl InvocationResponse {
    pub fn new(status_code: u16, headers: BTreeMap<String, String>, body: String) -> Self {
        Self {
            status_code,
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    /// Parse the body back into JSON. Used by callers and tests that inspect replies.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}
