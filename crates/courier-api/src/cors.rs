use std::collections::BTreeMap;

use courier_types::invocation::InvocationResponse;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const CONTENT_TYPE: &str = "Content-Type";

/// Headers on every JSON reply.
pub fn json_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (CONTENT_TYPE.to_string(), "application/json".to_string()),
        (ALLOW_ORIGIN.to_string(), "*".to_string()),
    ])
}

/// Answer to a CORS pre-flight. Never touches the store.
pub fn preflight() -> InvocationResponse {
    let headers = BTreeMap::from([
        (ALLOW_ORIGIN.to_string(), "*".to_string()),
        (ALLOW_METHODS.to_string(), "GET, POST, OPTIONS".to_string()),
        (ALLOW_HEADERS.to_string(), "Content-Type, X-User-Id".to_string()),
    ]);

    InvocationResponse::new(200, headers, String::new())
}
