//! HTTP front for the router: turns an axum request into an invocation and
//! the invocation's response back into HTTP.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router as HttpRouter,
    body::{Body, Bytes},
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use courier_api::Router;
use courier_types::invocation::{Invocation, InvocationResponse};

pub fn app(router: Arc<Router>) -> HttpRouter {
    HttpRouter::new()
        .route("/health", get(health))
        .route("/", any(invoke))
        .route("/messages", any(invoke))
        .with_state(router)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

async fn invoke(
    State(router): State<Arc<Router>>,
    method: Method,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let inv = to_invocation(method, query, &headers, &body);

    // The router does blocking store I/O; keep it off the async runtime
    match tokio::task::spawn_blocking(move || router.handle(inv)).await {
        Ok(resp) => to_http(resp),
        Err(e) => {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn to_invocation(
    method: Method,
    query: BTreeMap<String, String>,
    headers: &HeaderMap,
    body: &Bytes,
) -> Invocation {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    Invocation {
        http_method: method.as_str().to_string(),
        query_string_parameters: (!query.is_empty()).then_some(query),
        body: (!body.is_empty()).then(|| String::from_utf8_lossy(body).into_owned()),
        headers: Some(headers),
    }
}

fn to_http(resp: InvocationResponse) -> Response {
    let status =
        StatusCode::from_u16(resp.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut out = Response::new(Body::from(resp.body));
    *out.status_mut() = status;

    for (name, value) in resp.headers {
        match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
            (Ok(name), Ok(value)) => {
                out.headers_mut().insert(name, value);
            }
            _ => warn!("Dropping unrepresentable response header '{}'", name),
        }
    }

    out
}
