use std::collections::BTreeMap;

use serde_json::json;
use thiserror::Error;

use courier_types::invocation::InvocationResponse;

use crate::cors;

/// Body sent for every internal failure. The cause is logged, never returned.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or has the wrong shape.
    #[error("{0}")]
    Validation(String),

    /// The action discriminator named nothing the router knows.
    #[error("unknown action '{action}'")]
    NotFound {
        action: String,
        query_params: BTreeMap<String, String>,
    },

    /// Store or serialization failure.
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Internal(_) => 500,
        }
    }

    pub fn into_response(self) -> InvocationResponse {
        let status = self.status();
        let body = match self {
            Self::Validation(message) => json!({ "error": message }),
            Self::NotFound {
                action,
                query_params,
            } => json!({
                "error": "Not found",
                "action": action,
                "query_params": query_params,
            }),
            Self::Internal(_) => json!({ "error": INTERNAL_ERROR_MESSAGE }),
        };

        InvocationResponse::new(status, cors::json_headers(), body.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(anyhow::Error::new(e).context("failed to serialize response"))
    }
}
