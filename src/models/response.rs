use std::collections::BTreeMap;

use serde::Serialize;

use crate::middleware::cors_headers;
use crate::models::post::BlogPost;

/// Response envelope handed back to the API gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// Everything a response body can carry: the posts, or a single error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Posts(Vec<BlogPost>),
    Error { error: String },
}

impl ResponseBody {
    pub fn error(message: impl Into<String>) -> Self {
        ResponseBody::Error {
            error: message.into(),
        }
    }
}

impl ApiResponse {
    /// Serializes `body` into an envelope carrying the fixed CORS headers.
    /// A serialization failure is logged and leaves the body empty; the status stands.
    pub fn json(status_code: u16, body: &ResponseBody) -> Self {
        let body = serde_json::to_string(body).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize response body: {}", e);
            String::new()
        });

        ApiResponse {
            status_code,
            headers: cors_headers(),
            body,
            is_base64_encoded: false,
        }
    }

    pub fn posts(posts: Vec<BlogPost>) -> Self {
        Self::json(200, &ResponseBody::Posts(posts))
    }

    /// Answer to a CORS preflight: headers only.
    pub fn preflight() -> Self {
        ApiResponse {
            status_code: 200,
            headers: cors_headers(),
            body: String::new(),
            is_base64_encoded: false,
        }
    }
}
