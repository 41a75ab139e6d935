use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// The parts of an API gateway proxy event this function reads.
///
/// Preflight detection looks for an `httpMethod` entry in `headers`, not at the
/// gateway's request-context method. Gateways normally do not forward the method as
/// a header, so real preflights usually fall through to the normal query path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl GatewayEvent {
    pub fn from_value(payload: Value) -> Result<Self, ApiError> {
        serde_json::from_value(payload).map_err(|e| ApiError::Event(e.to_string()))
    }

    pub fn is_preflight(&self) -> bool {
        self.headers
            .as_ref()
            .and_then(|headers| headers.get("httpMethod"))
            .is_some_and(|method| method == "OPTIONS")
    }
}
