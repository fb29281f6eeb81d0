//! Response envelope decoding.
//!
//! Every backend response is wrapped as
//!
//! ```json
//! { "success": true,  "data": ... }
//! { "success": false, "error": "message" }
//! { "success": false, "error": { "code": "VALIDATION_ERROR", "message": "...", "details": { "email": "..." } } }
//! ```
//!
//! List endpoints return `data` either as a bare array or as
//! `{ "items": [...], "pagination": {...} }`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use vox_core::FieldErrors;

use crate::error::{ApiError, UNAUTHORIZED, VALIDATION_ERROR};

/// The response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ErrorPayload>,
}

/// The `error` member: a bare message or a structured error.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Message(String),
    Detailed {
        code: String,
        #[serde(default)]
        message: String,
        #[serde(default)]
        details: Option<serde_json::Value>,
    },
}

/// The `data` member of list endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListData<T> {
    Items(Vec<T>),
    Paged {
        items: Vec<T>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
}

impl<T> ListData<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Items(items) | Self::Paged { items, .. } => items,
        }
    }
}

/// Pagination metadata. Carried through but not acted upon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, alias = "pageSize")]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Convert a `details` value into per-field messages.
///
/// Accepts `{ field: "msg" }` and `{ field: ["msg", ...] }` (first message
/// wins). Anything else yields no field errors.
fn field_details(details: Option<serde_json::Value>) -> FieldErrors {
    let Some(serde_json::Value::Object(map)) = details else {
        return FieldErrors::new();
    };
    map.into_iter()
        .filter_map(|(field, value)| {
            let message = match value {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Array(items) => items
                    .into_iter()
                    .find_map(|v| v.as_str().map(str::to_string)),
                _ => None,
            }?;
            Some((field, message))
        })
        .collect()
}

/// Map an error payload and HTTP status onto [`ApiError`].
pub(crate) fn classify(endpoint: &str, status: u16, payload: Option<ErrorPayload>) -> ApiError {
    let (code, message, details) = match payload {
        Some(ErrorPayload::Detailed {
            code,
            message,
            details,
        }) => (Some(code), message, details),
        Some(ErrorPayload::Message(message)) => (None, message, None),
        None => (None, format!("request failed with HTTP {status}"), None),
    };
    match code.as_deref() {
        Some(VALIDATION_ERROR) => ApiError::Validation {
            endpoint: endpoint.to_string(),
            message,
            details: field_details(details),
        },
        Some(UNAUTHORIZED) => ApiError::Unauthorized {
            endpoint: endpoint.to_string(),
            message,
        },
        _ if status == 401 => ApiError::Unauthorized {
            endpoint: endpoint.to_string(),
            message,
        },
        _ => ApiError::Rejected {
            endpoint: endpoint.to_string(),
            status,
            code: code.unwrap_or_else(|| "UNKNOWN_ERROR".to_string()),
            message,
        },
    }
}

/// Decode a raw response body into the envelope's `data`.
///
/// Returns `Ok(None)` for successful envelopes without `data`.
pub(crate) fn decode<T: DeserializeOwned>(
    endpoint: &str,
    status: u16,
    body: &str,
) -> Result<Option<T>, ApiError> {
    let ok_status = (200..300).contains(&status);
    let envelope: ApiResponse<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if ok_status => {
            return Err(ApiError::Deserialization {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
        }
        // Non-envelope error bodies (proxies, load balancers).
        Err(_) => {
            let payload = (!body.trim().is_empty()).then(|| ErrorPayload::Message(body.trim().to_string()));
            return Err(classify(endpoint, status, payload));
        }
    };
    if ok_status && envelope.success {
        Ok(envelope.data)
    } else {
        Err(classify(endpoint, status, envelope.error))
    }
}

/// Decode an envelope whose `data` must be present.
pub(crate) fn decode_required<T: DeserializeOwned>(
    endpoint: &str,
    status: u16,
    body: &str,
) -> Result<T, ApiError> {
    decode(endpoint, status, body)?.ok_or_else(|| ApiError::Deserialization {
        endpoint: endpoint.to_string(),
        reason: "response envelope has no data".to_string(),
    })
}
