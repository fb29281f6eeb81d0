//! Route definitions for the backend stub.
//!
//! Implements the endpoints `vox-client` calls, wrapped in the standard
//! envelope:
//!
//! | Method   | Path                          | Response `data`             |
//! |----------|-------------------------------|-----------------------------|
//! | GET      | `/api/system/health`          | `SystemHealth`              |
//! | GET, PUT | `/api/settings/profile`       | `ProfileSettings`           |
//! | GET      | `/api/{collection}`           | `{ items, pagination }`     |
//! | POST     | `/api/{collection}`           | created record              |
//! | GET, PUT | `/api/{collection}/{id}`      | record                      |

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use vox_client::ProfileSettings;
use vox_console::profile_schema;
use vox_core::{FieldErrors, Timestamp};
use vox_records::SystemHealth;

use crate::store::{AppState, WriteError};

/// Build the complete router with all stub routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/system/health", get(health))
        .route("/api/settings/profile", get(profile_get).put(profile_update))
        .route("/api/:collection", get(record_list).post(record_create))
        .route("/api/:collection/:id", get(record_get).put(record_update))
        .fallback(not_implemented)
        .layer(from_fn_with_state(state.clone(), require_bearer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Envelope ────────────────────────────────────────────────────────

/// Failure responses, rendered as `{ success: false, error: {...} }`.
#[derive(Debug)]
enum StubError {
    Unauthorized,
    NotFound(String),
    Conflict(String),
    Validation { message: String, details: FieldErrors },
    NotImplemented,
}

impl IntoResponse for StubError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Missing or invalid bearer token".to_string(),
                None,
            ),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
            Self::Conflict(message) => (StatusCode::CONFLICT, "DUPLICATE_ID", message, None),
            Self::Validation { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                message,
                Some(details),
            ),
            Self::NotImplemented => (
                StatusCode::NOT_IMPLEMENTED,
                "NOT_IMPLEMENTED",
                "No such endpoint".to_string(),
                None,
            ),
        };
        let mut error = json!({ "code": code, "message": message });
        if let Some(details) = details {
            error["details"] = json!(details);
        }
        (status, Json(json!({ "success": false, "error": error }))).into_response()
    }
}

fn ok(status: StatusCode, data: impl Serialize) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

fn write_failure(collection: &str, id: &str, err: WriteError) -> StubError {
    match err {
        WriteError::UnknownCollection => StubError::NotFound(format!("unknown collection {collection}")),
        WriteError::NotFound => StubError::NotFound(format!("{collection}/{id} not found")),
        WriteError::Duplicate => StubError::Conflict(format!("{collection}/{id} already exists")),
        WriteError::Malformed(reason) => {
            let mut details = FieldErrors::new();
            details.insert("record", reason);
            StubError::Validation {
                message: format!("Invalid {collection} record"),
                details,
            }
        }
    }
}

// ── Auth ────────────────────────────────────────────────────────────

async fn require_bearer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();
    if !state.accepts(presented) {
        tracing::warn!(path = %req.uri().path(), "rejected request without a valid token");
        return StubError::Unauthorized.into_response();
    }
    next.run(req).await
}

// ── System ──────────────────────────────────────────────────────────

async fn health(State(state): State<AppState>) -> Response {
    ok(
        StatusCode::OK,
        SystemHealth {
            services: state.services(),
            checked_at: Timestamp::now(),
        },
    )
}

// ── Settings ────────────────────────────────────────────────────────

async fn profile_get(State(state): State<AppState>) -> Response {
    ok(StatusCode::OK, state.profile())
}

async fn profile_update(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Response, StubError> {
    let profile: ProfileSettings = serde_json::from_value(body).map_err(|e| {
        let mut details = FieldErrors::new();
        details.insert("profile", e.to_string());
        StubError::Validation {
            message: "Malformed profile".to_string(),
            details,
        }
    })?;

    let mut details = profile_schema().validate(&profile);
    if !details.contains("email") && state.email_taken(&profile.email) {
        details.insert("email", "Email already in use");
    }
    if !details.is_empty() {
        return Err(StubError::Validation {
            message: "Profile is invalid".to_string(),
            details,
        });
    }

    state.save_profile(profile.clone());
    tracing::info!(email = %profile.email, "profile saved");
    Ok(ok(StatusCode::OK, profile))
}

// ── Records ─────────────────────────────────────────────────────────

async fn record_list(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Response, StubError> {
    let items = state
        .list(&collection)
        .ok_or_else(|| StubError::NotFound(format!("unknown collection {collection}")))?;
    let total = items.len();
    Ok(ok(
        StatusCode::OK,
        json!({
            "items": items,
            "pagination": { "page": 1, "limit": total, "total": total, "totalPages": 1 }
        }),
    ))
}

async fn record_get(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Response, StubError> {
    state
        .get(&collection, &id)
        .map(|record| ok(StatusCode::OK, record))
        .ok_or_else(|| StubError::NotFound(format!("{collection}/{id} not found")))
}

async fn record_create(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(record): Json<Value>,
) -> Result<Response, StubError> {
    let id = record
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    state
        .insert(&collection, record.clone())
        .map_err(|e| write_failure(&collection, &id, e))?;
    tracing::info!(%collection, %id, "record created");
    Ok(ok(StatusCode::CREATED, record))
}

async fn record_update(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(record): Json<Value>,
) -> Result<Response, StubError> {
    state
        .replace(&collection, &id, record.clone())
        .map_err(|e| write_failure(&collection, &id, e))?;
    tracing::info!(%collection, %id, "record updated");
    Ok(ok(StatusCode::OK, record))
}

async fn not_implemented() -> StubError {
    StubError::NotImplemented
}
