//! Console error type.

use vox_client::ApiError;
use vox_core::{FieldErrors, RecordId};
use vox_records::RecordError;

/// Errors returned by console controllers and forms.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// No record with this id in local state.
    #[error("{label} {id} not found")]
    NotFound { label: &'static str, id: RecordId },

    /// The record rejected the mutation (no-op change, invalid action).
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Client-side validation failed; nothing was sent.
    #[error("invalid {label}: {errors}")]
    Invalid {
        label: &'static str,
        errors: FieldErrors,
    },

    /// Seed or create would introduce a second record with this id.
    #[error("duplicate {label} id {id}")]
    DuplicateId { label: &'static str, id: RecordId },

    /// The view was unmounted; local state is frozen.
    #[error("{label} view is unmounted")]
    Unmounted { label: &'static str },

    /// Form operations require edit mode.
    #[error("form is not in edit mode")]
    NotEditing,

    /// The form has no field with this name.
    #[error("unknown form field `{0}`")]
    UnknownField(String),

    /// The backend call failed. Local state was rolled back.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ConsoleError {
    /// The backend error, if this failure came from the API.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Per-field messages from client or server validation.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid { errors, .. } => Some(errors),
            Self::Api(e) => e.field_errors(),
            _ => None,
        }
    }
}
