//! # Profile Settings Form
//!
//! Edit-mode form for the admin's own profile. Errors come from two
//! sources and are merged per field, server first:
//!
//! ```text
//! client = schema.validate(draft)         recomputed on set/blur/submit
//! server = VALIDATION_ERROR.details       from the last submit
//! errors = merge(client, server)
//! ```
//!
//! Editing a field discards the server's verdict for that field. Errors
//! stay hidden until the field is blurred or a submit is attempted.

use std::collections::BTreeSet;

use vox_client::{ErrorKind, ProfileSettings, SettingsApi};
use vox_core::{merge, FieldErrors, FieldRule, Schema};

use crate::error::ConsoleError;
use crate::notice::Notice;

/// Validation rules for the profile form, keyed by wire field name.
pub fn profile_schema() -> Schema {
    Schema::new()
        .field("fullName", vec![FieldRule::Required, FieldRule::MaxLength(100)])
        .field("email", vec![FieldRule::Required, FieldRule::Email])
        .field("phone", vec![FieldRule::Phone])
        .field("company", vec![FieldRule::MaxLength(100)])
        .field("timezone", vec![FieldRule::MaxLength(64)])
}

/// The settings/profile form.
#[derive(Debug, Clone)]
pub struct ProfileForm {
    schema: Schema,
    saved: ProfileSettings,
    draft: ProfileSettings,
    editing: bool,
    submit_attempted: bool,
    touched: BTreeSet<String>,
    client_errors: FieldErrors,
    server_errors: FieldErrors,
    notices: Vec<Notice>,
}

impl ProfileForm {
    /// A read-only form showing `profile`.
    pub fn new(profile: ProfileSettings) -> Self {
        Self {
            schema: profile_schema(),
            draft: profile.clone(),
            saved: profile,
            editing: false,
            submit_attempted: false,
            touched: BTreeSet::new(),
            client_errors: FieldErrors::new(),
            server_errors: FieldErrors::new(),
            notices: Vec::new(),
        }
    }

    /// The last saved profile.
    pub fn profile(&self) -> &ProfileSettings {
        &self.saved
    }

    /// The values being edited.
    pub fn draft(&self) -> &ProfileSettings {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Enter edit mode with a fresh copy of the saved profile.
    pub fn begin_edit(&mut self) {
        self.draft = self.saved.clone();
        self.editing = true;
        self.submit_attempted = false;
        self.touched.clear();
        self.client_errors = FieldErrors::new();
        self.server_errors = FieldErrors::new();
    }

    /// Leave edit mode, discarding the draft.
    pub fn cancel_edit(&mut self) {
        self.draft = self.saved.clone();
        self.editing = false;
        self.touched.clear();
        self.client_errors = FieldErrors::new();
        self.server_errors = FieldErrors::new();
    }

    /// Change one field of the draft.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), ConsoleError> {
        if !self.editing {
            return Err(ConsoleError::NotEditing);
        }
        let slot = self
            .draft
            .field_mut(field)
            .ok_or_else(|| ConsoleError::UnknownField(field.to_string()))?;
        *slot = value.into();
        self.server_errors.remove(field);
        self.revalidate(field);
        Ok(())
    }

    /// Mark a field as visited; its errors become visible.
    pub fn blur(&mut self, field: &str) -> Result<(), ConsoleError> {
        if !ProfileSettings::FIELDS.contains(&field) {
            return Err(ConsoleError::UnknownField(field.to_string()));
        }
        self.touched.insert(field.to_string());
        self.revalidate(field);
        Ok(())
    }

    fn revalidate(&mut self, field: &str) {
        match self.schema.validate_field(field, &self.draft) {
            Some(message) => self.client_errors.insert(field, message),
            None => {
                self.client_errors.remove(field);
            }
        }
    }

    /// Every current error, server messages taking precedence.
    pub fn errors(&self) -> FieldErrors {
        merge(&self.client_errors, &self.server_errors)
    }

    /// Errors to display: touched fields only until a submit is attempted.
    pub fn visible_errors(&self) -> FieldErrors {
        let all = self.errors();
        if self.submit_attempted {
            return all;
        }
        all.iter()
            .filter(|(field, _)| self.touched.contains(*field))
            .map(|(field, message)| (field.to_string(), message.to_string()))
            .collect()
    }

    /// Validate and save the draft.
    ///
    /// - client errors: nothing is sent, stays in edit mode
    /// - `VALIDATION_ERROR` with details: merged into the errors, stays in edit mode
    /// - other failures: notice pushed, stays in edit mode
    /// - success: adopts the saved profile and leaves edit mode
    pub async fn submit<S: SettingsApi>(&mut self, api: &S) -> Result<ProfileSettings, ConsoleError> {
        if !self.editing {
            return Err(ConsoleError::NotEditing);
        }
        self.submit_attempted = true;
        self.client_errors = self.schema.validate(&self.draft);
        self.server_errors = FieldErrors::new();
        if !self.client_errors.is_empty() {
            return Err(ConsoleError::Invalid {
                label: "Profile",
                errors: self.client_errors.clone(),
            });
        }

        match api.update_profile(&self.draft).await {
            Ok(saved) => {
                tracing::info!("profile saved");
                self.saved = saved.clone();
                self.cancel_edit();
                self.submit_attempted = false;
                self.notices
                    .push(Notice::success("Profile updated", "Your changes were saved"));
                Ok(saved)
            }
            Err(e) => {
                match e.field_errors().filter(|details| !details.is_empty()) {
                    Some(details) if e.kind() == ErrorKind::Validation => {
                        self.server_errors = details.clone();
                    }
                    // No field to attach the message to.
                    _ => {
                        tracing::warn!(error = %e, "profile save failed");
                        self.notices
                            .push(Notice::api_failure("Could not save profile", &e));
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Drain pending notifications.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
