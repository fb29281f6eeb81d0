//! # Field Validation
//!
//! Client-side validation rules shared by create drafts and settings forms.
//!
//! A [`Schema`] maps field names to [`FieldRule`]s. Validating a
//! [`FieldSource`] against a schema produces [`FieldErrors`]: a map from
//! field name to the first failing rule's message. A field absent from
//! the map is valid.
//!
//! Server-side verdicts arrive in the same shape (the `details` of a
//! `VALIDATION_ERROR`), and [`merge`] combines the two with server messages
//! taking precedence per field.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// A single client-side validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    /// Value must contain a non-whitespace character.
    Required,
    /// Value, when present, must look like `local@domain.tld`.
    Email,
    /// Value, when present, must contain at least seven digits and only
    /// digits, spaces, `+`, `-`, `(` and `)`.
    Phone,
    /// Value, when present, must have at least this many characters.
    MinLength(usize),
    /// Value, when present, must have at most this many characters.
    MaxLength(usize),
    /// Value, when present, must be one of the listed strings.
    OneOf(&'static [&'static str]),
}

impl FieldRule {
    /// Check a value against this rule, returning the error message on failure.
    ///
    /// Every rule except [`FieldRule::Required`] passes on an absent or blank
    /// value, so optional fields only need format rules.
    pub fn check(&self, value: Option<&str>) -> Option<String> {
        let value = value.map(str::trim).unwrap_or("");
        if value.is_empty() {
            return match self {
                Self::Required => Some("This field is required".to_string()),
                _ => None,
            };
        }
        match self {
            Self::Required => None,
            Self::Email => (!is_email(value)).then(|| "Enter a valid email address".to_string()),
            Self::Phone => (!is_phone(value)).then(|| "Enter a valid phone number".to_string()),
            Self::MinLength(n) => (value.chars().count() < *n)
                .then(|| format!("Must be at least {n} characters")),
            Self::MaxLength(n) => (value.chars().count() > *n)
                .then(|| format!("Must be at most {n} characters")),
            Self::OneOf(allowed) => (!allowed.contains(&value))
                .then(|| format!("Must be one of: {}", allowed.join(", "))),
        }
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn is_phone(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    digits >= 7
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
}

/// Anything that can hand out field values by name.
pub trait FieldSource {
    /// The current value of `name`, or `None` if the field is absent.
    fn field(&self, name: &str) -> Option<&str>;
}

impl FieldSource for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldSource for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Ordered mapping of field name to validation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<(String, Vec<FieldRule>)>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the rules for a field.
    pub fn field(mut self, name: impl Into<String>, rules: Vec<FieldRule>) -> Self {
        let name = name.into();
        self.fields.retain(|(existing, _)| *existing != name);
        self.fields.push((name, rules));
        self
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Validate a single field, returning the first failing rule's message.
    pub fn validate_field(&self, name: &str, source: &impl FieldSource) -> Option<String> {
        let (_, rules) = self.fields.iter().find(|(field, _)| field == name)?;
        let value = source.field(name);
        rules.iter().find_map(|rule| rule.check(value))
    }

    /// Validate every field in the schema.
    pub fn validate(&self, source: &impl FieldSource) -> FieldErrors {
        self.field_names()
            .filter_map(|name| {
                self.validate_field(name, source)
                    .map(|msg| (name.to_string(), msg))
            })
            .collect()
    }
}

/// Field name → error message. A field absent from the map is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// An empty (all-valid) error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field, replacing any previous message.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Clear the error for a field.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    /// The error message for a field, if it is invalid.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether a field has an error.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Whether every field is valid.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of invalid fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlay `other` onto `self`: every field in `other` replaces the
    /// message in `self`; fields only in `self` are kept.
    pub fn overlay(&mut self, other: &FieldErrors) {
        for (field, message) in &other.0 {
            self.0.insert(field.clone(), message.clone());
        }
    }

    /// Consume into the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl FromIterator<(String, String)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for FieldErrors {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Combine client-side and server-side verdicts.
///
/// Server messages override client messages for the same field; fields the
/// server does not mention keep their client verdict.
pub fn merge(client: &FieldErrors, server: &FieldErrors) -> FieldErrors {
    let mut merged = client.clone();
    merged.overlay(server);
    merged
}

/// Types that validate their business rules beyond what deserialization checks.
pub trait Validate {
    /// Validate, returning every failing field on error.
    fn validate(&self) -> Result<(), FieldErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn profile_schema() -> Schema {
        Schema::new()
            .field("name", vec![FieldRule::Required, FieldRule::MaxLength(10)])
            .field("email", vec![FieldRule::Required, FieldRule::Email])
            .field("phone", vec![FieldRule::Phone])
    }

    #[test]
    fn required_rejects_blank() {
        assert!(FieldRule::Required.check(Some("  ")).is_some());
        assert!(FieldRule::Required.check(None).is_some());
        assert!(FieldRule::Required.check(Some("x")).is_none());
    }

    #[test]
    fn format_rules_skip_empty_values() {
        assert!(FieldRule::Email.check(Some("")).is_none());
        assert!(FieldRule::Phone.check(None).is_none());
        assert!(FieldRule::MinLength(3).check(Some(" ")).is_none());
    }

    #[test]
    fn email_rule() {
        assert!(FieldRule::Email.check(Some("ops@voxline.io")).is_none());
        assert!(FieldRule::Email.check(Some("ops@voxline")).is_some());
        assert!(FieldRule::Email.check(Some("@voxline.io")).is_some());
        assert!(FieldRule::Email.check(Some("a b@voxline.io")).is_some());
        assert!(FieldRule::Email.check(Some("a@@voxline.io")).is_some());
    }

    #[test]
    fn phone_rule() {
        assert!(FieldRule::Phone.check(Some("+1 (555) 010-9999")).is_none());
        assert!(FieldRule::Phone.check(Some("12345")).is_some());
        assert!(FieldRule::Phone.check(Some("555-CALL-NOW")).is_some());
    }

    #[test]
    fn one_of_rule_lists_choices() {
        let rule = FieldRule::OneOf(&["low", "high"]);
        assert!(rule.check(Some("low")).is_none());
        assert_eq!(rule.check(Some("mid")).unwrap(), "Must be one of: low, high");
    }

    #[test]
    fn schema_reports_first_failing_rule_per_field() {
        let errors = profile_schema().validate(&values(&[
            ("name", "A much too long name"),
            ("email", ""),
            ("phone", "555"),
        ]));
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("name"), Some("Must be at most 10 characters"));
        assert_eq!(errors.get("email"), Some("This field is required"));
        assert_eq!(errors.get("phone"), Some("Enter a valid phone number"));
    }

    #[test]
    fn valid_form_has_no_errors() {
        let errors = profile_schema().validate(&values(&[
            ("name", "Ada"),
            ("email", "ada@voxline.io"),
        ]));
        assert!(errors.is_empty());
    }

    #[test]
    fn schema_field_replaces_rules() {
        let schema = Schema::new()
            .field("name", vec![FieldRule::Required])
            .field("name", vec![FieldRule::MaxLength(2)]);
        assert_eq!(schema.field_names().count(), 1);
        assert!(schema.validate(&values(&[])).is_empty());
    }

    #[test]
    fn server_error_overrides_client_error_for_same_field() {
        let mut client = FieldErrors::new();
        client.insert("email", "Enter a valid email address");
        client.insert("name", "This field is required");
        let mut server = FieldErrors::new();
        server.insert("email", "invalid");

        let merged = merge(&client, &server);
        assert_eq!(merged.get("email"), Some("invalid"));
        assert_eq!(merged.get("name"), Some("This field is required"));
    }

    #[test]
    fn field_errors_serialize_as_plain_map() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "invalid");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"email": "invalid"}));
    }

    proptest! {
        #[test]
        fn merge_prefers_server_and_keeps_client_only_fields(
            client in proptest::collection::btree_map("[a-e]", "[a-z]{1,5}", 0..5),
            server in proptest::collection::btree_map("[a-e]", "[A-Z]{1,5}", 0..5),
        ) {
            let merged = merge(&FieldErrors::from(client.clone()), &FieldErrors::from(server.clone()));
            for (field, message) in &server {
                prop_assert_eq!(merged.get(field), Some(message.as_str()));
            }
            for (field, message) in &client {
                if !server.contains_key(field) {
                    prop_assert_eq!(merged.get(field), Some(message.as_str()));
                }
            }
            let expected: std::collections::BTreeSet<_> = client.keys().chain(server.keys()).collect();
            prop_assert_eq!(merged.len(), expected.len());
        }
    }
}
