//! # Filtering
//!
//! Derives the displayed subset of a collection from the search box and the
//! status/priority dropdowns. Pure: the input slice is never touched and
//! the output keeps input order.

use std::str::FromStr;

use vox_core::ValidationError;

use crate::record::{Priority, Record, WireEnum};

/// A dropdown value: everything, or one enum member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Selection<T> {
    /// Whether `value` passes this selection.
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl<T: WireEnum> FromStr for Selection<T> {
    type Err = ValidationError;

    /// `all` (any case) or a blank string select everything.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            T::parse_wire(trimmed).map(Self::Only)
        }
    }
}

/// Search and dropdown state for one feature list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter<S> {
    pub search: String,
    pub status: Selection<S>,
    pub priority: Selection<Priority>,
}

impl<S> Default for RecordFilter<S> {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: Selection::All,
            priority: Selection::All,
        }
    }
}

impl<S: WireEnum> RecordFilter<S> {
    /// The identity filter.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn status(mut self, status: S) -> Self {
        self.status = Selection::Only(status);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Selection::Only(priority);
        self
    }

    /// Whether this filter selects everything.
    pub fn is_identity(&self) -> bool {
        self.search.trim().is_empty()
            && self.status == Selection::All
            && self.priority == Selection::All
    }

    /// Whether `record` passes every criterion.
    pub fn matches<R: Record<Status = S>>(&self, record: &R) -> bool {
        self.matches_with(record, &self.search.trim().to_lowercase())
    }

    fn matches_with<R: Record<Status = S>>(&self, record: &R, needle: &str) -> bool {
        if !self.status.admits(&record.status()) {
            return false;
        }
        let priority_ok = match (&self.priority, record.priority()) {
            (Selection::All, _) => true,
            (Selection::Only(wanted), Some(actual)) => *wanted == actual,
            (Selection::Only(_), None) => false,
        };
        if !priority_ok {
            return false;
        }
        needle.is_empty()
            || record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Records of `records` passing `criteria`, in input order.
pub fn filter<'a, R: Record>(records: &'a [R], criteria: &RecordFilter<R::Status>) -> Vec<&'a R> {
    let needle = criteria.search.trim().to_lowercase();
    records
        .iter()
        .filter(|r| criteria.matches_with(*r, &needle))
        .collect()
}
