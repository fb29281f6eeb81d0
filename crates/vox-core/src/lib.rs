#![deny(missing_docs)]

//! # vox-core -- Foundational Types for the Vox Admin Console
//!
//! Every other crate in the workspace depends on this one. It has no
//! internal crate dependencies; only `serde`, `thiserror` and `chrono`
//! from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** A [`RecordId`] is not a
//!    bare `String`, and an [`Actor`] cannot be empty.
//!
//! 2. **UTC only.** [`Timestamp`] is the single time type used in timelines,
//!    terminal dates and client-generated identifiers.
//!
//! 3. **One validation vocabulary.** Create drafts and settings forms both
//!    report problems as [`FieldErrors`] produced from [`FieldRule`]s, so
//!    client-side and server-side verdicts share a shape and can be merged.

pub mod error;
pub mod identity;
pub mod temporal;
pub mod validate;

pub use error::ValidationError;
pub use identity::{Actor, RecordId};
pub use temporal::Timestamp;
pub use validate::{merge, FieldErrors, FieldRule, FieldSource, Schema, Validate};
