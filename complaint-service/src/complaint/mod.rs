//! Complaint domain types.
//!
//! Inbound payloads are validated into a [`ComplaintSubmission`] before any
//! queue interaction happens.

pub mod submission;

pub use submission::{
    ComplaintSubmission, ErrorKind, Field, ValidationError, ValidationErrors,
    MAX_DESCRIPTION_CHARS,
};
