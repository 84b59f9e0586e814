//! Validated complaint submissions.
//!
//! A [`ComplaintSubmission`] only exists once its payload has passed every
//! check, so downstream code never has to re-validate it.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Payload field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Field {
    #[serde(rename = "body")]
    Body,
    #[serde(rename = "bookingId")]
    BookingId,
    #[serde(rename = "description")]
    Description,
}

/// What was wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidJson,
    InvalidType,
    Required,
    Malformed,
    Empty,
    TooLong,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: Field,
    pub kind: ErrorKind,
    pub message: String,
}

impl ValidationError {
    fn new(field: Field, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }
}

/// Every validation failure found in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn has(&self, field: Field, kind: ErrorKind) -> bool {
        self.0.iter().any(|e| e.field == field && e.kind == kind)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{:?}: {}", e.field, e.message))
            .collect();
        write!(f, "invalid complaint: {}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        Self(vec![err])
    }
}

/// A complaint that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintSubmission {
    booking_id: Uuid,
    description: String,
}

impl ComplaintSubmission {
    /// Build a submission from already-typed parts.
    pub fn new(booking_id: Uuid, description: impl Into<String>) -> Result<Self, ValidationErrors> {
        let description = description.into();
        check_description(&description).map_err(ValidationErrors::from)?;
        Ok(Self {
            booking_id,
            description,
        })
    }

    /// Validate a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, ValidationErrors> {
        let raw: Value = serde_json::from_slice(body).map_err(|e| {
            ValidationError::new(Field::Body, ErrorKind::InvalidJson, e.to_string())
        })?;
        Self::validate(&raw)
    }

    /// Validate an already-parsed JSON payload.
    ///
    /// Unknown fields are ignored. Both fields are checked so the caller
    /// sees every problem at once.
    pub fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let Some(object) = raw.as_object() else {
            return Err(ValidationError::new(
                Field::Body,
                ErrorKind::InvalidType,
                "request body must be a JSON object",
            )
            .into());
        };

        let booking_id = booking_id_field(object);
        let description = description_field(object);

        match (booking_id, description) {
            (Ok(booking_id), Ok(description)) => Ok(Self {
                booking_id,
                description,
            }),
            (booking_id, description) => Err(ValidationErrors(
                booking_id
                    .err()
                    .into_iter()
                    .chain(description.err())
                    .collect(),
            )),
        }
    }

    pub fn booking_id(&self) -> Uuid {
        self.booking_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

fn booking_id_field(object: &Map<String, Value>) -> Result<Uuid, ValidationError> {
    match object.get("bookingId") {
        None | Some(Value::Null) => Err(ValidationError::new(
            Field::BookingId,
            ErrorKind::Required,
            "bookingId is required",
        )),
        Some(Value::String(raw)) => Uuid::parse_str(raw).map_err(|e| {
            ValidationError::new(
                Field::BookingId,
                ErrorKind::Malformed,
                format!("bookingId is not a valid UUID: {e}"),
            )
        }),
        Some(_) => Err(ValidationError::new(
            Field::BookingId,
            ErrorKind::Malformed,
            "bookingId must be a UUID string",
        )),
    }
}

fn description_field(object: &Map<String, Value>) -> Result<String, ValidationError> {
    match object.get("description") {
        None | Some(Value::Null) => Err(ValidationError::new(
            Field::Description,
            ErrorKind::Required,
            "description is required",
        )),
        Some(Value::String(raw)) => {
            check_description(raw)?;
            Ok(raw.clone())
        }
        Some(_) => Err(ValidationError::new(
            Field::Description,
            ErrorKind::InvalidType,
            "description must be a string",
        )),
    }
}

/// Length is counted in characters on the untrimmed value.
fn check_description(description: &str) -> Result<(), ValidationError> {
    if description.is_empty() {
        return Err(ValidationError::new(
            Field::Description,
            ErrorKind::Empty,
            "description must not be empty",
        ));
    }

    let chars = description.chars().count();
    if chars > MAX_DESCRIPTION_CHARS {
        return Err(ValidationError::new(
            Field::Description,
            ErrorKind::TooLong,
            format!("description must be at most {MAX_DESCRIPTION_CHARS} characters, got {chars}"),
        ));
    }

    Ok(())
}
