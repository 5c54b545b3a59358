//! Error types for tag parsing, schema construction and validation
//!
//! Two channels, never mixed:
//! - `SchemaError`: the record declaration itself is broken (bad tag, rule on
//!   the wrong field type, malformed literal). A programmer bug.
//! - `ValidationError`: the input does not satisfy the declaration. Exactly
//!   one is reported per call.
//!
//! Validation error codes:
//! - VALIDATE_UNKNOWN (0)
//! - VALIDATE_MISSING_REQUIRED (1)
//! - VALIDATE_UNPARSABLE (2)
//! - VALIDATE_TOO_LONG (3)
//! - VALIDATE_TOO_SHORT (4)
//! - VALIDATE_TOO_BIG (5)
//! - VALIDATE_TOO_SMALL (6)
//! - VALIDATE_INVALID_ENUM (7)

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use super::types::{Bound, FieldKind};

/// Result type for schema construction
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for a validation call
pub type ValidationResult = Result<(), ValidationError>;

/// Errors in a record's declaration, detected before any input is seen
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    // ==================
    // Tag syntax
    // ==================
    /// Tag contains no clauses
    #[error("empty tag")]
    EmptyTag,

    /// A clause such as `=5` or an empty segment between commas
    #[error("empty clause name in tag '{0}'")]
    EmptyClauseName(String),

    /// Clause repeated within one tag
    #[error("tag clause '{0}' already defined")]
    DuplicateClause(String),

    /// `name=` with nothing after it
    #[error("tag clause 'name' is empty")]
    EmptyName,

    /// No `name` clause at all
    #[error("tag '{0}' has no 'name' clause")]
    MissingName(String),

    /// `required` with a value other than empty, `true` or `false`
    #[error("tag clause 'required' has unknown value '{0}'")]
    InvalidRequired(String),

    /// Clause name outside the recognized set
    #[error("unknown tag clause '{0}'")]
    UnknownConstraint(String),

    // ==================
    // Rule compilation
    // ==================
    /// Rule cannot apply to the field's declared type
    #[error("tag clause '{constraint}' cannot be applied to field '{field}' of type {kind}")]
    KindMismatch {
        constraint: String,
        field: String,
        kind: FieldKind,
    },

    /// Literal in a clause does not parse as the field's type
    #[error("unable to parse '{literal}' in clause '{constraint}' of field '{field}' as {kind}")]
    MalformedLiteral {
        constraint: String,
        field: String,
        literal: String,
        kind: FieldKind,
    },

    /// `oneof` with no literals, or with an empty literal
    #[error("tag clause 'oneof' of field '{0}' has an empty literal")]
    EmptyEnum(String),
}

/// Kind of validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Reserved for codes this crate does not know
    Unknown,
    /// Required key absent from input
    MissingRequired,
    /// Value could not be decoded into the field's type
    Unparsable,
    /// Text longer than `maxLen`
    TooLong,
    /// Text shorter than `minLen`
    TooShort,
    /// Number above `max`
    TooBig,
    /// Number below `min`
    TooSmall,
    /// Value not listed in `oneof`
    InvalidEnum,
}

impl ValidationErrorKind {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorKind::Unknown => "VALIDATE_UNKNOWN",
            ValidationErrorKind::MissingRequired => "VALIDATE_MISSING_REQUIRED",
            ValidationErrorKind::Unparsable => "VALIDATE_UNPARSABLE",
            ValidationErrorKind::TooLong => "VALIDATE_TOO_LONG",
            ValidationErrorKind::TooShort => "VALIDATE_TOO_SHORT",
            ValidationErrorKind::TooBig => "VALIDATE_TOO_BIG",
            ValidationErrorKind::TooSmall => "VALIDATE_TOO_SMALL",
            ValidationErrorKind::InvalidEnum => "VALIDATE_INVALID_ENUM",
        }
    }

    /// Returns the numeric code
    pub fn as_code(&self) -> u8 {
        match self {
            ValidationErrorKind::Unknown => 0,
            ValidationErrorKind::MissingRequired => 1,
            ValidationErrorKind::Unparsable => 2,
            ValidationErrorKind::TooLong => 3,
            ValidationErrorKind::TooShort => 4,
            ValidationErrorKind::TooBig => 5,
            ValidationErrorKind::TooSmall => 6,
            ValidationErrorKind::InvalidEnum => 7,
        }
    }

    /// Maps a numeric code back to a kind; unassigned codes are `Unknown`
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => ValidationErrorKind::MissingRequired,
            2 => ValidationErrorKind::Unparsable,
            3 => ValidationErrorKind::TooLong,
            4 => ValidationErrorKind::TooShort,
            5 => ValidationErrorKind::TooBig,
            6 => ValidationErrorKind::TooSmall,
            7 => ValidationErrorKind::InvalidEnum,
            _ => ValidationErrorKind::Unknown,
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The first violation found in a validation call
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    kind: ValidationErrorKind,
    field: String,
    detail: Option<String>,
    bound: Option<Bound>,
}

impl ValidationError {
    /// Creates an error with no detail or bound
    pub fn new(kind: ValidationErrorKind, field: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            detail: None,
            bound: None,
        }
    }

    /// Create a missing required field error
    pub fn missing_required(field: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::MissingRequired, field)
    }

    /// Create an unparsable value error, keeping the decoder's message
    pub fn unparsable(field: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self {
            detail: Some(cause.to_string()),
            ..Self::new(ValidationErrorKind::Unparsable, field)
        }
    }

    /// Create a range or length error carrying the violated bound
    pub fn out_of_bounds(kind: ValidationErrorKind, field: impl Into<String>, bound: Bound) -> Self {
        Self {
            bound: Some(bound),
            ..Self::new(kind, field)
        }
    }

    /// Create an enumeration error listing the accepted literals
    pub fn invalid_enum(field: impl Into<String>, accepted: &[String]) -> Self {
        Self {
            detail: Some(accepted.join(", ")),
            ..Self::new(ValidationErrorKind::InvalidEnum, field)
        }
    }

    /// Returns the error kind
    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    /// Returns the external key of the failing field
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the detail text if any
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns the violated bound for range and length errors
    pub fn bound(&self) -> Option<&Bound> {
        self.bound.as_ref()
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = &self.field;
        match (self.kind, &self.bound) {
            (ValidationErrorKind::MissingRequired, _) => {
                write!(f, "Param '{}' is required", field)
            }
            (ValidationErrorKind::Unparsable, _) => {
                write!(f, "Param '{}' is invalid or corrupted", field)
            }
            (ValidationErrorKind::TooLong, Some(b)) => {
                write!(f, "Param '{}' is too long (> {})", field, b)
            }
            (ValidationErrorKind::TooShort, Some(b)) => {
                write!(f, "Param '{}' is too short (< {})", field, b)
            }
            (ValidationErrorKind::TooBig, Some(b)) => {
                write!(f, "Param '{}' is too big (> {})", field, b)
            }
            (ValidationErrorKind::TooSmall, Some(b)) => {
                write!(f, "Param '{}' is too small (< {})", field, b)
            }
            (ValidationErrorKind::InvalidEnum, _) => match &self.detail {
                Some(accepted) => write!(f, "Param '{}' must be one of: {}", field, accepted),
                None => write!(f, "Param '{}' is not an accepted value", field),
            },
            _ => write!(f, "Param '{}' is invalid", field),
        }
    }
}

impl std::error::Error for ValidationError {}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.bound.is_some() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("ValidationError", len)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("field", &self.field)?;
        state.serialize_field("message", &self.to_string())?;
        if let Some(bound) = &self.bound {
            state.serialize_field("bound", bound)?;
        } else {
            state.skip_field("bound")?;
        }
        state.end()
    }
}
