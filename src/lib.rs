//! fieldtag - decode raw JSON fields into typed records and validate them
//! against compact per-field constraint tags

pub mod config;
pub mod schema;

pub use config::{ConfigError, LengthUnit, ValidatorConfig};
pub use schema::{
    FieldBinding, FieldSpec, Record, Schema, SchemaError, SchemaRegistry, ValidationError,
    ValidationErrorKind,
};
