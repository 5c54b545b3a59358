//! Tag-driven record decoding and validation
//!
//! A record declares a static table of fields, each with a tag such as
//! `name=age,required,min=0,max=150`. Building a `Schema` parses every tag
//! and compiles typed rules; validating decodes raw JSON input into the
//! record and reports the first violation.
//!
//! # Design Principles
//!
//! - Declaration errors surface at build time as `SchemaError`
//! - Input errors surface per call as a single `ValidationError`
//! - Fields are visited in declaration order
//! - Absent optional fields take their default or stay untouched
//! - No aggregation: the first violation ends the call

mod errors;
mod input;
mod record;
mod registry;
mod rules;
pub mod tag;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult, ValidationError, ValidationErrorKind, ValidationResult};
pub use input::RawInput;
pub use record::{FieldBinding, Record};
pub use registry::SchemaRegistry;
pub use rules::{FieldRules, Rule};
pub use tag::FieldSpec;
pub use types::{Bound, Field, FieldKind, Literal, Scalar};
pub use validator::Schema;
