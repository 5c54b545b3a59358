//! Tag parser for the per-field constraint mini-language
//!
//! A tag is a comma-separated list of `clause[=value]` units:
//!
//! ```text
//! name=age,required,min=0,max=150
//! name=color,default=red,oneof=red|green|blue
//! ```
//!
//! `name` and `required` describe the binding itself; every other clause
//! is kept verbatim and interpreted later, once the field's type is known.

use std::collections::BTreeMap;

use super::errors::{SchemaError, SchemaResult};

/// External key the field binds to
pub const NAME: &str = "name";
/// Absence of the key is an error
pub const REQUIRED: &str = "required";
/// Lower numeric bound, inclusive
pub const MIN: &str = "min";
/// Upper numeric bound, inclusive
pub const MAX: &str = "max";
/// Lower text length bound, inclusive
pub const MIN_LEN: &str = "minLen";
/// Upper text length bound, inclusive
pub const MAX_LEN: &str = "maxLen";
/// Value assigned when the key is absent
pub const DEFAULT: &str = "default";
/// Accepted literals
pub const ONE_OF: &str = "oneof";

const CONSTRAINTS: [&str; 6] = [MIN, MAX, MIN_LEN, MAX_LEN, DEFAULT, ONE_OF];

/// Parsed form of one field's tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// External key looked up in the input
    pub name: String,
    /// Whether the key must be present
    pub required: bool,
    /// Constraint name to raw literal, uninterpreted
    pub constraints: BTreeMap<String, String>,
}

impl FieldSpec {
    /// Parses a raw tag.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the tag is empty, a clause name is empty,
    /// repeated or unknown, `name` is missing or empty, or `required` has a
    /// value other than empty, `true` or `false`.
    pub fn parse(raw: &str) -> SchemaResult<Self> {
        if raw.is_empty() {
            return Err(SchemaError::EmptyTag);
        }

        let mut name = None;
        let mut required = false;
        let mut constraints = BTreeMap::new();
        let mut seen: Vec<&str> = Vec::new();

        for clause in raw.split(',') {
            let (key, value) = clause.split_once('=').unwrap_or((clause, ""));
            if key.is_empty() {
                return Err(SchemaError::EmptyClauseName(raw.to_string()));
            }
            if seen.contains(&key) {
                return Err(SchemaError::DuplicateClause(key.to_string()));
            }
            seen.push(key);

            match key {
                NAME => {
                    if value.is_empty() {
                        return Err(SchemaError::EmptyName);
                    }
                    name = Some(value.to_string());
                }
                REQUIRED => {
                    required = match value {
                        "" | "true" => true,
                        "false" => false,
                        other => return Err(SchemaError::InvalidRequired(other.to_string())),
                    };
                }
                key if CONSTRAINTS.contains(&key) => {
                    constraints.insert(key.to_string(), value.to_string());
                }
                unknown => return Err(SchemaError::UnknownConstraint(unknown.to_string())),
            }
        }

        let name = name.ok_or_else(|| SchemaError::MissingName(raw.to_string()))?;

        Ok(Self {
            name,
            required,
            constraints,
        })
    }

    /// Returns the raw literal of a constraint clause
    pub fn constraint(&self, key: &str) -> Option<&str> {
        self.constraints.get(key).map(String::as_str)
    }

    /// Returns the raw default literal
    pub fn default_literal(&self) -> Option<&str> {
        self.constraint(DEFAULT)
    }
}
