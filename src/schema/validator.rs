//! Validation engine: decode, default and check a record's fields
//!
//! Validation semantics:
//! - Fields are visited in declaration order
//! - A required key that is absent fails the call
//! - An absent optional key gets its default, or is left untouched
//! - A present key is decoded into the field's exact type
//! - Rules run in the order min, max, minLen, maxLen, oneof
//! - The first violation ends the call; nothing is accumulated
//!
//! A field whose decode fails is not modified. Fields visited before a
//! violation keep their decoded values.

use std::any::type_name;

use tracing::{debug, trace};

use super::errors::{SchemaError, SchemaResult, ValidationError, ValidationResult};
use super::input::RawInput;
use super::record::{FieldBinding, Record};
use super::rules::{FieldRules, Rule};
use super::tag::{self, FieldSpec};
use super::types::Literal;
use crate::config::ValidatorConfig;

/// One bound field with its parsed tag and compiled rules
struct CompiledField<T> {
    binding: FieldBinding<T>,
    spec: FieldSpec,
    rules: FieldRules,
}

/// Validated field table of a record type.
///
/// Built once, immutable afterwards; one schema can serve any number of
/// concurrent `validate` calls, each with its own record.
pub struct Schema<T> {
    fields: Vec<CompiledField<T>>,
}

impl<T: Record> Schema<T> {
    /// Builds the schema of `T` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if any tag of `T` is malformed or a rule does
    /// not fit its field's type.
    pub fn build() -> SchemaResult<Self> {
        Self::build_with(&ValidatorConfig::default())
    }

    /// Builds the schema of `T` with an explicit configuration.
    pub fn build_with(config: &ValidatorConfig) -> SchemaResult<Self> {
        Self::from_bindings(T::bindings(), config)
    }
}

impl<T: 'static> Schema<T> {
    /// Builds a schema from an explicit field table.
    pub fn from_bindings(bindings: Vec<FieldBinding<T>>, config: &ValidatorConfig) -> SchemaResult<Self> {
        let mut fields = Vec::with_capacity(bindings.len());

        for binding in bindings {
            let spec = FieldSpec::parse(binding.tag())?;
            let rules = FieldRules::compile(&spec, binding.ident(), binding.kind(), config)?;

            // Family fits, but the exact width may not (e.g. 300 into u8)
            if let Some(literal) = rules.default() {
                check_width(&binding, tag::DEFAULT, literal)?;
            }
            for rule in rules.rules() {
                if let Rule::OneOf { literals, .. } = rule {
                    for literal in literals {
                        check_width(&binding, tag::ONE_OF, literal)?;
                    }
                }
            }

            fields.push(CompiledField {
                binding,
                spec,
                rules,
            });
        }

        debug!(
            event = "SCHEMA_BUILT",
            record = type_name::<T>(),
            fields = fields.len()
        );

        Ok(Self { fields })
    }

    /// Parsed tags in declaration order
    pub fn specs(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().map(|f| &f.spec)
    }

    /// Number of bound fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record binds no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decodes `input` into `record` and checks every rule.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` in field-then-rule order:
    /// - MissingRequired: required key absent
    /// - Unparsable: value does not decode into the field's type
    /// - TooSmall / TooBig: number outside `min` / `max`
    /// - TooShort / TooLong: text outside `minLen` / `maxLen`
    /// - InvalidEnum: value not listed in `oneof`
    pub fn validate<I>(&self, input: &I, record: &mut T) -> ValidationResult
    where
        I: RawInput + ?Sized,
    {
        for compiled in &self.fields {
            let name = compiled.spec.name.as_str();
            let field = compiled.binding.field(record);

            match input.raw(name) {
                None if compiled.spec.required => {
                    return Err(rejected(ValidationError::missing_required(name)));
                }
                None => match compiled.rules.default() {
                    Some(literal) => {
                        field.assign(literal);
                        trace!(event = "FIELD_DEFAULT_APPLIED", field = name, default = %literal);
                    }
                    None => continue,
                },
                Some(raw) => {
                    if let Err(e) = field.decode(raw) {
                        return Err(rejected(ValidationError::unparsable(name, e)));
                    }
                }
            }

            compiled.rules.check(name, &field.scalar()).map_err(rejected)?;
        }

        Ok(())
    }
}

impl<T> std::fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.fields.iter().map(|c| &c.spec))
            .finish()
    }
}

fn check_width<T: 'static>(binding: &FieldBinding<T>, constraint: &str, literal: &Literal) -> SchemaResult<()> {
    if binding.accepts(literal) {
        return Ok(());
    }
    Err(SchemaError::MalformedLiteral {
        constraint: constraint.to_string(),
        field: binding.ident().to_string(),
        literal: literal.to_string(),
        kind: binding.kind(),
    })
}

fn rejected(err: ValidationError) -> ValidationError {
    debug!(
        event = "FIELD_REJECTED",
        field = err.field(),
        code = err.code(),
        detail = err.detail().unwrap_or("")
    );
    err
}
