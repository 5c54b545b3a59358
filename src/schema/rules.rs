//! Typed validation rules compiled from a `FieldSpec`
//!
//! Raw clause values are interpreted once, against the field's type, when a
//! schema is built. Evaluation is then pure dispatch over `Rule` variants
//! and cannot hit a malformed literal.

use tracing::trace;

use super::errors::{SchemaError, SchemaResult, ValidationError, ValidationErrorKind, ValidationResult};
use super::tag::{self, FieldSpec};
use super::types::{Bound, FieldKind, Literal, Scalar};
use crate::config::{LengthUnit, ValidatorConfig};

/// One compiled constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Value must not be below the bound
    Min(Bound),
    /// Value must not be above the bound
    Max(Bound),
    /// Text must be at least this long
    MinLen { limit: u64, unit: LengthUnit },
    /// Text must be at most this long
    MaxLen { limit: u64, unit: LengthUnit },
    /// Value must equal one of the literals
    OneOf {
        literals: Vec<Literal>,
        case_sensitive: bool,
    },
}

impl Rule {
    /// Checks one value, returning the violation if any
    fn check(&self, field: &str, value: &Scalar<'_>) -> ValidationResult {
        match self {
            Rule::Min(bound) if is_below(value, bound) => Err(ValidationError::out_of_bounds(
                ValidationErrorKind::TooSmall,
                field,
                *bound,
            )),
            Rule::Max(bound) if is_above(value, bound) => Err(ValidationError::out_of_bounds(
                ValidationErrorKind::TooBig,
                field,
                *bound,
            )),
            Rule::MinLen { limit, unit } if text_len(value, *unit) < *limit => Err(
                ValidationError::out_of_bounds(ValidationErrorKind::TooShort, field, Bound::Uint(*limit)),
            ),
            Rule::MaxLen { limit, unit } if text_len(value, *unit) > *limit => Err(
                ValidationError::out_of_bounds(ValidationErrorKind::TooLong, field, Bound::Uint(*limit)),
            ),
            Rule::OneOf {
                literals,
                case_sensitive,
            } if !literals.iter().any(|l| l.matches(value, *case_sensitive)) => {
                let accepted: Vec<String> = literals.iter().map(ToString::to_string).collect();
                Err(ValidationError::invalid_enum(field, &accepted))
            }
            _ => Ok(()),
        }
    }
}

/// Compiled rules of one field, in evaluation order
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRules {
    default: Option<Literal>,
    rules: Vec<Rule>,
}

impl FieldRules {
    /// Compiles the clauses of `spec` for a field of type `kind`.
    ///
    /// `ident` names the record field in error messages. Rules are ordered
    /// `min`, `max`, `minLen`, `maxLen`, `oneof` regardless of tag order.
    pub fn compile(
        spec: &FieldSpec,
        ident: &str,
        kind: FieldKind,
        config: &ValidatorConfig,
    ) -> SchemaResult<Self> {
        let mut rules = Vec::new();

        let default = match spec.default_literal() {
            Some(raw) => Some(
                Literal::parse(raw, kind).ok_or_else(|| malformed(tag::DEFAULT, ident, raw, kind))?,
            ),
            None => None,
        };

        for key in [tag::MIN, tag::MAX] {
            let Some(raw) = spec.constraint(key) else {
                continue;
            };
            if !kind.is_numeric() {
                return Err(mismatch(key, ident, kind));
            }
            let bound = Bound::parse(raw, kind).ok_or_else(|| malformed(key, ident, raw, kind))?;
            rules.push(if key == tag::MIN {
                Rule::Min(bound)
            } else {
                Rule::Max(bound)
            });
        }

        for key in [tag::MIN_LEN, tag::MAX_LEN] {
            let Some(raw) = spec.constraint(key) else {
                continue;
            };
            if kind != FieldKind::Text {
                return Err(mismatch(key, ident, kind));
            }
            let limit: u64 = raw
                .parse()
                .map_err(|_| malformed(key, ident, raw, FieldKind::Uint))?;
            let unit = config.length_unit;
            rules.push(if key == tag::MIN_LEN {
                Rule::MinLen { limit, unit }
            } else {
                Rule::MaxLen { limit, unit }
            });
        }

        if let Some(raw) = spec.constraint(tag::ONE_OF) {
            if kind == FieldKind::Float {
                return Err(mismatch(tag::ONE_OF, ident, kind));
            }
            let mut literals = Vec::new();
            for part in raw.split(config.enum_delimiter) {
                if part.is_empty() {
                    return Err(SchemaError::EmptyEnum(ident.to_string()));
                }
                literals.push(Literal::parse(part, kind).ok_or_else(|| malformed(tag::ONE_OF, ident, part, kind))?);
            }
            rules.push(Rule::OneOf {
                literals,
                case_sensitive: config.enum_case_sensitive,
            });
        }

        Ok(Self { default, rules })
    }

    /// Default to assign when the key is absent
    pub fn default(&self) -> Option<&Literal> {
        self.default.as_ref()
    }

    /// Compiled rules in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Runs every rule, stopping at the first violation
    pub fn check(&self, field: &str, value: &Scalar<'_>) -> ValidationResult {
        for rule in &self.rules {
            trace!(event = "RULE_CHECK", field, ?rule);
            rule.check(field, value)?;
        }
        Ok(())
    }
}

fn is_below(value: &Scalar<'_>, bound: &Bound) -> bool {
    match (value, bound) {
        (Scalar::Int(v), Bound::Int(b)) => v < b,
        (Scalar::Uint(v), Bound::Uint(b)) => v < b,
        (Scalar::Float(v), Bound::Float(b)) => v < b,
        _ => false,
    }
}

fn is_above(value: &Scalar<'_>, bound: &Bound) -> bool {
    match (value, bound) {
        (Scalar::Int(v), Bound::Int(b)) => v > b,
        (Scalar::Uint(v), Bound::Uint(b)) => v > b,
        (Scalar::Float(v), Bound::Float(b)) => v > b,
        _ => false,
    }
}

fn text_len(value: &Scalar<'_>, unit: LengthUnit) -> u64 {
    match value {
        Scalar::Text(text) => unit.measure(text) as u64,
        _ => 0,
    }
}

fn mismatch(constraint: &str, field: &str, kind: FieldKind) -> SchemaError {
    SchemaError::KindMismatch {
        constraint: constraint.to_string(),
        field: field.to_string(),
        kind,
    }
}

fn malformed(constraint: &str, field: &str, literal: &str, kind: FieldKind) -> SchemaError {
    SchemaError::MalformedLiteral {
        constraint: constraint.to_string(),
        field: field.to_string(),
        literal: literal.to_string(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(raw_tag: &str, kind: FieldKind) -> SchemaResult<FieldRules> {
        let spec = FieldSpec::parse(raw_tag).unwrap();
        FieldRules::compile(&spec, "field", kind, &ValidatorConfig::default())
    }

    fn kind_of(result: ValidationResult) -> Option<ValidationErrorKind> {
        result.err().map(|e| e.kind())
    }

    #[test]
    fn test_rules_follow_fixed_order() {
        let rules = compile("name=x,oneof=a|b,maxLen=5,minLen=1", FieldKind::Text).unwrap();
        assert!(matches!(rules.rules()[0], Rule::MinLen { limit: 1, .. }));
        assert!(matches!(rules.rules()[1], Rule::MaxLen { limit: 5, .. }));
        assert!(matches!(rules.rules()[2], Rule::OneOf { .. }));
    }

    #[test]
    fn test_range_boundaries() {
        let rules = compile("name=age,min=0,max=150", FieldKind::Int).unwrap();
        assert_eq!(kind_of(rules.check("age", &Scalar::Int(0))), None);
        assert_eq!(kind_of(rules.check("age", &Scalar::Int(150))), None);
        assert_eq!(
            kind_of(rules.check("age", &Scalar::Int(-1))),
            Some(ValidationErrorKind::TooSmall)
        );
        assert_eq!(
            kind_of(rules.check("age", &Scalar::Int(151))),
            Some(ValidationErrorKind::TooBig)
        );
    }

    #[test]
    fn test_float_range_carries_bound() {
        let rules = compile("name=ratio,max=0.5", FieldKind::Float).unwrap();
        let err = rules.check("ratio", &Scalar::Float(0.75)).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::TooBig);
        assert_eq!(err.bound(), Some(&Bound::Float(0.5)));
    }

    #[test]
    fn test_length_boundaries() {
        let rules = compile("name=bio,minLen=2,maxLen=4", FieldKind::Text).unwrap();
        assert_eq!(kind_of(rules.check("bio", &Scalar::Text("ab"))), None);
        assert_eq!(kind_of(rules.check("bio", &Scalar::Text("abcd"))), None);
        assert_eq!(
            kind_of(rules.check("bio", &Scalar::Text("a"))),
            Some(ValidationErrorKind::TooShort)
        );
        assert_eq!(
            kind_of(rules.check("bio", &Scalar::Text("abcde"))),
            Some(ValidationErrorKind::TooLong)
        );
    }

    #[test]
    fn test_oneof_integer_literals() {
        let rules = compile("name=level,oneof=1|2|3", FieldKind::Uint).unwrap();
        assert_eq!(kind_of(rules.check("level", &Scalar::Uint(2))), None);
        assert_eq!(
            kind_of(rules.check("level", &Scalar::Uint(4))),
            Some(ValidationErrorKind::InvalidEnum)
        );
    }

    #[test]
    fn test_oneof_custom_delimiter_and_case() {
        let config = ValidatorConfig {
            enum_delimiter: ';',
            enum_case_sensitive: false,
            ..ValidatorConfig::default()
        };
        let spec = FieldSpec::parse("name=color,oneof=Red;Green").unwrap();
        let rules = FieldRules::compile(&spec, "color", FieldKind::Text, &config).unwrap();
        assert_eq!(kind_of(rules.check("color", &Scalar::Text("green"))), None);
        assert_eq!(
            kind_of(rules.check("color", &Scalar::Text("Red|Green"))),
            Some(ValidationErrorKind::InvalidEnum)
        );
    }

    #[test]
    fn test_default_interpreted_by_kind() {
        let rules = compile("name=age,default=18", FieldKind::Int).unwrap();
        assert_eq!(rules.default(), Some(&Literal::Int(18)));
        let rules = compile("name=bio,default=hello", FieldKind::Text).unwrap();
        assert_eq!(rules.default(), Some(&Literal::Text("hello".into())));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        assert!(matches!(
            compile("name=bio,min=1", FieldKind::Text),
            Err(SchemaError::KindMismatch { .. })
        ));
        assert!(matches!(
            compile("name=age,maxLen=3", FieldKind::Int),
            Err(SchemaError::KindMismatch { .. })
        ));
        assert!(matches!(
            compile("name=ratio,oneof=1.5|2.5", FieldKind::Float),
            Err(SchemaError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_malformed_literals_rejected() {
        assert!(matches!(
            compile("name=age,min=ten", FieldKind::Int),
            Err(SchemaError::MalformedLiteral { .. })
        ));
        assert!(matches!(
            compile("name=count,min=-1", FieldKind::Uint),
            Err(SchemaError::MalformedLiteral { .. })
        ));
        assert!(matches!(
            compile("name=bio,maxLen=-1", FieldKind::Text),
            Err(SchemaError::MalformedLiteral { .. })
        ));
        assert!(matches!(
            compile("name=age,default=old", FieldKind::Int),
            Err(SchemaError::MalformedLiteral { .. })
        ));
        assert!(matches!(
            compile("name=level,oneof=1|two", FieldKind::Int),
            Err(SchemaError::MalformedLiteral { .. })
        ));
    }

    #[test]
    fn test_empty_enum_literal_rejected() {
        assert!(matches!(
            compile("name=color,oneof=", FieldKind::Text),
            Err(SchemaError::EmptyEnum(_))
        ));
        assert!(matches!(
            compile("name=color,oneof=red||blue", FieldKind::Text),
            Err(SchemaError::EmptyEnum(_))
        ));
    }
}
