//! Field type definitions
//!
//! Supported field types:
//! - signed integers: i8, i16, i32, i64, isize
//! - unsigned integers: u8, u16, u32, u64, usize
//! - floats: f32, f64
//! - text: String
//!
//! A record field participates in validation through the `Field` trait,
//! which knows how to decode a raw JSON value into itself, accept a typed
//! default, and expose its current value for rule evaluation.

use std::fmt;

use serde::de;
use serde::Serialize;
use serde_json::value::RawValue;

/// Primitive family of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Signed integer of any width
    Int,
    /// Unsigned integer of any width
    Uint,
    /// 32 or 64 bit float
    Float,
    /// UTF-8 string
    Text,
}

impl FieldKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Int => "signed integer",
            FieldKind::Uint => "unsigned integer",
            FieldKind::Float => "float",
            FieldKind::Text => "text",
        }
    }

    /// Whether `min`/`max` apply
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldKind::Text)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A numeric limit, kept in the numeric family of the field it guards
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Bound {
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl Bound {
    /// Parses a raw bound in the family of `kind`; text has no numeric family
    pub fn parse(raw: &str, kind: FieldKind) -> Option<Self> {
        match kind {
            FieldKind::Int => raw.parse().ok().map(Bound::Int),
            FieldKind::Uint => raw.parse().ok().map(Bound::Uint),
            FieldKind::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Bound::Float),
            FieldKind::Text => None,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Int(v) => write!(f, "{}", v),
            Bound::Uint(v) => write!(f, "{}", v),
            Bound::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A tag literal already interpreted in a field's type family
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
}

impl Literal {
    /// Interprets a raw literal for a field of the given kind.
    ///
    /// Text literals are taken verbatim, numbers must parse in full.
    pub fn parse(raw: &str, kind: FieldKind) -> Option<Self> {
        match kind {
            FieldKind::Int => raw.parse().ok().map(Literal::Int),
            FieldKind::Uint => raw.parse().ok().map(Literal::Uint),
            FieldKind::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Literal::Float),
            FieldKind::Text => Some(Literal::Text(raw.to_string())),
        }
    }

    /// Whether a field value equals this literal
    pub fn matches(&self, value: &Scalar<'_>, case_sensitive: bool) -> bool {
        match (self, value) {
            (Literal::Int(a), Scalar::Int(b)) => a == b,
            (Literal::Uint(a), Scalar::Uint(b)) => a == b,
            (Literal::Text(a), Scalar::Text(b)) if case_sensitive => a == b,
            (Literal::Text(a), Scalar::Text(b)) => a.to_lowercase() == b.to_lowercase(),
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Uint(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::Text(v) => f.write_str(v),
        }
    }
}

/// Borrowed view of a field's current value, widened to its family
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(&'a str),
}

/// A record field the engine can decode into, default and inspect.
///
/// Implemented for the primitive integer, float and `String` types. The
/// sized-only functions describe the type; the rest are object safe so the
/// engine can reach any field through `&mut dyn Field`.
pub trait Field {
    /// Type family of this field
    fn kind() -> FieldKind
    where
        Self: Sized;

    /// Converts an interpreted literal, `None` if it does not fit this type
    fn from_literal(literal: &Literal) -> Option<Self>
    where
        Self: Sized;

    /// Decodes a raw JSON value in place; on error the field is unchanged
    fn decode(&mut self, raw: &RawValue) -> serde_json::Result<()>;

    /// Stores a literal previously accepted by `from_literal`
    fn assign(&mut self, literal: &Literal);

    /// Current value
    fn scalar(&self) -> Scalar<'_>;
}

macro_rules! impl_integer_field {
    ($kind:ident, $wide:ty, $($ty:ty),+) => {
        $(
            impl Field for $ty {
                fn kind() -> FieldKind {
                    FieldKind::$kind
                }

                fn from_literal(literal: &Literal) -> Option<Self> {
                    match literal {
                        Literal::$kind(v) => <$ty>::try_from(*v).ok(),
                        _ => None,
                    }
                }

                fn decode(&mut self, raw: &RawValue) -> serde_json::Result<()> {
                    *self = serde_json::from_str(raw.get())?;
                    Ok(())
                }

                fn assign(&mut self, literal: &Literal) {
                    if let Some(value) = Self::from_literal(literal) {
                        *self = value;
                    }
                }

                fn scalar(&self) -> Scalar<'_> {
                    Scalar::$kind(*self as $wide)
                }
            }
        )+
    };
}

impl_integer_field!(Int, i64, i8, i16, i32, i64, isize);
impl_integer_field!(Uint, u64, u8, u16, u32, u64, usize);

impl Field for f64 {
    fn kind() -> FieldKind {
        FieldKind::Float
    }

    fn from_literal(literal: &Literal) -> Option<Self> {
        match literal {
            Literal::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn decode(&mut self, raw: &RawValue) -> serde_json::Result<()> {
        *self = serde_json::from_str(raw.get())?;
        Ok(())
    }

    fn assign(&mut self, literal: &Literal) {
        if let Some(value) = Self::from_literal(literal) {
            *self = value;
        }
    }

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Float(*self)
    }
}

impl Field for f32 {
    fn kind() -> FieldKind {
        FieldKind::Float
    }

    fn from_literal(literal: &Literal) -> Option<Self> {
        match literal {
            // Reject literals that only overflow once narrowed
            Literal::Float(v) => {
                let narrowed = *v as f32;
                narrowed.is_finite().then_some(narrowed)
            }
            _ => None,
        }
    }

    fn decode(&mut self, raw: &RawValue) -> serde_json::Result<()> {
        let wide: f64 = serde_json::from_str(raw.get())?;
        let narrowed = wide as f32;
        if !narrowed.is_finite() {
            return Err(de::Error::custom(format!("number {} out of range for f32", wide)));
        }
        *self = narrowed;
        Ok(())
    }

    fn assign(&mut self, literal: &Literal) {
        if let Some(value) = Self::from_literal(literal) {
            *self = value;
        }
    }

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Float(f64::from(*self))
    }
}

impl Field for String {
    fn kind() -> FieldKind {
        FieldKind::Text
    }

    fn from_literal(literal: &Literal) -> Option<Self> {
        match literal {
            Literal::Text(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn decode(&mut self, raw: &RawValue) -> serde_json::Result<()> {
        *self = serde_json::from_str(raw.get())?;
        Ok(())
    }

    fn assign(&mut self, literal: &Literal) {
        if let Literal::Text(v) = literal {
            self.clone_from(v);
        }
    }

    fn scalar(&self) -> Scalar<'_> {
        Scalar::Text(self)
    }
}
