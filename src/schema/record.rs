//! Static field table binding tags to record fields
//!
//! A record declares, once, which of its fields take part in validation:
//!
//! ```
//! use fieldtag::schema::{FieldBinding, Record};
//!
//! #[derive(Default)]
//! struct Signup {
//!     age: u8,
//!     color: String,
//! }
//!
//! impl Record for Signup {
//!     fn bindings() -> Vec<FieldBinding<Self>> {
//!         vec![
//!             FieldBinding::new("age", "name=age,required,max=150", |r: &mut Signup| &mut r.age),
//!             FieldBinding::new("color", "name=color,default=red", |r: &mut Signup| &mut r.color),
//!         ]
//!     }
//! }
//! ```
//!
//! The accessor is a plain function pointer, so bindings hold no state and
//! a built schema is `Send + Sync`.

use super::types::{Field, FieldKind, Literal};

/// A type whose fields can be decoded and validated
pub trait Record: Sized + 'static {
    /// Field bindings in declaration order
    fn bindings() -> Vec<FieldBinding<Self>>;
}

/// Type-erased access to one field of `T`
trait Slot<T>: Send + Sync {
    fn kind(&self) -> FieldKind;

    fn accepts(&self, literal: &Literal) -> bool;

    fn field<'a>(&self, record: &'a mut T) -> &'a mut dyn Field;
}

struct Accessor<T, F> {
    access: fn(&mut T) -> &mut F,
}

impl<T, F> Slot<T> for Accessor<T, F>
where
    F: Field + 'static,
{
    fn kind(&self) -> FieldKind {
        F::kind()
    }

    fn accepts(&self, literal: &Literal) -> bool {
        F::from_literal(literal).is_some()
    }

    fn field<'a>(&self, record: &'a mut T) -> &'a mut dyn Field {
        (self.access)(record)
    }
}

/// One entry of a record's field table
pub struct FieldBinding<T> {
    ident: &'static str,
    tag: &'static str,
    slot: Box<dyn Slot<T>>,
}

impl<T: 'static> FieldBinding<T> {
    /// Binds the field reached by `access`, described by `tag`.
    ///
    /// `ident` is the Rust field name, used only in schema error messages.
    pub fn new<F>(ident: &'static str, tag: &'static str, access: fn(&mut T) -> &mut F) -> Self
    where
        F: Field + 'static,
    {
        Self {
            ident,
            tag,
            slot: Box::new(Accessor { access }),
        }
    }

    /// Rust field name
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// Raw tag
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Type family of the bound field
    pub fn kind(&self) -> FieldKind {
        self.slot.kind()
    }

    /// Whether `literal` fits the bound field's exact type
    pub fn accepts(&self, literal: &Literal) -> bool {
        self.slot.accepts(literal)
    }

    /// The bound field inside `record`
    pub fn field<'a>(&self, record: &'a mut T) -> &'a mut dyn Field {
        self.slot.field(record)
    }
}

impl<T> std::fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinding")
            .field("ident", &self.ident)
            .field("tag", &self.tag)
            .finish()
    }
}
