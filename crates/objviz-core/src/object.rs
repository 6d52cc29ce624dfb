//! Live object model consumed by the graph walker.
//!
//! Rust has no runtime reflection, so introspection is an injected capability:
//! anything that implements [`Inspect`] can describe its class name and its
//! fields (or array elements). Objects are shared as [`ObjRef`]
//! (`Rc<dyn Inspect>`), and two references denote the same object exactly when
//! they point at the same allocation. Value equality is never consulted.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use objviz_error::{Error, Result};

/// Shared handle to a live object.
pub type ObjRef = Rc<dyn Inspect>;

/// Reference identity of a live object: the address of its `Rc` allocation.
///
/// An `ObjectId` is only meaningful while the object is alive; holders that
/// outlive a single call keep a clone of the [`ObjRef`] next to it
/// (see [`crate::IdentityMap`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    /// Identity of the object behind `obj`.
    #[inline]
    pub fn of(obj: &ObjRef) -> Self {
        ObjectId(Rc::as_ptr(obj) as *const () as usize)
    }

    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// A field or element value as seen by introspection.
#[derive(Clone)]
pub enum Value {
    Null,
    /// A value that is always rendered inline (numbers, booleans, chars ...).
    Primitive(String),
    /// A reference to another live object.
    Ref(ObjRef),
}

impl Value {
    pub fn primitive(text: impl ToString) -> Self {
        Value::Primitive(text.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<ObjRef> for Value {
    fn from(obj: ObjRef) -> Self {
        Value::Ref(obj)
    }
}

impl From<Option<ObjRef>> for Value {
    fn from(obj: Option<ObjRef>) -> Self {
        obj.map_or(Value::Null, Value::Ref)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Primitive(text) => write!(f, "Primitive({text:?})"),
            Value::Ref(obj) => write!(f, "Ref({}@{:#x})", obj.class_name(), ObjectId::of(obj).0),
        }
    }
}

/// A declared field of an object together with its current value.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    /// Whether the field is publicly visible on its declaring class.
    pub public: bool,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            public: true,
            value,
        }
    }

    pub fn private(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            public: false,
            value,
        }
    }
}

/// What introspection sees inside an object.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A plain object: its fields in declaration order.
    Object(Vec<Field>),
    /// An array: component type name, whether that component is a primitive
    /// type, and the elements in index order.
    Array {
        component: String,
        primitive: bool,
        elements: Vec<Value>,
    },
}

/// Reflection capability for live objects.
///
/// `shape` must report fields in the same order on every call for objects of
/// the same class, otherwise repeated diagrams of one graph will differ.
pub trait Inspect {
    /// Display name of the object's class, e.g. `Person` or `int[]`.
    fn class_name(&self) -> String;

    /// Enumerate the object's fields or elements.
    ///
    /// Returning an error aborts the diagram being built.
    fn shape(&self) -> Result<Shape>;

    /// Text used when the object's class is treated as primitive.
    fn display(&self) -> String {
        self.class_name()
    }
}

impl<T: Inspect + ?Sized> Inspect for RefCell<T> {
    fn class_name(&self) -> String {
        self.borrow().class_name()
    }

    /// Fails instead of panicking while the cell is mutably borrowed.
    fn shape(&self) -> Result<Shape> {
        self.try_borrow()
            .map_err(|err| {
                Error::introspection_failed(err.to_string()).with_operation("inspect::shape")
            })?
            .shape()
    }

    fn display(&self) -> String {
        self.borrow().display()
    }
}
