//! Dynamically shaped objects.
//!
//! `DynObject` and `DynArray` hold their fields behind a `RefCell`, so a graph
//! can be wired up after its nodes exist. This is how cycles are built, and how
//! snapshots loaded from disk become live objects.

use std::cell::RefCell;
use std::rc::Rc;

use objviz_error::Result;

use crate::object::{Field, Inspect, ObjRef, Shape, Value};

/// An object with a class name and an ordered, mutable list of fields.
#[derive(Debug)]
pub struct DynObject {
    class: String,
    display: Option<String>,
    fields: RefCell<Vec<Field>>,
}

impl DynObject {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            display: None,
            fields: RefCell::new(Vec::new()),
        }
    }

    /// Text shown when this object's class is treated as primitive.
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_field(Field::new(name, value.into()));
        self
    }

    pub fn with_private_field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_field(Field::private(name, value.into()));
        self
    }

    /// Append a field after the existing ones.
    pub fn add_field(&self, field: Field) {
        self.fields.borrow_mut().push(field);
    }

    /// Assign a field, keeping its position if it already exists.
    pub fn set_field(&self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        let mut fields = self.fields.borrow_mut();
        match fields.iter_mut().find(|field| field.name == name) {
            Some(field) => field.value = value,
            None => fields.push(Field::new(name, value)),
        }
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn into_ref(self) -> ObjRef {
        Rc::new(self)
    }
}

impl Inspect for DynObject {
    fn class_name(&self) -> String {
        self.class.clone()
    }

    fn shape(&self) -> Result<Shape> {
        Ok(Shape::Object(self.fields.borrow().clone()))
    }

    fn display(&self) -> String {
        self.display.clone().unwrap_or_else(|| self.class.clone())
    }
}

/// A fixed-component array whose slots can be reassigned.
#[derive(Debug)]
pub struct DynArray {
    component: String,
    primitive: bool,
    elements: RefCell<Vec<Value>>,
}

impl DynArray {
    /// An array of a primitive component type such as `int`.
    pub fn of_primitive(component: impl Into<String>, elements: Vec<Value>) -> Self {
        Self {
            component: component.into(),
            primitive: true,
            elements: RefCell::new(elements),
        }
    }

    /// An array whose elements are references (or null).
    pub fn of_refs(component: impl Into<String>, elements: Vec<Value>) -> Self {
        Self {
            component: component.into(),
            primitive: false,
            elements: RefCell::new(elements),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    /// Overwrite slot `index`; out-of-range indexes are ignored.
    pub fn set(&self, index: usize, value: impl Into<Value>) {
        if let Some(slot) = self.elements.borrow_mut().get_mut(index) {
            *slot = value.into();
        }
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn into_ref(self) -> ObjRef {
        Rc::new(self)
    }
}

impl Inspect for DynArray {
    fn class_name(&self) -> String {
        format!("{}[]", self.component)
    }

    fn shape(&self) -> Result<Shape> {
        Ok(Shape::Array {
            component: self.component.clone(),
            primitive: self.primitive,
            elements: self.elements.borrow().clone(),
        })
    }
}
