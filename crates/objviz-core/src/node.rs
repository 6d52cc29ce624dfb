//! Node descriptors produced by introspection and consumed by visitors.

use crate::object::ObjRef;

/// One reachable non-null node of the object graph.
///
/// Null is never a node of its own: it travels as `None` in reference
/// fields and slots, and the walker reports it with `visit_null`.
pub enum Node {
    Array(ArrayNode),
    Object(ObjectNode),
}

/// A field rendered inline in its owner's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveField {
    pub name: String,
    pub text: String,
}

/// A field whose value is drawn as a separate node; `None` is null.
#[derive(Clone)]
pub struct ReferenceField {
    pub name: String,
    pub target: Option<ObjRef>,
}

/// A plain (non-array) object.
pub struct ObjectNode {
    pub value: ObjRef,
    pub class_name: String,
    pub primitive_fields: Vec<PrimitiveField>,
    pub reference_fields: Vec<ReferenceField>,
}

impl ObjectNode {
    pub fn primitive_fields_num(&self) -> usize {
        self.primitive_fields.len()
    }
}

/// One array slot.
#[derive(Clone)]
pub enum Slot {
    /// Rendered value shown inside the cell.
    Literal(String),
    /// Child reference drawn as an edge from the cell; `None` is null.
    Reference(Option<ObjRef>),
}

pub struct ArrayNode {
    pub value: ObjRef,
    pub class_name: String,
    /// Elements carry literal values rather than references.
    pub primitive: bool,
    pub elements: Vec<Slot>,
}

impl ArrayNode {
    pub fn are_values_primitive(&self) -> bool {
        self.primitive
    }

    /// Cell text for `index`: the literal for inline slots, empty otherwise.
    pub fn element_text(&self, index: usize) -> &str {
        match self.elements.get(index) {
            Some(Slot::Literal(text)) => text,
            _ => "",
        }
    }
}
