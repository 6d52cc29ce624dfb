//! Visitor contract between the graph walker and diagram renderers.
//!
//! [`crate::GraphWalker`] owns traversal: it decides which objects are new,
//! extracts their fields once and calls back into a `Visitor` for every
//! discovery. A visitor only turns those events into output; it never drives
//! the traversal itself.
//!
//! # Event order
//!
//! For one build the walker emits:
//!
//! 1. nothing before the first root; the caller invokes [`Visitor::diagram_begin`]
//! 2. per newly discovered object, a closed group of events describing its body:
//!    - arrays: `visit_array_begin`, one `visit_array_element` per index, `visit_array_end`
//!    - objects: `visit_object_begin`, one `visit_object_primitive_field` per inline
//!      field, `visit_object_end`
//! 3. then, per child in declaration order: the child's own events (or
//!    `visit_null`), followed by the parent→child edge event
//!
//! A node's body is always complete before any of its children are described,
//! so renderers can emit each node declaration as one contiguous block.
//! Already visited objects produce only the edge event.
//!
//! `visit_null` may be called once per null reference encountered; emitting a
//! single null node is the visitor's responsibility.

use crate::node::{ArrayNode, ObjectNode, PrimitiveField, ReferenceField};
use crate::object::ObjRef;

/// Receiver of graph discovery events.
pub trait Visitor {
    /// Start a new diagram, discarding any previous output.
    fn diagram_begin(&mut self);

    /// A null reference was reached.
    fn visit_null(&mut self);

    fn visit_array_begin(&mut self, array: &ArrayNode);

    /// One cell of `array`. `element` is the literal text for primitive-valued
    /// arrays and empty otherwise.
    fn visit_array_element(&mut self, array: &ArrayNode, element: &str, index: usize);

    /// Edge from slot `index` of `array` to its child; `None` targets the null node.
    fn visit_array_element_edge(&mut self, array: &ObjRef, index: usize, target: Option<&ObjRef>);

    fn visit_array_end(&mut self, array: &ArrayNode);

    fn visit_object_begin(&mut self, object: &ObjectNode);

    fn visit_object_primitive_field(&mut self, field: &PrimitiveField);

    /// Edge from `object` to the value of one of its reference fields.
    fn visit_object_field_edge(&mut self, object: &ObjRef, field: &ReferenceField);

    fn visit_object_end(&mut self, object: &ObjectNode);

    /// Finish the diagram and return its text.
    fn diagram_end(&mut self) -> String;
}
