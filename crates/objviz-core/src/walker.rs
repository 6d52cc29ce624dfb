//! Depth-first traversal of a live object graph.

use tracing::{debug, trace};

use objviz_error::Result;

use crate::identity::IdentityMap;
use crate::introspect::FilterPolicy;
use crate::node::{ArrayNode, Node, ObjectNode, Slot};
use crate::object::ObjRef;
use crate::visit::Visitor;

/// Remaining stack below which recursion switches to a fresh segment.
const RED_ZONE: usize = 64 * 1024;
/// Size of each additional stack segment.
const STACK_SEGMENT: usize = 1024 * 1024;

/// Walker-internal identifier of a discovered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Objects discovered so far in one traversal.
///
/// Grows monotonically and is dropped together with its walker.
#[derive(Default)]
pub struct VisitedSet {
    ids: IdentityMap<NodeId>,
    null_visited: bool,
}

impl VisitedSet {
    pub fn node_id(&self, obj: &ObjRef) -> Option<NodeId> {
        self.ids.get(obj).copied()
    }

    /// Assign the next id to `obj`, or return `None` if it already has one.
    fn discover(&mut self, obj: &ObjRef) -> Option<NodeId> {
        if self.ids.contains(obj) {
            return None;
        }
        let id = NodeId(self.ids.len() as u32);
        self.ids.insert(obj, id);
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn null_visited(&self) -> bool {
        self.null_visited
    }
}

/// Walks an object graph from a list of roots, visiting every reachable
/// object exactly once.
///
/// A walker is single-use: [`GraphWalker::traverse`] consumes it, so every
/// build starts from an empty [`VisitedSet`].
pub struct GraphWalker<'p> {
    policy: &'p FilterPolicy,
    visited: VisitedSet,
}

impl<'p> GraphWalker<'p> {
    pub fn new(policy: &'p FilterPolicy) -> Self {
        Self {
            policy,
            visited: VisitedSet::default(),
        }
    }

    /// Visit `roots` in order, reporting discoveries to `visitor`.
    ///
    /// The first introspection failure aborts the traversal.
    pub fn traverse<V>(mut self, roots: &[Option<ObjRef>], visitor: &mut V) -> Result<()>
    where
        V: Visitor + ?Sized,
    {
        for root in roots {
            self.visit_target(root.as_ref(), visitor)?;
        }
        debug!(
            nodes = self.visited.len(),
            null = self.visited.null_visited(),
            roots = roots.len(),
            "object graph traversed"
        );
        Ok(())
    }

    fn visit_target<V>(&mut self, target: Option<&ObjRef>, visitor: &mut V) -> Result<()>
    where
        V: Visitor + ?Sized,
    {
        match target {
            None => {
                self.visited.null_visited = true;
                visitor.visit_null();
                Ok(())
            }
            Some(obj) => stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || self.visit(obj, visitor)),
        }
    }

    fn visit<V>(&mut self, obj: &ObjRef, visitor: &mut V) -> Result<()>
    where
        V: Visitor + ?Sized,
    {
        let Some(id) = self.visited.discover(obj) else {
            return Ok(());
        };

        let node = self
            .policy
            .describe(obj)
            .map_err(|err| err.with_operation("walker::visit"))?;
        match node {
            Node::Array(array) => {
                trace!(node = id.as_u32(), class = %array.class_name, len = array.elements.len(), "array");
                self.visit_array(&array, visitor)
            }
            Node::Object(object) => {
                trace!(node = id.as_u32(), class = %object.class_name, "object");
                self.visit_object(&object, visitor)
            }
        }
    }

    fn visit_array<V>(&mut self, array: &ArrayNode, visitor: &mut V) -> Result<()>
    where
        V: Visitor + ?Sized,
    {
        visitor.visit_array_begin(array);
        for index in 0..array.elements.len() {
            visitor.visit_array_element(array, array.element_text(index), index);
        }
        visitor.visit_array_end(array);

        for (index, slot) in array.elements.iter().enumerate() {
            if let Slot::Reference(target) = slot {
                self.visit_target(target.as_ref(), visitor)?;
                visitor.visit_array_element_edge(&array.value, index, target.as_ref());
            }
        }
        Ok(())
    }

    fn visit_object<V>(&mut self, object: &ObjectNode, visitor: &mut V) -> Result<()>
    where
        V: Visitor + ?Sized,
    {
        visitor.visit_object_begin(object);
        for field in &object.primitive_fields {
            visitor.visit_object_primitive_field(field);
        }
        visitor.visit_object_end(object);

        for field in &object.reference_fields {
            self.visit_target(field.target.as_ref(), visitor)?;
            visitor.visit_object_field_edge(&object.value, field);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{PrimitiveField, ReferenceField};
    use crate::object::{Inspect, ObjectId, Shape, Value};
    use crate::{DynArray, DynObject};
    use objviz_error::{Error, ErrorKind};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Records events, naming objects by their order of first appearance.
    #[derive(Default)]
    struct Recorder {
        names: HashMap<ObjectId, String>,
        events: Vec<String>,
    }

    impl Recorder {
        fn name(&mut self, obj: &ObjRef) -> String {
            let next = format!("o{}", self.names.len() + 1);
            self.names.entry(ObjectId::of(obj)).or_insert(next).clone()
        }

        fn target(&mut self, target: Option<&ObjRef>) -> String {
            target.map_or_else(|| "null".to_string(), |obj| self.name(obj))
        }
    }

    impl Visitor for Recorder {
        fn diagram_begin(&mut self) {
            self.events.clear();
        }

        fn visit_null(&mut self) {
            self.events.push("null".into());
        }

        fn visit_array_begin(&mut self, array: &ArrayNode) {
            let name = self.name(&array.value);
            self.events.push(format!("array {name} {}", array.class_name));
        }

        fn visit_array_element(&mut self, _array: &ArrayNode, element: &str, index: usize) {
            self.events.push(format!("  [{index}]={element}"));
        }

        fn visit_array_element_edge(&mut self, array: &ObjRef, index: usize, target: Option<&ObjRef>) {
            let from = self.name(array);
            let to = self.target(target);
            self.events.push(format!("{from}[{index}] -> {to}"));
        }

        fn visit_array_end(&mut self, _array: &ArrayNode) {
            self.events.push("end".into());
        }

        fn visit_object_begin(&mut self, object: &ObjectNode) {
            let name = self.name(&object.value);
            self.events.push(format!(
                "object {name} {} ({})",
                object.class_name,
                object.primitive_fields_num()
            ));
        }

        fn visit_object_primitive_field(&mut self, field: &PrimitiveField) {
            self.events.push(format!("  {}={}", field.name, field.text));
        }

        fn visit_object_field_edge(&mut self, object: &ObjRef, field: &ReferenceField) {
            let from = self.name(object);
            let to = self.target(field.target.as_ref());
            self.events.push(format!("{from}.{} -> {to}", field.name));
        }

        fn visit_object_end(&mut self, _object: &ObjectNode) {
            self.events.push("end".into());
        }

        fn diagram_end(&mut self) -> String {
            self.events.join("\n")
        }
    }

    fn walk(policy: &FilterPolicy, roots: &[Option<ObjRef>]) -> Vec<String> {
        let mut recorder = Recorder::default();
        recorder.diagram_begin();
        GraphWalker::new(policy).traverse(roots, &mut recorder).unwrap();
        recorder.events
    }

    #[test]
    fn cycle_is_described_once_with_back_edges() {
        let a = DynObject::new("Node").shared();
        let b = DynObject::new("AnotherNode")
            .with_field("left", Value::Null)
            .shared();
        let c = DynObject::new("AnotherNode").shared();
        a.set_field("left", b.clone() as ObjRef);
        a.set_field("right", c.clone() as ObjRef);
        c.set_field("left", a.clone() as ObjRef);
        c.set_field("right", a.clone() as ObjRef);
        b.set_field("left", a.clone() as ObjRef);

        let events = walk(&FilterPolicy::new(), &[Some(a as ObjRef)]);

        assert_eq!(
            events,
            vec![
                "object o1 Node (0)",
                "end",
                "object o2 AnotherNode (0)",
                "end",
                "o2.left -> o1",
                "o1.left -> o2",
                "object o3 AnotherNode (0)",
                "end",
                "o3.left -> o1",
                "o3.right -> o1",
                "o1.right -> o3",
            ]
        );
    }

    #[test]
    fn repeated_roots_collapse_by_identity() {
        let p = DynObject::new("Person")
            .with_field("age", Value::primitive(35))
            .into_ref();
        let p2 = DynObject::new("Person")
            .with_field("age", Value::primitive(35))
            .into_ref();
        let roots = [Some(p.clone()), Some(p.clone()), Some(p), Some(p2)];

        let events = walk(&FilterPolicy::new(), &roots);
        let objects = events.iter().filter(|e| e.starts_with("object")).count();

        assert_eq!(objects, 2);
    }

    #[test]
    fn reference_array_visits_children_then_edges() {
        let shared = DynObject::new("Item").into_ref();
        let array = DynArray::of_refs(
            "Item",
            vec![Value::Ref(shared.clone()), Value::Null, Value::Ref(shared)],
        )
        .into_ref();

        let events = walk(&FilterPolicy::new(), &[Some(array)]);

        assert_eq!(
            events,
            vec![
                "array o1 Item[]",
                "  [0]=",
                "  [1]=",
                "  [2]=",
                "end",
                "object o2 Item (0)",
                "end",
                "o1[0] -> o2",
                "null",
                "o1[1] -> null",
                "o1[2] -> o2",
            ]
        );
    }

    #[test]
    fn primitive_array_has_no_edges() {
        let array = DynArray::of_primitive(
            "int",
            vec![Value::primitive(1), Value::primitive(2), Value::primitive(3)],
        )
        .into_ref();

        let events = walk(&FilterPolicy::new(), &[Some(array)]);

        assert_eq!(
            events,
            vec!["array o1 int[]", "  [0]=1", "  [1]=2", "  [2]=3", "end"]
        );
    }

    #[test]
    fn null_roots_are_reported_each_time() {
        let events = walk(&FilterPolicy::new(), &[None, None]);
        assert_eq!(events, vec!["null", "null"]);
    }

    struct Unreadable;

    impl Inspect for Unreadable {
        fn class_name(&self) -> String {
            "Unreadable".into()
        }

        fn shape(&self) -> objviz_error::Result<Shape> {
            Err(Error::field_access_denied("Unreadable", "secret"))
        }
    }

    #[test]
    fn failed_field_read_aborts_traversal() {
        let holder = DynObject::new("Holder")
            .with_field("inner", std::rc::Rc::new(Unreadable) as ObjRef)
            .into_ref();
        let mut recorder = Recorder::default();

        let err = GraphWalker::new(&FilterPolicy::new())
            .traverse(&[Some(holder)], &mut recorder)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::FieldAccessDenied);
        assert_eq!(err.operation(), "walker::visit");
        assert!(!recorder.events.iter().any(|e| e.contains("->")));
    }

    #[test]
    fn visited_set_assigns_ids_once() {
        let obj = DynObject::new("A").into_ref();
        let mut visited = VisitedSet::default();

        assert_eq!(visited.discover(&obj), Some(NodeId(0)));
        assert_eq!(visited.discover(&obj), None);
        assert_eq!(visited.node_id(&obj), Some(NodeId(0)));
        assert_eq!(visited.len(), 1);
        assert!(!visited.null_visited());
    }
}
