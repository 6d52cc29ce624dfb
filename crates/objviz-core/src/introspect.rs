//! Field filtering and classification.
//!
//! [`FilterPolicy`] turns the raw [`Shape`] an object reports into a [`Node`]
//! descriptor: which fields are shown, which are rendered inline, and which
//! become edges to other nodes.

use std::collections::HashSet;

use objviz_error::Result;

use crate::node::{ArrayNode, Node, ObjectNode, PrimitiveField, ReferenceField, Slot};
use crate::object::{Field, ObjRef, Shape, Value};

const NULL_TEXT: &str = "null";

/// Which fields to show and which classes to render inline.
#[derive(Debug, Clone, Default)]
pub struct FilterPolicy {
    /// Class names whose instances render as literals instead of nodes.
    pub treat_as_primitive: HashSet<String>,
    /// Field names hidden on every class.
    pub ignore_fields: HashSet<String>,
    pub ignore_private_fields: bool,
    pub ignore_null_fields: bool,
}

impl FilterPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_treat_as_primitive(mut self, class: impl Into<String>) -> Self {
        self.treat_as_primitive.insert(class.into());
        self
    }

    pub fn with_ignore_field(mut self, name: impl Into<String>) -> Self {
        self.ignore_fields.insert(name.into());
        self
    }

    pub fn with_ignore_private_fields(mut self, ignore: bool) -> Self {
        self.ignore_private_fields = ignore;
        self
    }

    pub fn with_ignore_null_fields(mut self, ignore: bool) -> Self {
        self.ignore_null_fields = ignore;
        self
    }

    pub fn is_treated_as_primitive(&self, class: &str) -> bool {
        self.treat_as_primitive.contains(class)
    }

    /// Describe `obj` as a node, extracting its fields once.
    pub fn describe(&self, obj: &ObjRef) -> Result<Node> {
        let class_name = obj.class_name();
        let shape = obj.shape().map_err(|err| {
            err.with_operation("introspect::describe")
                .with_context("object", class_name.clone())
        })?;

        let node = match shape {
            Shape::Object(fields) => Node::Object(self.object_node(obj, class_name, fields)),
            Shape::Array {
                component,
                primitive,
                elements,
            } => {
                let primitive = primitive || self.is_treated_as_primitive(&component);
                Node::Array(ArrayNode {
                    value: obj.clone(),
                    class_name,
                    primitive,
                    elements: elements
                        .into_iter()
                        .map(|element| self.slot(element, primitive))
                        .collect(),
                })
            }
        };
        Ok(node)
    }

    fn is_shown(&self, field: &Field) -> bool {
        !(self.ignore_fields.contains(&field.name)
            || (self.ignore_private_fields && !field.public)
            || (self.ignore_null_fields && field.value.is_null()))
    }

    fn object_node(&self, obj: &ObjRef, class_name: String, fields: Vec<Field>) -> ObjectNode {
        let mut primitive_fields = Vec::new();
        let mut reference_fields = Vec::new();

        for field in fields.into_iter().filter(|field| self.is_shown(field)) {
            match field.value {
                Value::Primitive(text) => primitive_fields.push(PrimitiveField {
                    name: field.name,
                    text,
                }),
                Value::Ref(child) if self.is_treated_as_primitive(&child.class_name()) => {
                    primitive_fields.push(PrimitiveField {
                        name: field.name,
                        text: child.display(),
                    })
                }
                Value::Ref(child) => reference_fields.push(ReferenceField {
                    name: field.name,
                    target: Some(child),
                }),
                Value::Null => reference_fields.push(ReferenceField {
                    name: field.name,
                    target: None,
                }),
            }
        }

        ObjectNode {
            value: obj.clone(),
            class_name,
            primitive_fields,
            reference_fields,
        }
    }

    fn slot(&self, element: Value, primitive: bool) -> Slot {
        match element {
            Value::Primitive(text) => Slot::Literal(text),
            Value::Null if primitive => Slot::Literal(NULL_TEXT.to_string()),
            Value::Null => Slot::Reference(None),
            Value::Ref(child) if primitive || self.is_treated_as_primitive(&child.class_name()) => {
                Slot::Literal(child.display())
            }
            Value::Ref(child) => Slot::Reference(Some(child)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DynArray, DynObject};

    fn describe_object(policy: &FilterPolicy, obj: &ObjRef) -> ObjectNode {
        match policy.describe(obj).unwrap() {
            Node::Object(node) => node,
            _ => panic!("expected object node"),
        }
    }

    #[test]
    fn classifies_fields_by_value_and_policy() {
        let name = DynObject::new("String").with_display("Albert").into_ref();
        let gender = DynObject::new("Gender").with_display("MALE").into_ref();
        let person = DynObject::new("Person")
            .with_private_field("name", name)
            .with_private_field("gender", gender)
            .with_field("age", Value::primitive(35))
            .with_field("spouse", Value::Null)
            .into_ref();

        let policy = FilterPolicy::new().with_treat_as_primitive("String");
        let node = describe_object(&policy, &person);

        assert_eq!(
            node.primitive_fields,
            vec![
                PrimitiveField {
                    name: "name".into(),
                    text: "Albert".into()
                },
                PrimitiveField {
                    name: "age".into(),
                    text: "35".into()
                },
            ]
        );
        let refs: Vec<_> = node.reference_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(refs, ["gender", "spouse"]);
        assert!(node.reference_fields[1].target.is_none());
    }

    #[test]
    fn filters_ignored_private_and_null_fields() {
        let obj = DynObject::new("Entry")
            .with_field("hash", Value::primitive(42))
            .with_private_field("secret", Value::primitive(1))
            .with_field("next", Value::Null)
            .with_field("key", Value::primitive("k"))
            .into_ref();

        let policy = FilterPolicy::new()
            .with_ignore_field("hash")
            .with_ignore_private_fields(true)
            .with_ignore_null_fields(true);
        let node = describe_object(&policy, &obj);

        assert_eq!(node.primitive_fields_num(), 1);
        assert_eq!(node.primitive_fields[0].name, "key");
        assert!(node.reference_fields.is_empty());
    }

    #[test]
    fn array_treated_as_primitive_renders_literals() {
        let a = DynObject::new("String").with_display("a").into_ref();
        let strings = DynArray::of_refs("String", vec![Value::Ref(a), Value::Null]).into_ref();

        let policy = FilterPolicy::new().with_treat_as_primitive("String");
        let Node::Array(node) = policy.describe(&strings).unwrap() else {
            panic!("expected array node");
        };

        assert!(node.are_values_primitive());
        assert_eq!(node.element_text(0), "a");
        assert_eq!(node.element_text(1), "null");
    }

    #[test]
    fn reference_array_keeps_children() {
        let child = DynObject::new("Item").into_ref();
        let items = DynArray::of_refs("Item", vec![Value::Ref(child), Value::Null]).into_ref();

        let Node::Array(node) = FilterPolicy::new().describe(&items).unwrap() else {
            panic!("expected array node");
        };

        assert!(!node.are_values_primitive());
        assert!(matches!(node.elements[0], Slot::Reference(Some(_))));
        assert!(matches!(node.elements[1], Slot::Reference(None)));
        assert_eq!(node.element_text(0), "");
    }
}
