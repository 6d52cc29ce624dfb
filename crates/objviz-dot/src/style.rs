//! Styling policy: extra DOT attributes for edges, nodes and array cells.

use std::collections::HashMap;

use objviz_core::{ArrayNode, IdentityMap, ObjRef, ObjectId, ObjectNode, Slot};

/// Node attributes applied to objects first seen in the current drawing.
pub const NEW_OBJECT_ATTRIBUTES: &str = "style=filled,fillcolor=yellow";
/// Cell attributes applied to array slots whose content changed.
pub const CHANGED_ELEMENT_ATTRIBUTES: &str = "bgcolor=\"yellow\"";

/// Supplies whole-node attributes for an object.
pub trait ObjectAttributes {
    fn attributes(&mut self, object: &ObjectNode) -> Option<String>;

    /// Called once after every successfully finished drawing.
    fn drawing_finished(&mut self) {}

    /// Called instead of `drawing_finished` when a drawing fails; discard
    /// whatever was recorded for it.
    fn drawing_aborted(&mut self) {}
}

/// Supplies attributes for one array cell.
pub trait ElementAttributes {
    fn attributes(&mut self, array: &ArrayNode, index: usize) -> Option<String>;

    /// Called once after every successfully finished drawing.
    fn drawing_finished(&mut self) {}

    /// Called instead of `drawing_finished` when a drawing fails; discard
    /// whatever was recorded for it.
    fn drawing_aborted(&mut self) {}
}

/// All styling sources consulted by the renderer.
#[derive(Default)]
pub struct StyleSheet {
    field_attributes: HashMap<String, String>,
    class_attributes: HashMap<String, String>,
    object_providers: Vec<Box<dyn ObjectAttributes>>,
    element_providers: Vec<Box<dyn ElementAttributes>>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field_attribute(&mut self, field: impl Into<String>, attributes: impl Into<String>) {
        self.field_attributes.insert(field.into(), attributes.into());
    }

    pub fn add_class_attribute(&mut self, class: impl Into<String>, attributes: impl Into<String>) {
        self.class_attributes.insert(class.into(), attributes.into());
    }

    pub fn add_object_provider(&mut self, provider: Box<dyn ObjectAttributes>) {
        self.object_providers.push(provider);
    }

    pub fn add_element_provider(&mut self, provider: Box<dyn ElementAttributes>) {
        self.element_providers.push(provider);
    }

    /// Edge attributes for `field`, empty if none were registered.
    pub fn field_attributes(&self, field: &str) -> &str {
        self.field_attributes.get(field).map_or("", String::as_str)
    }

    /// Class attribute followed by every provider's attributes, comma-joined.
    pub fn object_attributes(&mut self, object: &ObjectNode) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(attrs) = self.class_attributes.get(&object.class_name) {
            parts.push(attrs.clone());
        }
        for provider in &mut self.object_providers {
            if let Some(attrs) = provider.attributes(object).filter(|a| !a.is_empty()) {
                parts.push(attrs);
            }
        }
        parts.join(",")
    }

    /// Cell attributes for `array[index]`, each preceded by a space.
    pub fn element_attributes(&mut self, array: &ArrayNode, index: usize) -> String {
        let mut attrs = String::new();
        for provider in &mut self.element_providers {
            if let Some(extra) = provider.attributes(array, index).filter(|a| !a.is_empty()) {
                attrs.push(' ');
                attrs.push_str(&extra);
            }
        }
        attrs
    }

    pub(crate) fn drawing_finished(&mut self) {
        for provider in &mut self.object_providers {
            provider.drawing_finished();
        }
        for provider in &mut self.element_providers {
            provider.drawing_finished();
        }
    }

    pub(crate) fn drawing_aborted(&mut self) {
        for provider in &mut self.object_providers {
            provider.drawing_aborted();
        }
        for provider in &mut self.element_providers {
            provider.drawing_aborted();
        }
    }
}

/// Highlights objects that were not part of the previous drawing.
///
/// Nothing is highlighted in the first drawing, since there is nothing to
/// compare against.
#[derive(Default)]
pub struct NewObjectHighlighter {
    previous: Option<IdentityMap<()>>,
    current: IdentityMap<()>,
}

impl ObjectAttributes for NewObjectHighlighter {
    fn attributes(&mut self, object: &ObjectNode) -> Option<String> {
        self.current.insert(&object.value, ());
        match &self.previous {
            Some(previous) if !previous.contains(&object.value) => {
                Some(NEW_OBJECT_ATTRIBUTES.to_string())
            }
            _ => None,
        }
    }

    fn drawing_finished(&mut self) {
        self.previous = Some(std::mem::take(&mut self.current));
    }

    fn drawing_aborted(&mut self) {
        self.current.clear();
    }
}

/// Content of one slot, compared across drawings.
enum SlotState {
    Literal(String),
    Null,
    Object(ObjRef),
}

impl SlotState {
    fn of(slot: &Slot) -> Self {
        match slot {
            Slot::Literal(text) => SlotState::Literal(text.clone()),
            Slot::Reference(None) => SlotState::Null,
            Slot::Reference(Some(obj)) => SlotState::Object(obj.clone()),
        }
    }

    fn same_as(&self, other: &SlotState) -> bool {
        match (self, other) {
            (SlotState::Literal(a), SlotState::Literal(b)) => a == b,
            (SlotState::Null, SlotState::Null) => true,
            (SlotState::Object(a), SlotState::Object(b)) => ObjectId::of(a) == ObjectId::of(b),
            _ => false,
        }
    }
}

/// Highlights array cells whose value (or referenced object) differs from the
/// same array in the previous drawing.
///
/// Arrays that did not exist in the previous drawing are left alone.
#[derive(Default)]
pub struct ChangedElementHighlighter {
    previous: IdentityMap<Vec<SlotState>>,
    current: IdentityMap<Vec<SlotState>>,
}

impl ElementAttributes for ChangedElementHighlighter {
    fn attributes(&mut self, array: &ArrayNode, index: usize) -> Option<String> {
        let current = self
            .current
            .get_or_insert_with(&array.value, |_| array.elements.iter().map(SlotState::of).collect());
        let previous = self.previous.get(&array.value)?;
        let changed = match (previous.get(index), current.get(index)) {
            (Some(old), Some(new)) => !old.same_as(new),
            (None, Some(_)) => true,
            _ => false,
        };
        changed.then(|| CHANGED_ELEMENT_ATTRIBUTES.to_string())
    }

    fn drawing_finished(&mut self) {
        self.previous = std::mem::take(&mut self.current);
    }

    fn drawing_aborted(&mut self) {
        self.current.clear();
    }
}
