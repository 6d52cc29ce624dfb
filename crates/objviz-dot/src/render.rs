//! DOT renderer driven by graph walker events.

use std::fmt::Write;

use tracing::debug;

use objviz_core::{ArrayNode, IdentityMap, ObjRef, ObjectNode, PrimitiveField, ReferenceField, Visitor};

use crate::dot::{escape_html, escape_label, write_indent};
use crate::options::DiagramConfig;
use crate::style::StyleSheet;

const NULL_NAME: &str = "NULL";

/// Node names handed out by a renderer.
///
/// Names are `n1`, `n2`, ... in order of first rendering. The cache is kept
/// separate from the renderer so a caller can share it between successive
/// drawings; a shared cache keeps names stable and draws the null node only
/// once over its whole lifetime. Call [`RenderCache::clear`] to start over.
#[derive(Clone, Default)]
pub struct RenderCache {
    labels: IdentityMap<String>,
    drawn_null: bool,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
        self.drawn_null = false;
    }

    /// Number of objects that have been given a name.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn drawn_null(&self) -> bool {
        self.drawn_null
    }

    fn dot_name(&mut self, obj: Option<&ObjRef>) -> String {
        match obj {
            None => NULL_NAME.to_string(),
            Some(obj) => self
                .labels
                .get_or_insert_with(obj, |len| format!("n{}", len + 1))
                .clone(),
        }
    }
}

/// Writes a DOT digraph with one HTML-like table node per object or array.
pub struct DotRenderer<'a> {
    out: String,
    config: &'a DiagramConfig,
    styles: &'a mut StyleSheet,
    cache: &'a mut RenderCache,
}

impl<'a> DotRenderer<'a> {
    pub fn new(
        config: &'a DiagramConfig,
        styles: &'a mut StyleSheet,
        cache: &'a mut RenderCache,
    ) -> Self {
        Self {
            out: String::with_capacity(4096),
            config,
            styles,
            cache,
        }
    }

    fn line(&mut self, level: usize, text: &str) {
        write_indent(&mut self.out, level);
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl Visitor for DotRenderer<'_> {
    fn diagram_begin(&mut self) {
        self.out.clear();
        self.out.push_str("digraph ObjectGraph {\n");
        let _ = writeln!(self.out, "\trankdir=\"{}\";", self.config.direction);
        self.line(1, "node[shape=plaintext]");
    }

    fn visit_null(&mut self) {
        if self.cache.drawn_null {
            return;
        }
        let _ = writeln!(self.out, "\t{NULL_NAME}[label=\"null\", shape=plaintext];");
        self.cache.drawn_null = true;
    }

    fn visit_array_begin(&mut self, array: &ArrayNode) {
        let name = self.cache.dot_name(Some(&array.value));
        let _ = writeln!(self.out, "\t{name}[label=<");
        if array.are_values_primitive() {
            self.line(2, "<table border='0' cellborder='1' cellspacing='0'>");
        } else {
            self.line(2, "<table border='0' cellborder='1' cellspacing='0' cellpadding='9'>");
        }
        self.line(3, "<tr>");
        let _ = writeln!(self.out, "\t\t\t\t<td>{}</td>", escape_html(&array.class_name));
    }

    fn visit_array_element(&mut self, array: &ArrayNode, element: &str, index: usize) {
        write_indent(&mut self.out, 4);
        self.out.push_str("<td");
        if !array.are_values_primitive() {
            let _ = write!(self.out, " port=\"f{index}\"");
        }
        let attrs = self.styles.element_attributes(array, index);
        self.out.push_str(&attrs);
        self.out.push('>');
        self.out.push_str(&escape_html(element));
        self.out.push_str("</td>\n");
    }

    fn visit_array_element_edge(&mut self, array: &ObjRef, index: usize, target: Option<&ObjRef>) {
        let from = self.cache.dot_name(Some(array));
        let to = self.cache.dot_name(target);
        let _ = writeln!(
            self.out,
            "\t{from}:f{index} -> {to}[label=\"{index}\",fontsize=12];"
        );
    }

    fn visit_array_end(&mut self, _array: &ArrayNode) {
        self.line(3, "</tr>");
        self.line(2, "</table>");
        self.line(1, ">];");
    }

    fn visit_object_begin(&mut self, object: &ObjectNode) {
        let name = self.cache.dot_name(Some(&object.value));
        let _ = writeln!(self.out, "\t{name}[label=<");
        self.line(2, "<table border='0' cellborder='1' cellspacing='0'>");

        self.line(3, "<tr>");
        write_indent(&mut self.out, 4);
        match object.primitive_fields_num() {
            0 => self.out.push_str("<td>"),
            n => {
                let _ = write!(self.out, "<td rowspan='{}'>", n + 1);
            }
        }
        self.out.push_str(&escape_html(&object.class_name));
        self.out.push_str("</td>\n");
        self.line(3, "</tr>");
    }

    fn visit_object_primitive_field(&mut self, field: &PrimitiveField) {
        self.line(3, "<tr>");
        write_indent(&mut self.out, 4);
        self.out.push_str("<td>");
        if self.config.show_field_names {
            self.out.push_str(&escape_html(&field.name));
            self.out.push_str(": ");
        }
        self.out.push_str(&escape_html(&field.text));
        self.out.push_str("</td>\n");
        self.line(3, "</tr>");
    }

    fn visit_object_field_edge(&mut self, object: &ObjRef, field: &ReferenceField) {
        let from = self.cache.dot_name(Some(object));
        let to = self.cache.dot_name(field.target.as_ref());
        let _ = write!(
            self.out,
            "\t{from} -> {to}[label=\"{}\",fontsize=12",
            escape_label(&field.name)
        );
        let attrs = self.styles.field_attributes(&field.name);
        if !attrs.is_empty() {
            self.out.push(',');
            self.out.push_str(attrs);
        }
        self.out.push_str("];\n");
    }

    fn visit_object_end(&mut self, object: &ObjectNode) {
        self.line(2, "</table>");
        self.out.push_str("\t>");
        let attrs = self.styles.object_attributes(object);
        if !attrs.is_empty() {
            self.out.push(',');
            self.out.push_str(&attrs);
        }
        self.out.push_str("];\n");
    }

    fn diagram_end(&mut self) -> String {
        self.out.push_str("}\n");
        self.styles.drawing_finished();
        debug!(
            bytes = self.out.len(),
            labels = self.cache.len(),
            "diagram rendered"
        );
        self.out.clone()
    }
}
