//! Render live object graphs as Graphviz DOT.
//!
//! # Module Structure
//!
//! - [`dot`]: DOT quoting helpers
//! - [`options`]: [`DiagramConfig`] and [`Direction`]
//! - [`render`]: [`DotRenderer`], the [`Visitor`] that writes DOT text
//! - [`style`]: field/class/object/element attributes and the highlighters
//!
//! [`Diagram`] ties them together with a [`GraphWalker`]:
//!
//! ```
//! use objviz_core::{DynObject, Value};
//! use objviz_dot::Diagram;
//!
//! let point = DynObject::new("Point")
//!     .with_field("x", Value::primitive(1))
//!     .into_ref();
//! let dot = Diagram::new().draw_graph(point).unwrap();
//! assert!(dot.contains("x: 1"));
//! ```

pub mod dot;
pub mod options;
pub mod render;
pub mod style;

use objviz_core::{GraphWalker, ObjRef, Result, Visitor};

pub use options::{DiagramConfig, Direction};
pub use render::{DotRenderer, RenderCache};
pub use style::{
    ChangedElementHighlighter, ElementAttributes, NewObjectHighlighter, ObjectAttributes,
    StyleSheet,
};

/// Render `roots` once with `config`.
pub fn render_graph(roots: &[Option<ObjRef>], config: &DiagramConfig) -> Result<String> {
    Diagram::from_config(config.clone()).draw(roots)
}

/// A reusable diagram builder.
///
/// Configuration and styling persist across drawings, as does the history
/// used by the highlighters. Node names are fresh for every drawing unless
/// [`Diagram::with_retain_labels`] is enabled.
pub struct Diagram {
    config: DiagramConfig,
    styles: StyleSheet,
    cache: RenderCache,
    roots: Vec<Option<ObjRef>>,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    pub fn new() -> Self {
        Self::from_config(DiagramConfig::default())
    }

    pub fn from_config(config: DiagramConfig) -> Self {
        let mut styles = StyleSheet::new();
        for (field, attrs) in &config.field_attributes {
            styles.add_field_attribute(field.clone(), attrs.clone());
        }
        for (class, attrs) in &config.class_attributes {
            styles.add_class_attribute(class.clone(), attrs.clone());
        }
        if config.highlight_new_objects {
            styles.add_object_provider(Box::new(NewObjectHighlighter::default()));
        }
        if config.highlight_changed_elements {
            styles.add_element_provider(Box::new(ChangedElementHighlighter::default()));
        }
        Self {
            config,
            styles,
            cache: RenderCache::new(),
            roots: Vec::new(),
        }
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.config.direction = direction;
        self
    }

    pub fn with_treat_as_primitive(mut self, class: impl Into<String>) -> Self {
        self.config.treat_as_primitive.push(class.into());
        self
    }

    pub fn with_ignore_field(mut self, field: impl Into<String>) -> Self {
        self.config.ignore_fields.push(field.into());
        self
    }

    pub fn with_show_field_names(mut self, show: bool) -> Self {
        self.config.show_field_names = show;
        self
    }

    pub fn with_ignore_null_fields(mut self, ignore: bool) -> Self {
        self.config.ignore_null_fields = ignore;
        self
    }

    pub fn with_ignore_private_fields(mut self, ignore: bool) -> Self {
        self.config.ignore_private_fields = ignore;
        self
    }

    pub fn with_field_attribute(mut self, field: &str, attributes: &str) -> Self {
        self.config
            .field_attributes
            .insert(field.to_string(), attributes.to_string());
        self.styles.add_field_attribute(field, attributes);
        self
    }

    pub fn with_class_attribute(mut self, class: &str, attributes: &str) -> Self {
        self.config
            .class_attributes
            .insert(class.to_string(), attributes.to_string());
        self.styles.add_class_attribute(class, attributes);
        self
    }

    pub fn with_object_attributes(mut self, provider: impl ObjectAttributes + 'static) -> Self {
        self.styles.add_object_provider(Box::new(provider));
        self
    }

    pub fn with_element_attributes(mut self, provider: impl ElementAttributes + 'static) -> Self {
        self.styles.add_element_provider(Box::new(provider));
        self
    }

    /// Fill objects that were absent from the previous drawing.
    pub fn with_highlight_new_objects(mut self) -> Self {
        if !self.config.highlight_new_objects {
            self.config.highlight_new_objects = true;
            self.styles
                .add_object_provider(Box::new(NewObjectHighlighter::default()));
        }
        self
    }

    /// Color array cells that changed since the previous drawing.
    pub fn with_highlight_changed_elements(mut self) -> Self {
        if !self.config.highlight_changed_elements {
            self.config.highlight_changed_elements = true;
            self.styles
                .add_element_provider(Box::new(ChangedElementHighlighter::default()));
        }
        self
    }

    /// Share node names and the null node between successive drawings.
    pub fn with_retain_labels(mut self, retain: bool) -> Self {
        self.config.retain_labels = retain;
        self
    }

    /// Queue a root for [`Diagram::draw_roots`]; `None` draws the null node.
    pub fn add_root(&mut self, root: impl Into<Option<ObjRef>>) -> &mut Self {
        self.roots.push(root.into());
        self
    }

    pub fn clear_roots(&mut self) {
        self.roots.clear();
    }

    /// Forget retained node names.
    pub fn reset_labels(&mut self) {
        self.cache.clear();
    }

    /// Draw a single root.
    pub fn draw_graph(&mut self, root: impl Into<Option<ObjRef>>) -> Result<String> {
        self.draw(&[root.into()])
    }

    /// Draw every queued root, in the order they were added.
    pub fn draw_roots(&mut self) -> Result<String> {
        let roots = std::mem::take(&mut self.roots);
        let result = self.draw(&roots);
        self.roots = roots;
        result
    }

    /// Draw `roots` in order; an object reachable from several roots is drawn once.
    ///
    /// A failed drawing leaves labels and highlighter history as they were.
    pub fn draw(&mut self, roots: &[Option<ObjRef>]) -> Result<String> {
        let policy = self.config.filter_policy();
        let mut cache = if self.config.retain_labels {
            self.cache.clone()
        } else {
            RenderCache::new()
        };

        let result = {
            let mut renderer = DotRenderer::new(&self.config, &mut self.styles, &mut cache);
            renderer.diagram_begin();
            GraphWalker::new(&policy)
                .traverse(roots, &mut renderer)
                .map(|()| renderer.diagram_end())
        };

        match result {
            Ok(dot) => {
                if self.config.retain_labels {
                    self.cache = cache;
                }
                Ok(dot)
            }
            Err(err) => {
                self.styles.drawing_aborted();
                Err(err.with_operation("diagram::draw"))
            }
        }
    }
}
