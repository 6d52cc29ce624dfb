//! Traversal core for drawing live object graphs.
//!
//! - [`object`]: the [`Inspect`] reflection capability and the value model
//! - [`introspect`]: [`FilterPolicy`], which classifies fields into inline values and edges
//! - [`walker`]: [`GraphWalker`], the identity-deduplicating depth-first traversal
//! - [`visit`]: the [`Visitor`] contract renderers implement

pub mod dynamic;
pub mod identity;
pub mod introspect;
pub mod node;
pub mod object;
pub mod visit;
pub mod walker;

pub use dynamic::{DynArray, DynObject};
pub use identity::IdentityMap;
pub use introspect::FilterPolicy;
pub use node::{ArrayNode, Node, ObjectNode, PrimitiveField, ReferenceField, Slot};
pub use object::{Field, Inspect, ObjRef, ObjectId, Shape, Value};
pub use objviz_error::{Error, ErrorKind, Result};
pub use visit::Visitor;
pub use walker::{GraphWalker, NodeId, VisitedSet};
