//! JSON heap snapshots.
//!
//! A snapshot lists objects by id and the roots to draw:
//!
//! ```json
//! {
//!   "roots": ["albert", null],
//!   "objects": {
//!     "albert": {
//!       "class": "Person",
//!       "fields": [
//!         { "name": "age", "value": 35 },
//!         { "name": "friends", "public": false, "value": { "ref": "friends" } }
//!       ]
//!     },
//!     "friends": { "component": "Person", "elements": [null] }
//!   }
//! }
//! ```
//!
//! Scalars become primitive values, `null` is null, and `{"ref": id}` points
//! at another object. Objects are wired up after all of them exist, so
//! snapshots may contain cycles.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value as Json;

use objviz_core::{DynArray, DynObject, Error, ErrorKind, Field, ObjRef, Result, Value};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    #[serde(default)]
    roots: Vec<Option<String>>,
    #[serde(default)]
    objects: BTreeMap<String, NodeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeSpec {
    Array(ArraySpec),
    Object(ObjectSpec),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArraySpec {
    component: String,
    #[serde(default)]
    primitive: bool,
    elements: Vec<Json>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ObjectSpec {
    class: String,
    display: Option<String>,
    #[serde(default)]
    fields: Vec<FieldSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldSpec {
    name: String,
    #[serde(default = "default_public")]
    public: bool,
    #[serde(default)]
    value: Json,
}

fn default_public() -> bool {
    true
}

enum Built {
    Object(Rc<DynObject>),
    Array(Rc<DynArray>),
}

impl Built {
    fn obj_ref(&self) -> ObjRef {
        match self {
            Built::Object(obj) => obj.clone(),
            Built::Array(array) => array.clone(),
        }
    }
}

impl Snapshot {
    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|err| {
            Error::new(ErrorKind::DeserializationFailed, err.to_string())
                .with_operation("snapshot::from_json_str")
                .set_source(err)
        })
    }

    /// Read a snapshot from `path`, or from stdin when `path` is `-`.
    pub fn load(path: &str) -> Result<Self> {
        let source = if path == "-" {
            std::io::read_to_string(std::io::stdin())?
        } else if Path::new(path).exists() {
            std::fs::read_to_string(path).map_err(|err| Error::from(err).with_context("path", path))?
        } else {
            return Err(Error::file_not_found(path).with_operation("snapshot::load"));
        };
        Self::from_json_str(&source).map_err(|err| err.with_context("path", path))
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Create live objects for every entry and return the roots in order.
    pub fn instantiate(&self) -> Result<Vec<Option<ObjRef>>> {
        let built: HashMap<&str, Built> = self
            .objects
            .iter()
            .map(|(id, spec)| {
                let node = match spec {
                    NodeSpec::Array(array) => {
                        let elements = vec![Value::Null; array.elements.len()];
                        let array = if array.primitive {
                            DynArray::of_primitive(array.component.clone(), elements)
                        } else {
                            DynArray::of_refs(array.component.clone(), elements)
                        };
                        Built::Array(array.shared())
                    }
                    NodeSpec::Object(object) => {
                        let mut obj = DynObject::new(object.class.clone());
                        if let Some(display) = &object.display {
                            obj = obj.with_display(display.clone());
                        }
                        Built::Object(obj.shared())
                    }
                };
                (id.as_str(), node)
            })
            .collect();

        for (id, spec) in &self.objects {
            match (spec, &built[id.as_str()]) {
                (NodeSpec::Array(spec), Built::Array(array)) => {
                    for (index, element) in spec.elements.iter().enumerate() {
                        array.set(index, resolve(element, &built)?);
                    }
                }
                (NodeSpec::Object(spec), Built::Object(obj)) => {
                    for field in &spec.fields {
                        let value = resolve(&field.value, &built)
                            .map_err(|err| err.with_context("field", field.name.clone()))?;
                        obj.add_field(Field {
                            name: field.name.clone(),
                            public: field.public,
                            value,
                        });
                    }
                }
                _ => return Err(Error::unexpected("snapshot node kind changed while wiring")),
            }
        }

        self.roots
            .iter()
            .map(|root| match root {
                None => Ok(None),
                Some(id) => built
                    .get(id.as_str())
                    .map(|node| Some(node.obj_ref()))
                    .ok_or_else(|| {
                        Error::dangling_reference(id.clone()).with_operation("snapshot::instantiate")
                    }),
            })
            .collect()
    }
}

fn resolve(json: &Json, built: &HashMap<&str, Built>) -> Result<Value> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::primitive(b)),
        Json::Number(n) => Ok(Value::primitive(n)),
        Json::String(s) => Ok(Value::Primitive(s.clone())),
        Json::Object(map) => match map.get("ref") {
            Some(Json::String(id)) if map.len() == 1 => built
                .get(id.as_str())
                .map(|node| Value::Ref(node.obj_ref()))
                .ok_or_else(|| {
                    Error::dangling_reference(id.clone()).with_operation("snapshot::instantiate")
                }),
            _ => Err(invalid_value(json)),
        },
        Json::Array(_) => Err(invalid_value(json)),
    }
}

fn invalid_value(json: &Json) -> Error {
    Error::new(
        ErrorKind::InvalidFormat,
        format!("expected null, a scalar or {{\"ref\": id}}, found {json}"),
    )
    .with_operation("snapshot::instantiate")
}
