//! The error type shared by every objviz crate.

use std::fmt;

use crate::ErrorKind;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An objviz failure: what kind, where, and about which object.
///
/// `operation` names the innermost call that reported the failure. Wrapping
/// layers call [`Error::with_operation`] again, pushing the previous name into
/// the context so the display shows the whole path.
pub struct Error {
    kind: ErrorKind,
    message: String,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<BoxedSource>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Innermost operation name, or `""` if none was recorded.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Key/value pairs in the order they were attached.
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    pub fn source_ref(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Record `operation`, demoting any earlier one to a `called` context entry.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        let previous = std::mem::replace(&mut self.operation, operation);
        if !previous.is_empty() {
            self.context.push(("called", previous.to_string()));
        }
        self
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Attach the underlying error. Setting it twice is a bug.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(Box::new(source));
        self
    }

    fn write_context(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs = self.context.iter();
        if let Some((key, value)) = pairs.next() {
            write!(f, ", context {{ {key}: {value}")?;
            for (key, value) in pairs {
                write!(f, ", {key}: {value}")?;
            }
            f.write_str(" }")?;
        }
        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }
        self.write_context(f)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Error");
        debug.field("kind", &self.kind);
        if !self.operation.is_empty() {
            debug.field("operation", &self.operation);
        }
        debug.field("message", &self.message);
        if !self.context.is_empty() {
            debug.field("context", &self.context);
        }
        if let Some(source) = &self.source {
            debug.field("source", source);
        }
        debug.finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_deref().map(|err| err as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Self::new(kind, err.to_string()).with_operation("io").set_source(err)
    }
}

impl Error {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// A config file or option could not be understood.
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Reading `class.field` from a live object failed.
    pub fn field_access_denied(class: impl Into<String>, field: impl Into<String>) -> Self {
        let class = class.into();
        let field = field.into();
        Self::new(
            ErrorKind::FieldAccessDenied,
            format!("cannot read field '{}' of '{}'", field, class),
        )
        .with_context("class", class)
        .with_context("field", field)
    }

    pub fn introspection_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IntrospectionFailed, message)
    }

    /// A snapshot refers to `id` without defining it.
    pub fn dangling_reference(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(
            ErrorKind::DanglingReference,
            format!("object '{}' is referenced but never defined", id),
        )
        .with_context("id", id)
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(ErrorKind::FileNotFound, format!("file '{}' not found", path))
            .with_context("path", path)
    }
}
