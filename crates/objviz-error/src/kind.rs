//! Error kinds for objviz operations

use strum_macros::{Display, IntoStaticStr};

/// What went wrong, independent of where.
///
/// Match on this to decide how to report a failed build; the message and
/// context are for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Catch-all for failures with no better kind
    Unexpected,
    /// A config file or option value was rejected
    ConfigInvalid,
    InvalidArgument,

    // Reading live objects
    /// A field could not be read from a live object
    FieldAccessDenied,
    /// An object could not describe its own shape
    IntrospectionFailed,
    /// A snapshot refers to an object id that does not exist
    DanglingReference,

    // Files
    FileNotFound,
    PermissionDenied,
    IoFailed,

    // Snapshot and config decoding
    DeserializationFailed,
    /// Well-formed input whose values have the wrong form
    InvalidFormat,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}
