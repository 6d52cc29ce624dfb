//! Unified error handling for objviz.
//!
//! Every fallible objviz call returns [`Result`]. An [`Error`] carries an
//! [`ErrorKind`], the operation that failed, key/value context naming the
//! object or field involved, and optionally the underlying error:
//!
//! ```rust
//! use objviz_error::{Error, ErrorKind};
//!
//! fn read_age() -> Result<(), Error> {
//!     Err(Error::field_access_denied("Person", "age").with_operation("inspect::shape"))
//! }
//!
//! let err = read_age().unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::FieldAccessDenied);
//! assert!(err.to_string().contains("field: age"));
//! ```
//!
//! Building a diagram is a pure in-memory computation, so there is no retry
//! status: every error aborts the build it occurred in.

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

pub type Result<T> = std::result::Result<T, Error>;
