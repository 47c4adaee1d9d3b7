//! Convenient re-exports for common usage patterns.
//!
//! This module provides a single import to bring all commonly used types
//! into scope.
//!
//! # Example
//!
//! ```ignore
//! use funcweb::prelude::*;
//!
//! let func = WebFunction::new(
//!     "greet",
//!     vec![ParamDecl::new("name", TypeDecl::text()).with_default(Value::Text("World".into()))],
//!     |args| Ok(ReturnValue::Text(format!("Hello, {}!", args.get("name").map(|v| v.to_string()).unwrap_or_default()))),
//! )?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Schema types
pub use crate::schema::{
    Bound, ConstraintSet, DefaultDecl, Kind, ParamDecl, ParamInfo, Schema, SchemaError, TypeDecl,
    Value, Violation, extract,
};

// Form marshalling
pub use crate::form::{Args, FieldDescriptor, RawValue, ValidationError, Widget, build_fields, coerce};

// Result classification
pub use crate::render::{FileRef, RenderError, RenderedResult, ReturnValue, render};

// File lifecycle
pub use crate::files::{FileError, FileStore, ResolvedFile};

// Registration
pub use crate::registry::{InvokeError, Registry, WebFunction};
