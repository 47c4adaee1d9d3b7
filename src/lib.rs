//! Expose typed functions as interactive web forms.
//!
//! This library derives an input schema from a function's declared
//! parameters, renders form field descriptors from it, coerces and
//! validates submitted values back into typed arguments, invokes the
//! function, and classifies its return value into a renderable result
//! (text, image, table, or downloadable files).
//!
//! # Quick Start
//!
//! ```ignore
//! use funcweb::prelude::*;
//!
//! // Declare a function's parameters and register it
//! let func = WebFunction::new(
//!     "greet",
//!     vec![
//!         ParamDecl::new("times", TypeDecl::integer_range(1, 5)).with_default(Value::Int(1)),
//!         ParamDecl::new("name", TypeDecl::text()).with_default(Value::Text("World".into())),
//!     ],
//!     |args| {
//!         let name = args.get("name").map(|v| v.to_string()).unwrap_or_default();
//!         Ok(ReturnValue::Text(format!("Hello, {}!", name)))
//!     },
//! )?;
//!
//! // Render form fields, coerce a submission, run, classify the result
//! let fields = build_fields(func.schema());
//! let args = coerce(func.schema(), &raw_values)?;
//! let result = render(func.invoke(&args)?, &file_store)?;
//! ```
//!
//! # Modules
//!
//! - [`schema`] - Type/constraint model and schema extraction
//! - [`form`] - Field descriptors and submission coercion
//! - [`render`] - Return value classification
//! - [`files`] - Upload staging, download handles, cleanup and sweeping
//! - [`registry`] - Function registration and the invoke boundary
//! - [`server`] - HTTP API server (requires `server` feature)
//!
//! # Feature Flags
//!
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `server` - Enable the HTTP API server
//! - `full` - Enable all features

pub mod files;
pub mod form;
mod logging;
pub mod registry;
pub mod render;
pub mod schema;
#[cfg(feature = "server")]
pub mod server;

mod error;
pub mod prelude;

// Re-export the unified error type
pub use error::{Error, Result};

// Re-export the main pipeline surface at crate root for convenience
pub use files::{FileError, FileStore, ResolvedFile};
pub use form::{Args, FieldDescriptor, RawValue, ValidationError, Widget, build_fields, coerce};
pub use registry::{InvokeError, Registry, WebFunction};
pub use render::{FileRef, RenderError, RenderedResult, ReturnValue, render};
pub use schema::{
    Kind, ParamDecl, ParamInfo, Schema, SchemaError, TypeDecl, Value, extract,
};
