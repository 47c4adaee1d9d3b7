//! Form marshalling: field descriptors for rendering and coercion of
//! submitted values back into typed arguments.

mod coerce;
mod error;
mod fields;

pub use coerce::{Args, RawValue, coerce};
pub use error::ValidationError;
pub use fields::{FieldDescriptor, Widget, build_fields};
