//! Parameter schemas: the type/constraint model and the extractor that
//! turns declarations into an immutable [`Schema`].

mod decl;
mod error;
mod extract;
mod types;

pub use decl::{
    COLOR_PATTERN, DefaultDecl, EMAIL_PATTERN, PHONE_PATTERN, ParamDecl, TypeDecl, URL_PATTERN,
};
pub use error::SchemaError;
pub use extract::extract;
pub use types::{Bound, ConstraintSet, Kind, ParamInfo, Schema, Value, Violation};
