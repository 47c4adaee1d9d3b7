//! Function registration: the wrapper that owns a function's schema and
//! the call boundary that isolates its failures.

use std::panic::{AssertUnwindSafe, catch_unwind};

use thiserror::Error;

use crate::form::Args;
use crate::logging::{info, warn};
use crate::render::ReturnValue;
use crate::schema::{ParamDecl, Schema, SchemaError, extract};

/// The wrapped function signature: typed arguments in, a classifiable
/// return value (or a domain error) out.
pub type Handler = Box<dyn Fn(&Args) -> anyhow::Result<ReturnValue> + Send + Sync>;

/// A failure of the wrapped function itself, kept distinct from input
/// validation so a caller can tell "bad input" from "the computation
/// failed".
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("function execution failed: {0}")]
    Failed(anyhow::Error),

    #[error("function panicked: {0}")]
    Panicked(String),
}

/// A registered function: name, display title, extracted schema, and the
/// handler to invoke.
pub struct WebFunction {
    name: String,
    title: String,
    schema: Schema,
    handler: Handler,
}

impl WebFunction {
    /// Register a function under a snake_case name with its parameter
    /// declarations. The schema is extracted once, here: declaration
    /// problems and invalid defaults surface at startup, not on the
    /// first submission.
    pub fn new<F>(
        name: impl Into<String>,
        params: Vec<ParamDecl>,
        handler: F,
    ) -> Result<Self, SchemaError>
    where
        F: Fn(&Args) -> anyhow::Result<ReturnValue> + Send + Sync + 'static,
    {
        let name = name.into();
        let schema = extract(&params)?;
        let title = title_from_name(&name);
        info!(function = %name, params = schema.len(), "registered function");
        Ok(Self {
            name,
            title,
            schema,
            handler: Box::new(handler),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Invoke the wrapped function. Both returned errors and panics are
    /// captured as [`InvokeError`]; a panic never crosses this boundary.
    pub fn invoke(&self, args: &Args) -> Result<ReturnValue, InvokeError> {
        match catch_unwind(AssertUnwindSafe(|| (self.handler)(args))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(InvokeError::Failed(e)),
            Err(payload) => {
                let message = panic_message(payload);
                warn!(function = %self.name, message = %message, "wrapped function panicked");
                Err(InvokeError::Panicked(message))
            }
        }
    }
}

/// An ordered collection of registered functions.
#[derive(Default)]
pub struct Registry {
    funcs: Vec<WebFunction>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function. Names should be unique; lookup returns the
    /// first registration under a name.
    pub fn register(&mut self, func: WebFunction) -> &mut Self {
        self.funcs.push(func);
        self
    }

    pub fn get(&self, name: &str) -> Option<&WebFunction> {
        self.funcs.iter().find(|f| f.name() == name)
    }

    /// Registered functions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &WebFunction> {
        self.funcs.iter()
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

/// Derive a display title from a snake_case function name
/// (`blur_image` -> `Blur Image`).
fn title_from_name(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
