//! Input coercion: raw submitted values back into typed arguments.
//!
//! The inverse of field building, for machine data instead of UI hints.
//! Coercion fails fast at the first offending parameter.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::logging::trace;
use crate::schema::{COLOR_PATTERN, Kind, ParamInfo, Schema, Value, Violation};

use super::error::ValidationError;

/// One raw submitted value: a plain string for text-like fields, or a
/// staged upload for file fields.
#[derive(Debug, Clone)]
pub enum RawValue {
    Text(String),
    Upload {
        /// Temporary path the serving layer already streamed the upload to.
        path: PathBuf,
        /// Original filename as submitted by the client.
        filename: String,
    },
}

/// Typed arguments in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<(String, Value)>);

impl Args {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Coerce raw form values into typed arguments under a schema.
///
/// Checkbox semantics for booleans: the mere presence of the field key
/// means `true`, absence means `false`. Every other missing field falls
/// back to its declared default.
pub fn coerce(
    schema: &Schema,
    raw: &HashMap<String, RawValue>,
) -> Result<Args, ValidationError> {
    let mut out = Vec::with_capacity(schema.len());

    for info in schema.iter() {
        let value = coerce_param(info, raw.get(&info.name))?;
        trace!(param = %info.name, "coerced value");
        out.push((info.name.clone(), value));
    }

    Ok(Args(out))
}

fn coerce_param(
    info: &ParamInfo,
    raw: Option<&RawValue>,
) -> Result<Value, ValidationError> {
    // Unchecked checkboxes are omitted from submissions entirely.
    if info.kind == Kind::Boolean {
        return Ok(Value::Bool(raw.is_some()));
    }

    let Some(raw) = raw else {
        return fallback_default(info);
    };

    match (info.kind, raw) {
        (Kind::FileRef, RawValue::Upload { path, filename }) => {
            info.check_filename(filename).map_err(|_| {
                ValidationError::UnsupportedFileType {
                    param: info.name.clone(),
                    filename: filename.clone(),
                    allowed: info.constraints.allowed_extensions.join(", "),
                }
            })?;
            Ok(Value::Path(path.clone()))
        }
        (Kind::FileRef, RawValue::Text(_)) => Err(ValidationError::ConstraintViolation {
            param: info.name.clone(),
            value: String::new(),
            constraint: "must be a file upload".to_string(),
        }),
        (_, RawValue::Upload { .. }) => Err(ValidationError::ConstraintViolation {
            param: info.name.clone(),
            value: String::new(),
            constraint: format!("must be a {} value, not a file upload", info.kind),
        }),
        (_, RawValue::Text(text)) => coerce_text(info, text),
    }
}

fn coerce_text(info: &ParamInfo, text: &str) -> Result<Value, ValidationError> {
    let value = match info.kind {
        Kind::Integer => text.trim().parse::<i64>().map(Value::Int).map_err(|_| {
            violation_error(info, text, &Violation::TypeMismatch { expected: Kind::Integer })
        })?,
        Kind::Float => text.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            violation_error(info, text, &Violation::TypeMismatch { expected: Kind::Float })
        })?,
        Kind::Date => {
            // An empty date input means "not provided", not a parse error.
            if text.is_empty() {
                return fallback_default(info);
            }
            let parsed = NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
                ValidationError::ConstraintViolation {
                    param: info.name.clone(),
                    value: text.to_string(),
                    constraint: "is not a valid ISO date (expected YYYY-MM-DD)".to_string(),
                }
            })?;
            Value::Date(parsed)
        }
        // A value that does not convert to the options' primitive type
        // cannot be a member either.
        Kind::Choice => match convert_option(info, text) {
            Some(v) => v,
            None => return Err(not_in_options(info, text)),
        },
        Kind::Text => {
            // Short-hex colors are normalized before the pattern check.
            if is_color_param(info) {
                Value::Text(expand_short_hex(text))
            } else {
                Value::Text(text.to_string())
            }
        }
        // Handled before reaching this function.
        Kind::Boolean | Kind::FileRef => {
            return Err(ValidationError::ConstraintViolation {
                param: info.name.clone(),
                value: text.to_string(),
                constraint: format!("cannot be coerced as {}", info.kind),
            });
        }
    };

    info.check(&value)
        .map_err(|violation| match violation {
            Violation::NotInOptions(_) => not_in_options(info, text),
            other => violation_error(info, &value.to_string(), &other),
        })?;

    Ok(value)
}

fn fallback_default(info: &ParamInfo) -> Result<Value, ValidationError> {
    info.default
        .clone()
        .ok_or_else(|| ValidationError::MissingRequired {
            param: info.name.clone(),
        })
}

fn violation_error(info: &ParamInfo, value: &str, violation: &Violation) -> ValidationError {
    ValidationError::ConstraintViolation {
        param: info.name.clone(),
        value: value.to_string(),
        constraint: violation.to_string(),
    }
}

fn not_in_options(info: &ParamInfo, value: &str) -> ValidationError {
    let options = info
        .constraints
        .options
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    ValidationError::NotInOptions {
        param: info.name.clone(),
        value: value.to_string(),
        options,
    }
}

/// Convert a raw string to the primitive type of the declared option set.
fn convert_option(info: &ParamInfo, text: &str) -> Option<Value> {
    let first = info.constraints.options.first()?;
    match first.kind() {
        Kind::Integer => text.trim().parse::<i64>().ok().map(Value::Int),
        Kind::Float => text.trim().parse::<f64>().ok().map(Value::Float),
        Kind::Boolean => text.trim().parse::<bool>().ok().map(Value::Bool),
        _ => Some(Value::Text(text.to_string())),
    }
}

fn is_color_param(info: &ParamInfo) -> bool {
    info.constraints
        .pattern
        .as_ref()
        .is_some_and(|p| p.as_str() == COLOR_PATTERN)
}

/// Expand a 4-character short hex color (`#abc`) to the 7-character form
/// (`#aabbcc`) by duplicating each channel digit. Anything else passes
/// through untouched and is left to the pattern check.
fn expand_short_hex(text: &str) -> String {
    let Some(channels) = text.strip_prefix('#') else {
        return text.to_string();
    };
    if channels.len() != 3 || !channels.chars().all(|c| c.is_ascii_hexdigit()) {
        return text.to_string();
    }
    let mut expanded = String::with_capacity(7);
    expanded.push('#');
    for c in channels.chars() {
        expanded.push(c);
        expanded.push(c);
    }
    expanded
}
