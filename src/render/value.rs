//! Runtime return values produced by wrapped functions.

use std::fmt;

/// What a wrapped function may return. The classifier in
/// [`render`](super::render) turns one of these into a
/// [`RenderedResult`](super::RenderedResult).
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// A PNG-encoded raster buffer. The renderer transport-encodes it;
    /// callers downstream never see the raw bytes.
    Image(Vec<u8>),
    /// File content to offer as a download under its original name.
    File { filename: String, data: Vec<u8> },
    List(Vec<ReturnValue>),
    Tuple(Vec<ReturnValue>),
    /// An ordered mapping record.
    Record(Vec<(String, ReturnValue)>),
    /// A pre-materialized table (dataframe-like value), cells already
    /// stringified.
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl ReturnValue {
    /// Scalars are the values a table cell may hold.
    pub(crate) fn is_scalar(&self) -> bool {
        matches!(
            self,
            ReturnValue::Int(_)
                | ReturnValue::Float(_)
                | ReturnValue::Bool(_)
                | ReturnValue::Text(_)
        )
    }

    pub(crate) fn is_sequence(&self) -> bool {
        matches!(self, ReturnValue::List(_) | ReturnValue::Tuple(_))
    }
}

impl From<i64> for ReturnValue {
    fn from(v: i64) -> Self {
        ReturnValue::Int(v)
    }
}

impl From<f64> for ReturnValue {
    fn from(v: f64) -> Self {
        ReturnValue::Float(v)
    }
}

impl From<bool> for ReturnValue {
    fn from(v: bool) -> Self {
        ReturnValue::Bool(v)
    }
}

impl From<String> for ReturnValue {
    fn from(v: String) -> Self {
        ReturnValue::Text(v)
    }
}

impl From<&str> for ReturnValue {
    fn from(v: &str) -> Self {
        ReturnValue::Text(v.to_string())
    }
}

impl fmt::Display for ReturnValue {
    /// The stringified fallback representation used when a value renders
    /// as plain text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnValue::Int(v) => write!(f, "{}", v),
            ReturnValue::Float(v) => write!(f, "{}", v),
            ReturnValue::Bool(v) => write!(f, "{}", v),
            ReturnValue::Text(v) => f.write_str(v),
            ReturnValue::Image(data) => write!(f, "<image: {} bytes>", data.len()),
            ReturnValue::File { filename, data } => {
                write!(f, "<file: {} ({} bytes)>", filename, data.len())
            }
            ReturnValue::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            ReturnValue::Tuple(items) => {
                f.write_str("(")?;
                write_joined(f, items)?;
                f.write_str(")")
            }
            ReturnValue::Record(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            ReturnValue::Table { headers, rows } => {
                write!(f, "<table: {} columns, {} rows>", headers.len(), rows.len())
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[ReturnValue]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
