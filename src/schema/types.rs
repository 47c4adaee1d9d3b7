//! Core data types for parameter schemas.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use regex::Regex;

/// The closed set of supported parameter kinds.
///
/// Every parameter has exactly one kind, fixed for the lifetime of its
/// schema. All kind-dependent behavior (field building, coercion, default
/// validation) matches exhaustively over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Integer,
    Float,
    Text,
    Boolean,
    Date,
    Choice,
    FileRef,
}

impl Kind {
    /// Human-readable kind name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Text => "text",
            Kind::Boolean => "boolean",
            Kind::Date => "date",
            Kind::Choice => "choice",
            Kind::FileRef => "file",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed runtime value: a parameter default, a choice option, or a
/// coerced argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    /// A staged file upload, referenced by its temporary path.
    Path(PathBuf),
}

impl Value {
    /// The kind this value belongs to.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::Text(_) => Kind::Text,
            Value::Bool(_) => Kind::Boolean,
            Value::Date(_) => Kind::Date,
            Value::Path(_) => Kind::FileRef,
        }
    }

    /// Numeric view used for bound comparisons.
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// The wire/form representation of the value. Dates render as ISO
    /// calendar dates, which is also what coercion parses back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// A numeric bound, inclusive unless marked exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub value: Value,
    pub exclusive: bool,
}

impl Bound {
    pub fn inclusive(value: Value) -> Self {
        Self {
            value,
            exclusive: false,
        }
    }

    pub fn exclusive(value: Value) -> Self {
        Self {
            value,
            exclusive: true,
        }
    }
}

/// Kind-dependent constraints, all optional.
///
/// Numeric bounds apply to integer/float parameters, length and pattern to
/// text, `options` to choice, and `allowed_extensions` to file parameters.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    pub min: Option<Bound>,
    pub max: Option<Bound>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Compiled at extraction time; the source is available via `as_str()`.
    pub pattern: Option<Regex>,
    /// Ordered option set for choice parameters, homogeneous in kind.
    pub options: Vec<Value>,
    /// Lowercase extensions without the leading dot; empty means any.
    pub allowed_extensions: Vec<String>,
}

/// A constraint violated by a concrete value.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    TypeMismatch { expected: Kind },
    Min { bound: Value, exclusive: bool },
    Max { bound: Value, exclusive: bool },
    MinLength(usize),
    MaxLength(usize),
    Pattern(String),
    NotInOptions(Vec<Value>),
    Extension(Vec<String>),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TypeMismatch { expected } => {
                write!(f, "is not a valid {}", expected.name())
            }
            Violation::Min { bound, exclusive } => {
                if *exclusive {
                    write!(f, "must be greater than {}", bound)
                } else {
                    write!(f, "must be at least {}", bound)
                }
            }
            Violation::Max { bound, exclusive } => {
                if *exclusive {
                    write!(f, "must be less than {}", bound)
                } else {
                    write!(f, "must be at most {}", bound)
                }
            }
            Violation::MinLength(n) => write!(f, "must have at least {} characters", n),
            Violation::MaxLength(n) => write!(f, "must have at most {} characters", n),
            Violation::Pattern(p) => write!(f, "must match pattern '{}'", p),
            Violation::NotInOptions(options) => {
                write!(f, "is not one of [{}]", join_values(options))
            }
            Violation::Extension(allowed) => {
                write!(f, "has an unsupported extension (allowed: {})", allowed.join(", "))
            }
        }
    }
}

pub(crate) fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Extracted, immutable description of one function parameter.
#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub name: String,
    pub kind: Kind,
    pub default: Option<Value>,
    pub constraints: ConstraintSet,
}

impl ParamInfo {
    /// Check a typed value against this parameter's kind and constraints.
    ///
    /// This is the single checking routine shared by extraction-time
    /// default validation and submission-time coercion.
    pub fn check(&self, value: &Value) -> Result<(), Violation> {
        match self.kind {
            Kind::Integer => {
                let Value::Int(_) = value else {
                    return Err(Violation::TypeMismatch { expected: self.kind });
                };
                self.check_bounds(value)
            }
            Kind::Float => {
                // Integer literals are acceptable where a float is expected.
                if value.as_f64().is_none() {
                    return Err(Violation::TypeMismatch { expected: self.kind });
                }
                self.check_bounds(value)
            }
            Kind::Text => {
                let Value::Text(s) = value else {
                    return Err(Violation::TypeMismatch { expected: self.kind });
                };
                self.check_text(s)
            }
            Kind::Boolean => match value {
                Value::Bool(_) => Ok(()),
                _ => Err(Violation::TypeMismatch { expected: self.kind }),
            },
            Kind::Date => match value {
                Value::Date(_) => Ok(()),
                _ => Err(Violation::TypeMismatch { expected: self.kind }),
            },
            Kind::Choice => {
                if self.constraints.options.contains(value) {
                    Ok(())
                } else {
                    Err(Violation::NotInOptions(self.constraints.options.clone()))
                }
            }
            Kind::FileRef => {
                let Value::Path(path) = value else {
                    return Err(Violation::TypeMismatch { expected: self.kind });
                };
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_lowercase);
                self.check_extension(ext.as_deref())
            }
        }
    }

    /// Check a filename's extension against `allowed_extensions`,
    /// case-insensitively. An empty allow list accepts anything.
    pub fn check_filename(&self, filename: &str) -> Result<(), Violation> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, e)| e.to_lowercase());
        self.check_extension(ext.as_deref())
    }

    fn check_extension(&self, ext: Option<&str>) -> Result<(), Violation> {
        let allowed = &self.constraints.allowed_extensions;
        if allowed.is_empty() {
            return Ok(());
        }
        match ext {
            Some(e) if allowed.iter().any(|a| a == e) => Ok(()),
            _ => Err(Violation::Extension(allowed.clone())),
        }
    }

    fn check_bounds(&self, value: &Value) -> Result<(), Violation> {
        // Callers guarantee a numeric value at this point.
        let Some(v) = value.as_f64() else {
            return Err(Violation::TypeMismatch { expected: self.kind });
        };
        if let Some(min) = &self.constraints.min {
            if let Some(m) = min.value.as_f64() {
                let ok = if min.exclusive { v > m } else { v >= m };
                if !ok {
                    return Err(Violation::Min {
                        bound: min.value.clone(),
                        exclusive: min.exclusive,
                    });
                }
            }
        }
        if let Some(max) = &self.constraints.max {
            if let Some(m) = max.value.as_f64() {
                let ok = if max.exclusive { v < m } else { v <= m };
                if !ok {
                    return Err(Violation::Max {
                        bound: max.value.clone(),
                        exclusive: max.exclusive,
                    });
                }
            }
        }
        Ok(())
    }

    fn check_text(&self, s: &str) -> Result<(), Violation> {
        let len = s.chars().count();
        if let Some(min) = self.constraints.min_length {
            if len < min {
                return Err(Violation::MinLength(min));
            }
        }
        if let Some(max) = self.constraints.max_length {
            if len > max {
                return Err(Violation::MaxLength(max));
            }
        }
        if let Some(pattern) = &self.constraints.pattern {
            if !pattern.is_match(s) {
                return Err(Violation::Pattern(pattern.as_str().to_string()));
            }
        }
        Ok(())
    }
}

/// An ordered parameter schema extracted from a function's declarations.
///
/// Iteration order is declaration order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    params: Vec<ParamInfo>,
}

impl Schema {
    pub(crate) fn new(params: Vec<ParamInfo>) -> Self {
        Self { params }
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&ParamInfo> {
        self.params.iter().find(|p| p.name == name)
    }

    /// All parameters in declaration order.
    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamInfo> {
        self.params.iter()
    }
}
