//! Parameter declaration API.
//!
//! Callers declare each parameter's type and constraints explicitly at
//! registration time; the extractor turns declarations into an immutable
//! [`Schema`](super::Schema). There is no runtime reflection: what the
//! form shows and what coercion enforces both come from these declarations.

use super::types::{Bound, Kind, Value};

/// Pattern recognized as a color input (`#RGB` or `#RRGGBB`).
pub const COLOR_PATTERN: &str = r"^#(?:[0-9a-fA-F]{3}){1,2}$";
/// Pattern recognized as an email input.
pub const EMAIL_PATTERN: &str = r"^[^@]+@[^@]+\.[^@]+$";
/// Pattern recognized as a URL input.
pub const URL_PATTERN: &str = r"^https?://\S+$";
/// Pattern recognized as a telephone input.
pub const PHONE_PATTERN: &str = r"^\+?[0-9][0-9 \-()]{5,19}$";

/// A declared parameter type with its bundled constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Integer {
        min: Option<Bound>,
        max: Option<Bound>,
    },
    Float {
        min: Option<Bound>,
        max: Option<Bound>,
    },
    Text {
        min_length: Option<usize>,
        max_length: Option<usize>,
        pattern: Option<String>,
    },
    Boolean,
    Date,
    /// Enumerated literal set; the value must be one of these.
    OneOf(Vec<Value>),
    /// A list of the given primitive kind. The declared default list is
    /// mandatory and becomes the option set.
    ListOf(Kind),
    /// A file upload restricted to the given extensions (lowercase, no
    /// leading dot; empty accepts anything).
    FileUpload { extensions: Vec<String> },
}

impl TypeDecl {
    pub fn integer() -> Self {
        TypeDecl::Integer {
            min: None,
            max: None,
        }
    }

    /// An integer with inclusive bounds.
    pub fn integer_range(min: i64, max: i64) -> Self {
        TypeDecl::Integer {
            min: Some(Bound::inclusive(Value::Int(min))),
            max: Some(Bound::inclusive(Value::Int(max))),
        }
    }

    pub fn float() -> Self {
        TypeDecl::Float {
            min: None,
            max: None,
        }
    }

    /// A float with inclusive bounds.
    pub fn float_range(min: f64, max: f64) -> Self {
        TypeDecl::Float {
            min: Some(Bound::inclusive(Value::Float(min))),
            max: Some(Bound::inclusive(Value::Float(max))),
        }
    }

    pub fn text() -> Self {
        TypeDecl::Text {
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    pub fn text_len(min_length: usize, max_length: usize) -> Self {
        TypeDecl::Text {
            min_length: Some(min_length),
            max_length: Some(max_length),
            pattern: None,
        }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        TypeDecl::Text {
            min_length: None,
            max_length: None,
            pattern: Some(pattern.into()),
        }
    }

    /// Text constrained to the well-known color pattern; renders as a
    /// color picker.
    pub fn color() -> Self {
        Self::pattern(COLOR_PATTERN)
    }

    pub fn email() -> Self {
        Self::pattern(EMAIL_PATTERN)
    }

    pub fn url() -> Self {
        Self::pattern(URL_PATTERN)
    }

    pub fn phone() -> Self {
        Self::pattern(PHONE_PATTERN)
    }

    pub fn boolean() -> Self {
        TypeDecl::Boolean
    }

    pub fn date() -> Self {
        TypeDecl::Date
    }

    pub fn one_of(options: impl IntoIterator<Item = Value>) -> Self {
        TypeDecl::OneOf(options.into_iter().collect())
    }

    /// A file upload accepting the given extensions. Leading dots are
    /// stripped and extensions lowercased.
    pub fn file(extensions: &[&str]) -> Self {
        TypeDecl::FileUpload {
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn image_file() -> Self {
        Self::file(&["png", "jpg", "jpeg", "gif", "webp"])
    }

    pub fn data_file() -> Self {
        Self::file(&["csv", "xlsx", "xls", "json"])
    }

    pub fn text_file() -> Self {
        Self::file(&["txt", "md", "log"])
    }

    pub fn document_file() -> Self {
        Self::file(&["pdf", "doc", "docx"])
    }
}

/// A declared default: a single value, or the option list of a
/// [`TypeDecl::ListOf`] parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultDecl {
    Value(Value),
    List(Vec<Value>),
}

/// One declared function parameter, before extraction.
#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: String,
    pub ty: Option<TypeDecl>,
    pub default: Option<DefaultDecl>,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: TypeDecl) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            default: None,
        }
    }

    /// A declaration without a type. Extraction rejects it; this exists so
    /// callers assembling declarations dynamically get a proper error
    /// instead of a silent guess.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            default: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(DefaultDecl::Value(value));
        self
    }

    /// Declare the option list of a `ListOf` parameter.
    pub fn with_options(mut self, options: impl IntoIterator<Item = Value>) -> Self {
        self.default = Some(DefaultDecl::List(options.into_iter().collect()));
        self
    }
}
