//! Field descriptor building: the UI-facing projection of a schema.
//!
//! A [`FieldDescriptor`] is derived, never stored; it is recomputed from
//! the immutable [`ParamInfo`] on every form render.

use crate::schema::{
    Bound, COLOR_PATTERN, EMAIL_PATTERN, Kind, PHONE_PATTERN, ParamInfo, Schema, URL_PATTERN,
    Value,
};

/// The widget used to render one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    Number,
    Text,
    Checkbox,
    Select,
    Date,
    Color,
    Email,
    Url,
    Tel,
    File,
}

impl Widget {
    /// The HTML input type (or element) name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Widget::Number => "number",
            Widget::Text => "text",
            Widget::Checkbox => "checkbox",
            Widget::Select => "select",
            Widget::Date => "date",
            Widget::Color => "color",
            Widget::Email => "email",
            Widget::Url => "url",
            Widget::Tel => "tel",
            Widget::File => "file",
        }
    }
}

/// UI description of one parameter: widget, default, and the HTML
/// attributes derived from the constraints.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub widget: Widget,
    pub default: Option<Value>,
    pub required: bool,
    /// Ordered attribute pairs, ready to splice into a rendered input.
    pub attrs: Vec<(String, String)>,
    /// Option values for select widgets, empty otherwise.
    pub options: Vec<Value>,
}

/// Build field descriptors for every parameter of a schema, in order.
///
/// Pure projection: no I/O, no schema mutation, and no failure for a
/// schema that passed extraction.
pub fn build_fields(schema: &Schema) -> Vec<FieldDescriptor> {
    schema.iter().map(build_field).collect()
}

fn build_field(info: &ParamInfo) -> FieldDescriptor {
    let mut field = FieldDescriptor {
        name: info.name.clone(),
        widget: Widget::Text,
        default: info.default.clone(),
        required: true,
        attrs: Vec::new(),
        options: Vec::new(),
    };

    match info.kind {
        Kind::Choice => {
            field.widget = Widget::Select;
            field.options = info.constraints.options.clone();
        }
        Kind::Boolean => {
            // Checkboxes are never required: an unchecked box is simply
            // absent from the submission.
            field.widget = Widget::Checkbox;
            field.required = false;
            if matches!(info.default, Some(Value::Bool(true))) {
                field.attrs.push(("checked".to_string(), "checked".to_string()));
            }
        }
        Kind::Date => {
            field.widget = Widget::Date;
        }
        Kind::Integer | Kind::Float => {
            field.widget = Widget::Number;
            let step = if info.kind == Kind::Integer { "1" } else { "any" };
            field.attrs.push(("step".to_string(), step.to_string()));
            if let Some(min) = &info.constraints.min {
                field
                    .attrs
                    .push(("min".to_string(), widen_bound(info.kind, min, true)));
            }
            if let Some(max) = &info.constraints.max {
                field
                    .attrs
                    .push(("max".to_string(), widen_bound(info.kind, max, false)));
            }
        }
        Kind::Text => {
            field.widget = text_widget(info);
            if let Some(min) = info.constraints.min_length {
                field.attrs.push(("minlength".to_string(), min.to_string()));
            }
            if let Some(max) = info.constraints.max_length {
                field.attrs.push(("maxlength".to_string(), max.to_string()));
            }
            if let Some(pattern) = &info.constraints.pattern {
                field
                    .attrs
                    .push(("pattern".to_string(), pattern.as_str().to_string()));
            }
        }
        Kind::FileRef => {
            field.widget = Widget::File;
            if !info.constraints.allowed_extensions.is_empty() {
                let accept = info
                    .constraints
                    .allowed_extensions
                    .iter()
                    .map(|e| format!(".{}", e))
                    .collect::<Vec<_>>()
                    .join(",");
                field.attrs.push(("accept".to_string(), accept));
            }
        }
    }

    field
}

/// HTML number inputs only express inclusive bounds, so exclusive bounds
/// are widened by one step: ±1 for integers, ±0.01 for floats.
fn widen_bound(kind: Kind, bound: &Bound, is_min: bool) -> String {
    if !bound.exclusive {
        return bound.value.to_string();
    }
    match (kind, &bound.value) {
        (Kind::Integer, Value::Int(i)) => {
            let widened = if is_min { i + 1 } else { i - 1 };
            widened.to_string()
        }
        (_, value) => {
            let v = value.as_f64().unwrap_or(0.0);
            let widened = if is_min { v + 0.01 } else { v - 0.01 };
            Value::Float(widened).to_string()
        }
    }
}

/// Recognize well-known patterns and pick the matching input sub-widget.
fn text_widget(info: &ParamInfo) -> Widget {
    match info.constraints.pattern.as_ref().map(|p| p.as_str()) {
        Some(COLOR_PATTERN) => Widget::Color,
        Some(EMAIL_PATTERN) => Widget::Email,
        Some(URL_PATTERN) => Widget::Url,
        Some(PHONE_PATTERN) => Widget::Tel,
        _ => Widget::Text,
    }
}
