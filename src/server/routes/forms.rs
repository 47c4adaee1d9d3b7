//! Form listing, form rendering, and submission handlers.

use std::collections::HashMap;
use std::path::Path;

use axum::{
    Json,
    extract::{Multipart, Path as UrlPath, State},
};
use serde_json::json;

use crate::form::{RawValue, coerce};
use crate::render::{RenderedResult, render};
use crate::schema::Value;

use super::super::{error::ApiError, state::AppState};

/// List all registered functions.
pub async fn list_functions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let functions: Vec<_> = state
        .registry()
        .iter()
        .map(|f| {
            json!({
                "name": f.name(),
                "title": f.title(),
                "params": f.schema().len(),
            })
        })
        .collect();
    Json(json!({ "functions": functions }))
}

/// Describe one function's form: its field descriptors, ready to render.
pub async fn get_form(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let func = state.function(&name)?;
    let fields: Vec<_> = crate::form::build_fields(func.schema())
        .into_iter()
        .map(|field| {
            let attrs: serde_json::Map<String, serde_json::Value> = field
                .attrs
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            json!({
                "name": field.name,
                "widget": field.widget.as_str(),
                "default": field.default.as_ref().map(value_json),
                "required": field.required,
                "attrs": attrs,
                "options": field.options.iter().map(value_json).collect::<Vec<_>>(),
            })
        })
        .collect();

    Ok(Json(json!({
        "name": func.name(),
        "title": func.title(),
        "fields": fields,
    })))
}

/// Handle a multipart form submission: stage uploads, coerce, invoke,
/// classify, and report the result.
pub async fn submit(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.function(&name)?;

    let mut raw: HashMap<String, RawValue> = HashMap::new();
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_multipart(e.to_string()))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };
        match field.file_name().map(str::to_string) {
            Some(filename) if !filename.is_empty() => {
                // Stream the upload to a staging file; the body is never
                // held in memory at once.
                let suffix = suffix_of(&filename);
                let mut sink = state.files().begin_upload(&suffix)?;
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| ApiError::bad_multipart(e.to_string()))?
                {
                    sink.write_chunk(&chunk)
                        .map_err(|e| ApiError::internal(e.to_string()))?;
                }
                let path = sink.finish()?;
                raw.insert(field_name, RawValue::Upload { path, filename });
            }
            // An upload field with an empty filename means no file was
            // chosen; leave it absent so defaults apply.
            Some(_) => {}
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_multipart(e.to_string()))?;
                raw.insert(field_name, RawValue::Text(text));
            }
        }
    }

    let func = state.function(&name)?;
    let outcome = run_submission(func, &raw, &state);

    // Staged uploads are scoped to this submission; remove them whether
    // or not it succeeded.
    for value in raw.values() {
        if let RawValue::Upload { path, .. } = value {
            let _ = std::fs::remove_file(path);
        }
    }

    let rendered = outcome?;
    let mut body = rendered_json(&rendered);
    if let Some(obj) = body.as_object_mut() {
        obj.insert("success".to_string(), json!(true));
    }
    Ok(Json(body))
}

fn run_submission(
    func: &crate::registry::WebFunction,
    raw: &HashMap<String, RawValue>,
    state: &AppState,
) -> Result<RenderedResult, ApiError> {
    let args = coerce(func.schema(), raw)?;
    let value = func.invoke(&args)?;
    Ok(render(value, state.files())?)
}

/// JSON projection of a typed value.
fn value_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Int(i) => json!(i),
        Value::Float(f) => json!(f),
        Value::Bool(b) => json!(b),
        other => json!(other.to_string()),
    }
}

/// JSON projection of a classified result, tagged with `result_type`.
fn rendered_json(result: &RenderedResult) -> serde_json::Value {
    match result {
        RenderedResult::Text(text) => json!({
            "result_type": "text",
            "result": text,
        }),
        RenderedResult::Image { data_uri } => json!({
            "result_type": "image",
            "result": data_uri,
        }),
        RenderedResult::Table { headers, rows } => json!({
            "result_type": "table",
            "headers": headers,
            "rows": rows,
        }),
        RenderedResult::Download(file) => json!({
            "result_type": "download",
            "file_id": file.handle,
            "filename": file.filename,
        }),
        RenderedResult::Downloads(files) => json!({
            "result_type": "downloads",
            "files": files
                .iter()
                .map(|f| json!({ "file_id": f.handle, "filename": f.filename }))
                .collect::<Vec<_>>(),
        }),
        RenderedResult::Multiple(outputs) => json!({
            "result_type": "multiple",
            "outputs": outputs.iter().map(rendered_json).collect::<Vec<_>>(),
        }),
    }
}

/// File extension (with leading dot) for the staging temp file, so tools
/// that sniff by extension keep working on the staged copy.
fn suffix_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}
