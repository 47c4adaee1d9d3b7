//! Result classification: turn an arbitrary return value into a tagged,
//! renderable result.
//!
//! Classification order matters: several return shapes (for instance a
//! list of uniform key/value records) would otherwise be ambiguous. The
//! order is: tabular values, then row-record sequences, then all-file
//! sequences, then generic fan-out, then images, single files, and
//! finally plain text.

mod value;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

use crate::files::{FileError, FileStore};
use crate::logging::debug;

pub use value::ReturnValue;

/// A persisted download, referenced by its opaque handle.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRef {
    pub handle: String,
    pub filename: String,
}

/// The classified, transmission-ready form of a return value.
///
/// `Multiple` never nests: one level of fan-out is all the rendering
/// surface can represent.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedResult {
    Text(String),
    /// Base64 PNG data URI, ready for an `img src` attribute.
    Image { data_uri: String },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Download(FileRef),
    Downloads(Vec<FileRef>),
    Multiple(Vec<RenderedResult>),
}

/// Errors raised while classifying a return value.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A sequence contained a nested sequence that is not itself a table.
    #[error("nested sequences are not supported in return values; flatten the structure")]
    UnsupportedNesting,

    /// Persisting a returned file failed.
    #[error(transparent)]
    File(#[from] FileError),
}

/// Classify a return value into a [`RenderedResult`], persisting any file
/// content through the given store.
pub fn render(value: ReturnValue, files: &FileStore) -> Result<RenderedResult, RenderError> {
    if value.is_sequence() {
        render_sequence(value, files)
    } else {
        render_leaf(value, files)
    }
}

/// Classify a non-sequence value.
fn render_leaf(value: ReturnValue, files: &FileStore) -> Result<RenderedResult, RenderError> {
    match value {
        ReturnValue::Table { headers, rows } => Ok(RenderedResult::Table { headers, rows }),
        ReturnValue::Record(fields) => Ok(match columnar_table(&fields) {
            Some(table) => table,
            None => RenderedResult::Text(ReturnValue::Record(fields).to_string()),
        }),
        ReturnValue::Image(data) => Ok(RenderedResult::Image {
            data_uri: format!("data:image/png;base64,{}", BASE64.encode(&data)),
        }),
        ReturnValue::File { filename, data } => {
            let handle = files.persist_returned(&data, &filename)?;
            debug!(handle = %handle, filename = %filename, "persisted returned file");
            Ok(RenderedResult::Download(FileRef { handle, filename }))
        }
        scalar => Ok(RenderedResult::Text(scalar.to_string())),
    }
}

fn render_sequence(value: ReturnValue, files: &FileStore) -> Result<RenderedResult, RenderError> {
    let (items, empty_repr) = match value {
        ReturnValue::List(items) => (items, "[]"),
        ReturnValue::Tuple(items) => (items, "()"),
        // `render` only routes sequences here.
        other => return render_leaf(other, files),
    };

    // An empty sequence is its own text representation, not an error.
    if items.is_empty() {
        return Ok(RenderedResult::Text(empty_repr.to_string()));
    }

    if let Some(table) = sequence_table(&items) {
        return Ok(table);
    }

    if items.iter().all(|i| matches!(i, ReturnValue::File { .. })) {
        let mut refs = Vec::with_capacity(items.len());
        for item in items {
            if let ReturnValue::File { filename, data } = item {
                let handle = files.persist_returned(&data, &filename)?;
                refs.push(FileRef { handle, filename });
            }
        }
        return Ok(RenderedResult::Downloads(refs));
    }

    // Generic fan-out: classify each element, one level deep. A nested
    // sequence survives only if it is itself a valid table.
    let mut outputs = Vec::with_capacity(items.len());
    for item in items {
        match item {
            ReturnValue::List(inner) | ReturnValue::Tuple(inner) => {
                match sequence_table(&inner) {
                    Some(table) => outputs.push(table),
                    None => return Err(RenderError::UnsupportedNesting),
                }
            }
            leaf => outputs.push(render_leaf(leaf, files)?),
        }
    }
    Ok(RenderedResult::Multiple(outputs))
}

/// Try to classify a sequence as a table: a rectangular all-scalar grid,
/// a uniform sequence of mapping records, or a uniform sequence of
/// scalar tuples.
fn sequence_table(items: &[ReturnValue]) -> Option<RenderedResult> {
    grid_table(items)
        .or_else(|| record_rows_table(items))
        .or_else(|| tuple_rows_table(items))
}

/// A record whose values are equal-length scalar lists is a columnar
/// table: headers are the keys, rows are the transposed cells.
fn columnar_table(fields: &[(String, ReturnValue)]) -> Option<RenderedResult> {
    if fields.is_empty() {
        return None;
    }
    let mut columns: Vec<&[ReturnValue]> = Vec::with_capacity(fields.len());
    for (_, value) in fields {
        let ReturnValue::List(cells) = value else {
            return None;
        };
        if !cells.iter().all(ReturnValue::is_scalar) {
            return None;
        }
        columns.push(cells);
    }
    let height = columns.first().map(|c| c.len())?;
    if columns.iter().any(|c| c.len() != height) {
        return None;
    }

    let headers = fields.iter().map(|(k, _)| k.clone()).collect();
    let rows = (0..height)
        .map(|i| {
            columns
                .iter()
                .filter_map(|c| c.get(i))
                .map(|cell| cell.to_string())
                .collect()
        })
        .collect();
    Some(RenderedResult::Table { headers, rows })
}

/// A rectangular grid of scalar lists: headers are positional indices.
fn grid_table(items: &[ReturnValue]) -> Option<RenderedResult> {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(items.len());
    let mut width: Option<usize> = None;
    for item in items {
        let ReturnValue::List(cells) = item else {
            return None;
        };
        if cells.is_empty() || !cells.iter().all(ReturnValue::is_scalar) {
            return None;
        }
        match width {
            None => width = Some(cells.len()),
            Some(w) if w != cells.len() => return None,
            Some(_) => {}
        }
        rows.push(cells.iter().map(|c| c.to_string()).collect());
    }
    let width = width?;
    let headers = (0..width).map(|i| i.to_string()).collect();
    Some(RenderedResult::Table { headers, rows })
}

/// A homogeneous sequence of uniform-shape mapping records: headers come
/// from the first record's keys. Records with diverging keys or
/// non-scalar values are not a table.
fn record_rows_table(items: &[ReturnValue]) -> Option<RenderedResult> {
    let first = items.first()?;
    let ReturnValue::Record(first_fields) = first else {
        return None;
    };
    let headers: Vec<String> = first_fields.iter().map(|(k, _)| k.clone()).collect();
    if headers.is_empty() {
        return None;
    }

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let ReturnValue::Record(fields) = item else {
            return None;
        };
        if fields.len() != headers.len() {
            return None;
        }
        let mut row = Vec::with_capacity(fields.len());
        for ((key, value), header) in fields.iter().zip(&headers) {
            if key != header || !value.is_scalar() {
                return None;
            }
            row.push(value.to_string());
        }
        rows.push(row);
    }
    Some(RenderedResult::Table { headers, rows })
}

/// A homogeneous sequence of uniform-arity scalar tuples: headers are
/// positional indices.
fn tuple_rows_table(items: &[ReturnValue]) -> Option<RenderedResult> {
    let first = items.first()?;
    let ReturnValue::Tuple(first_cells) = first else {
        return None;
    };
    let width = first_cells.len();
    if width == 0 {
        return None;
    }

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let ReturnValue::Tuple(cells) = item else {
            return None;
        };
        if cells.len() != width || !cells.iter().all(ReturnValue::is_scalar) {
            return None;
        }
        rows.push(cells.iter().map(|c| c.to_string()).collect());
    }
    let headers = (0..width).map(|i| i.to_string()).collect();
    Some(RenderedResult::Table { headers, rows })
}
