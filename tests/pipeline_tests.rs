//! End-to-end pipeline tests: coerce a submission, invoke the function,
//! and classify the result, without the HTTP layer.

use std::collections::HashMap;

use funcweb::prelude::*;
use tempfile::TempDir;

fn text_raw(pairs: &[(&str, &str)]) -> HashMap<String, RawValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), RawValue::Text(v.to_string())))
        .collect()
}

fn store() -> (TempDir, FileStore) {
    let dir = TempDir::new().unwrap();
    let files = FileStore::open(dir.path()).unwrap();
    (dir, files)
}

// =============================================================================
// Coercion Tests
// =============================================================================

#[test]
fn test_missing_fields_fall_back_to_defaults() -> anyhow::Result<()> {
    let schema = extract(&[
        ParamDecl::new("name", TypeDecl::text()).with_default(Value::Text("World".into())),
        ParamDecl::new("count", TypeDecl::integer()).with_default(Value::Int(3)),
    ])?;

    let args = coerce(&schema, &HashMap::new())?;
    assert_eq!(args.get("name"), Some(&Value::Text("World".into())));
    assert_eq!(args.get("count"), Some(&Value::Int(3)));
    Ok(())
}

#[test]
fn test_rendered_defaults_round_trip() -> anyhow::Result<()> {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let schema = extract(&[
        ParamDecl::new("count", TypeDecl::integer_range(1, 10)).with_default(Value::Int(3)),
        ParamDecl::new("ratio", TypeDecl::float()).with_default(Value::Float(2.5)),
        ParamDecl::new("name", TypeDecl::text()).with_default(Value::Text("World".into())),
        ParamDecl::new("flag", TypeDecl::boolean()).with_default(Value::Bool(true)),
        ParamDecl::new("when", TypeDecl::date()).with_default(Value::Date(date)),
        ParamDecl::new(
            "mode",
            TypeDecl::one_of([Value::Text("fast".into()), Value::Text("slow".into())]),
        )
        .with_default(Value::Text("slow".into())),
    ])?;

    // Resubmit each field's rendered default the way a browser would:
    // text-like defaults as their wire strings, checkboxes by presence.
    let mut raw = HashMap::new();
    for field in build_fields(&schema) {
        match field.widget {
            Widget::Checkbox => {
                if field.attrs.iter().any(|(k, _)| k == "checked") {
                    raw.insert(field.name, RawValue::Text("on".into()));
                }
            }
            _ => {
                if let Some(default) = &field.default {
                    raw.insert(field.name, RawValue::Text(default.to_string()));
                }
            }
        }
    }

    let args = coerce(&schema, &raw)?;
    for info in schema.iter() {
        assert_eq!(args.get(&info.name), info.default.as_ref(), "{}", info.name);
    }
    Ok(())
}

#[test]
fn test_missing_field_without_default_is_required() -> anyhow::Result<()> {
    let schema = extract(&[ParamDecl::new("name", TypeDecl::text())])?;

    let err = coerce(&schema, &HashMap::new()).unwrap_err();
    assert!(matches!(err, ValidationError::MissingRequired { param } if param == "name"));
    Ok(())
}

#[test]
fn test_checkbox_presence_semantics() -> anyhow::Result<()> {
    let schema = extract(&[
        ParamDecl::new("flag", TypeDecl::boolean()).with_default(Value::Bool(true)),
    ])?;

    // Present (whatever the payload) means checked
    let args = coerce(&schema, &text_raw(&[("flag", "on")]))?;
    assert_eq!(args.get("flag"), Some(&Value::Bool(true)));

    // Absent means unchecked, even with a true default
    let args = coerce(&schema, &HashMap::new())?;
    assert_eq!(args.get("flag"), Some(&Value::Bool(false)));
    Ok(())
}

#[test]
fn test_short_hex_color_normalized() -> anyhow::Result<()> {
    let schema = extract(&[ParamDecl::new("shade", TypeDecl::color())])?;

    let args = coerce(&schema, &text_raw(&[("shade", "#abc")]))?;
    assert_eq!(args.get("shade"), Some(&Value::Text("#aabbcc".into())));

    let args = coerce(&schema, &text_raw(&[("shade", "#aabbcc")]))?;
    assert_eq!(args.get("shade"), Some(&Value::Text("#aabbcc".into())));

    let err = coerce(&schema, &text_raw(&[("shade", "red")])).unwrap_err();
    assert!(matches!(err, ValidationError::ConstraintViolation { param, .. } if param == "shade"));
    Ok(())
}

#[test]
fn test_bounds_enforced_on_submission() -> anyhow::Result<()> {
    let schema = extract(&[
        ParamDecl::new("age", TypeDecl::integer_range(18, 120)).with_default(Value::Int(30)),
    ])?;

    let args = coerce(&schema, &text_raw(&[("age", "30")]))?;
    assert_eq!(args.get("age"), Some(&Value::Int(30)));

    let err = coerce(&schema, &text_raw(&[("age", "17")])).unwrap_err();
    assert!(matches!(err, ValidationError::ConstraintViolation { param, .. } if param == "age"));

    let err = coerce(&schema, &text_raw(&[("age", "not a number")])).unwrap_err();
    assert!(matches!(err, ValidationError::ConstraintViolation { .. }));
    Ok(())
}

#[test]
fn test_choice_membership() -> anyhow::Result<()> {
    let schema = extract(&[ParamDecl::new(
        "mode",
        TypeDecl::one_of([Value::Int(1), Value::Int(2), Value::Int(3)]),
    )])?;

    let args = coerce(&schema, &text_raw(&[("mode", "2")]))?;
    assert_eq!(args.get("mode"), Some(&Value::Int(2)));

    let err = coerce(&schema, &text_raw(&[("mode", "4")])).unwrap_err();
    assert!(matches!(err, ValidationError::NotInOptions { param, .. } if param == "mode"));

    // Unparseable as the option type cannot be a member either
    let err = coerce(&schema, &text_raw(&[("mode", "two")])).unwrap_err();
    assert!(matches!(err, ValidationError::NotInOptions { .. }));
    Ok(())
}

#[test]
fn test_empty_date_falls_back_to_default() -> anyhow::Result<()> {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let schema = extract(&[
        ParamDecl::new("when", TypeDecl::date()).with_default(Value::Date(date)),
    ])?;

    let args = coerce(&schema, &text_raw(&[("when", "")]))?;
    assert_eq!(args.get("when"), Some(&Value::Date(date)));

    let args = coerce(&schema, &text_raw(&[("when", "2025-01-15")]))?;
    assert_eq!(
        args.get("when"),
        Some(&Value::Date(
            chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        ))
    );

    let err = coerce(&schema, &text_raw(&[("when", "15/01/2025")])).unwrap_err();
    assert!(matches!(err, ValidationError::ConstraintViolation { .. }));
    Ok(())
}

#[test]
fn test_text_length_counts_chars() -> anyhow::Result<()> {
    let schema = extract(&[ParamDecl::new("word", TypeDecl::text_len(1, 3))])?;

    // Three multibyte characters are within a max length of three
    let args = coerce(&schema, &text_raw(&[("word", "äöü")]))?;
    assert_eq!(args.get("word"), Some(&Value::Text("äöü".into())));

    let err = coerce(&schema, &text_raw(&[("word", "vier")])).unwrap_err();
    assert!(matches!(err, ValidationError::ConstraintViolation { .. }));
    Ok(())
}

// =============================================================================
// Invocation Tests
// =============================================================================

#[test]
fn test_invoke_captures_panic() -> anyhow::Result<()> {
    let func = WebFunction::new("kaboom", vec![], |_args| -> anyhow::Result<ReturnValue> {
        panic!("boom")
    })?;

    let err = func.invoke(&Args::default()).unwrap_err();
    assert!(matches!(err, InvokeError::Panicked(msg) if msg == "boom"));
    Ok(())
}

#[test]
fn test_invoke_propagates_failure() -> anyhow::Result<()> {
    let func = WebFunction::new("nope", vec![], |_args| anyhow::bail!("out of cheese"))?;

    let err = func.invoke(&Args::default()).unwrap_err();
    assert!(matches!(err, InvokeError::Failed(_)));
    assert!(err.to_string().contains("out of cheese"));
    Ok(())
}

// =============================================================================
// Classification Tests
// =============================================================================

#[test]
fn test_scalar_renders_as_text() {
    let (_dir, files) = store();
    let result = render(ReturnValue::Int(42), &files).unwrap();
    assert_eq!(result, RenderedResult::Text("42".into()));
}

#[test]
fn test_image_renders_as_data_uri() {
    let (_dir, files) = store();
    let result = render(ReturnValue::Image(vec![1, 2, 3]), &files).unwrap();
    let RenderedResult::Image { data_uri } = result else {
        panic!("expected image");
    };
    assert!(data_uri.starts_with("data:image/png;base64,"));
}

#[test]
fn test_columnar_record_renders_as_table() {
    let (_dir, files) = store();
    let value = ReturnValue::Record(vec![
        ("a".into(), ReturnValue::List(vec![ReturnValue::Int(1), ReturnValue::Int(2)])),
        ("b".into(), ReturnValue::List(vec!["x".into(), "y".into()])),
    ]);
    let result = render(value, &files).unwrap();
    assert_eq!(
        result,
        RenderedResult::Table {
            headers: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into(), "x".into()], vec!["2".into(), "y".into()]],
        }
    );
}

#[test]
fn test_ragged_record_renders_as_text() {
    let (_dir, files) = store();
    let value = ReturnValue::Record(vec![
        ("a".into(), ReturnValue::List(vec![ReturnValue::Int(1)])),
        ("b".into(), ReturnValue::List(vec!["x".into(), "y".into()])),
    ]);
    let result = render(value, &files).unwrap();
    assert!(matches!(result, RenderedResult::Text(_)));
}

#[test]
fn test_record_rows_render_as_table() {
    let (_dir, files) = store();
    let row = |name: &str, age: i64| {
        ReturnValue::Record(vec![
            ("name".into(), name.into()),
            ("age".into(), ReturnValue::Int(age)),
        ])
    };
    let value = ReturnValue::List(vec![row("ada", 36), row("grace", 85)]);
    let result = render(value, &files).unwrap();
    assert_eq!(
        result,
        RenderedResult::Table {
            headers: vec!["name".into(), "age".into()],
            rows: vec![
                vec!["ada".into(), "36".into()],
                vec!["grace".into(), "85".into()]
            ],
        }
    );
}

#[test]
fn test_tuple_fans_out_to_multiple() {
    let (_dir, files) = store();
    let value = ReturnValue::Tuple(vec!["ok".into(), ReturnValue::Int(7)]);
    let result = render(value, &files).unwrap();
    assert_eq!(
        result,
        RenderedResult::Multiple(vec![
            RenderedResult::Text("ok".into()),
            RenderedResult::Text("7".into()),
        ])
    );
}

#[test]
fn test_nested_table_survives_fan_out() {
    let (_dir, files) = store();
    // A mixed sequence fans out; a nested sequence that is itself
    // table-shaped renders as a table instead of erroring
    let value = ReturnValue::List(vec![
        "summary".into(),
        ReturnValue::List(vec![
            ReturnValue::Tuple(vec![ReturnValue::Int(1), "a".into()]),
            ReturnValue::Tuple(vec![ReturnValue::Int(2), "b".into()]),
        ]),
    ]);
    let result = render(value, &files).unwrap();
    let RenderedResult::Multiple(outputs) = result else {
        panic!("expected fan-out");
    };
    assert_eq!(outputs[0], RenderedResult::Text("summary".into()));
    assert!(matches!(outputs[1], RenderedResult::Table { .. }));
}

#[test]
fn test_nested_sequence_is_an_error() {
    let (_dir, files) = store();
    // A list containing a non-tabular list cannot be rendered
    let value = ReturnValue::List(vec![
        "ok".into(),
        ReturnValue::List(vec!["deep".into(), ReturnValue::List(vec![])]),
    ]);
    let err = render(value, &files).unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedNesting));
}

#[test]
fn test_empty_sequence_is_text() {
    let (_dir, files) = store();
    assert_eq!(
        render(ReturnValue::List(vec![]), &files).unwrap(),
        RenderedResult::Text("[]".into())
    );
    assert_eq!(
        render(ReturnValue::Tuple(vec![]), &files).unwrap(),
        RenderedResult::Text("()".into())
    );
}

#[test]
fn test_file_list_renders_as_downloads() {
    let (_dir, files) = store();
    let value = ReturnValue::List(vec![
        ReturnValue::File {
            filename: "a.txt".into(),
            data: b"aaa".to_vec(),
        },
        ReturnValue::File {
            filename: "b.txt".into(),
            data: b"bbb".to_vec(),
        },
    ]);
    let result = render(value, &files).unwrap();
    let RenderedResult::Downloads(refs) = result else {
        panic!("expected downloads");
    };
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].filename, "a.txt");

    // Each handle resolves to the persisted content
    let resolved = files.resolve(&refs[1].handle).unwrap();
    assert_eq!(std::fs::read(&resolved.path).unwrap(), b"bbb");
}

// =============================================================================
// Full Pipeline Test
// =============================================================================

#[test]
fn test_submission_round_trip() -> anyhow::Result<()> {
    let (_dir, files) = store();
    let func = WebFunction::new(
        "repeat",
        vec![
            ParamDecl::new("word", TypeDecl::text()).with_default(Value::Text("hi".into())),
            ParamDecl::new("times", TypeDecl::integer_range(1, 10)).with_default(Value::Int(2)),
        ],
        |args| {
            let word = args.get("word").map(|v| v.to_string()).unwrap_or_default();
            let times = match args.get("times") {
                Some(Value::Int(n)) => *n as usize,
                _ => 1,
            };
            Ok(ReturnValue::Text(word.repeat(times)))
        },
    )?;

    let raw = text_raw(&[("word", "ab"), ("times", "3")]);
    let args = coerce(func.schema(), &raw)?;
    let value = func.invoke(&args)?;
    let result = render(value, &files)?;

    assert_eq!(result, RenderedResult::Text("ababab".into()));
    Ok(())
}
