//! Tests for schema extraction and field descriptor building.

use funcweb::prelude::*;

// =============================================================================
// Extraction Tests
// =============================================================================

#[test]
fn test_extract_preserves_declaration_order() -> anyhow::Result<()> {
    let schema = extract(&[
        ParamDecl::new("b", TypeDecl::integer()),
        ParamDecl::new("a", TypeDecl::text()),
        ParamDecl::new("c", TypeDecl::boolean()),
    ])?;

    let names: Vec<_> = schema.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["b", "a", "c"]);
    Ok(())
}

#[test]
fn test_extract_rejects_untyped_param() {
    let err = extract(&[ParamDecl::untyped("mystery")]).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::MissingTypeAnnotation { param } if param == "mystery"
    ));
}

#[test]
fn test_extract_rejects_duplicate_param() {
    let err = extract(&[
        ParamDecl::new("x", TypeDecl::integer()),
        ParamDecl::new("x", TypeDecl::text()),
    ])
    .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateParam { param } if param == "x"));
}

#[test]
fn test_extract_rejects_out_of_range_default() {
    let err = extract(&[
        ParamDecl::new("age", TypeDecl::integer_range(18, 120)).with_default(Value::Int(5)),
    ])
    .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDefault { param, .. } if param == "age"));
}

#[test]
fn test_extract_rejects_invalid_pattern() {
    let err = extract(&[ParamDecl::new("code", TypeDecl::pattern("["))]).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidPattern { param, .. } if param == "code"));
}

#[test]
fn test_list_of_default_becomes_option_set() -> anyhow::Result<()> {
    let schema = extract(&[ParamDecl::new("mode", TypeDecl::ListOf(Kind::Text)).with_options([
        Value::Text("fast".into()),
        Value::Text("slow".into()),
    ])])?;

    let param = schema.get("mode").unwrap();
    assert_eq!(param.kind, Kind::Choice);
    assert_eq!(param.constraints.options.len(), 2);
    // The first option doubles as the default selection.
    assert_eq!(param.default, Some(Value::Text("fast".into())));
    Ok(())
}

#[test]
fn test_list_of_requires_options() {
    let err = extract(&[ParamDecl::new("mode", TypeDecl::ListOf(Kind::Text))]).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidChoiceDefault { .. }));
}

#[test]
fn test_list_of_rejects_mixed_options() {
    let err = extract(&[ParamDecl::new("mode", TypeDecl::ListOf(Kind::Integer)).with_options([
        Value::Int(1),
        Value::Text("two".into()),
    ])])
    .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidChoiceDefault { .. }));
}

#[test]
fn test_one_of_rejects_empty_options() {
    let err = extract(&[ParamDecl::new("mode", TypeDecl::one_of(Vec::new()))]).unwrap_err();
    assert!(matches!(err, SchemaError::UnsupportedType { .. }));
}

#[test]
fn test_one_of_default_must_be_member() {
    let err = extract(&[
        ParamDecl::new("mode", TypeDecl::one_of([Value::Text("a".into()), Value::Text("b".into())]))
            .with_default(Value::Text("c".into())),
    ])
    .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDefault { param, .. } if param == "mode"));
}

// =============================================================================
// Field Building Tests
// =============================================================================

#[test]
fn test_number_field_attrs() -> anyhow::Result<()> {
    let schema = extract(&[
        ParamDecl::new("count", TypeDecl::integer_range(1, 10)),
        ParamDecl::new("ratio", TypeDecl::float_range(0.0, 1.0)),
    ])?;
    let fields = build_fields(&schema);

    let count = &fields[0];
    assert_eq!(count.widget, Widget::Number);
    assert!(count.attrs.contains(&("step".into(), "1".into())));
    assert!(count.attrs.contains(&("min".into(), "1".into())));
    assert!(count.attrs.contains(&("max".into(), "10".into())));

    let ratio = &fields[1];
    assert!(ratio.attrs.contains(&("step".into(), "any".into())));
    Ok(())
}

#[test]
fn test_checkbox_field_is_never_required() -> anyhow::Result<()> {
    let schema = extract(&[
        ParamDecl::new("flag", TypeDecl::boolean()).with_default(Value::Bool(true)),
    ])?;
    let fields = build_fields(&schema);

    assert_eq!(fields[0].widget, Widget::Checkbox);
    assert!(!fields[0].required);
    assert!(fields[0].attrs.contains(&("checked".into(), "checked".into())));
    Ok(())
}

#[test]
fn test_well_known_patterns_pick_sub_widgets() -> anyhow::Result<()> {
    let schema = extract(&[
        ParamDecl::new("shade", TypeDecl::color()),
        ParamDecl::new("contact", TypeDecl::email()),
        ParamDecl::new("homepage", TypeDecl::url()),
        ParamDecl::new("phone", TypeDecl::phone()),
        ParamDecl::new("code", TypeDecl::pattern("^[a-z]{4}$")),
    ])?;
    let widgets: Vec<_> = build_fields(&schema).iter().map(|f| f.widget).collect();

    assert_eq!(
        widgets,
        [Widget::Color, Widget::Email, Widget::Url, Widget::Tel, Widget::Text]
    );
    Ok(())
}

#[test]
fn test_file_field_accept_attr() -> anyhow::Result<()> {
    let schema = extract(&[ParamDecl::new("photo", TypeDecl::image_file())])?;
    let fields = build_fields(&schema);

    assert_eq!(fields[0].widget, Widget::File);
    let accept = fields[0]
        .attrs
        .iter()
        .find(|(k, _)| k == "accept")
        .map(|(_, v)| v.as_str());
    assert_eq!(accept, Some(".png,.jpg,.jpeg,.gif,.webp"));
    Ok(())
}

#[test]
fn test_exclusive_bounds_widen() -> anyhow::Result<()> {
    let schema = extract(&[
        ParamDecl::new(
            "n",
            TypeDecl::Integer {
                min: Some(Bound::exclusive(Value::Int(0))),
                max: Some(Bound::exclusive(Value::Int(10))),
            },
        ),
        ParamDecl::new(
            "x",
            TypeDecl::Float {
                min: Some(Bound::exclusive(Value::Float(0.0))),
                max: None,
            },
        ),
    ])?;
    let fields = build_fields(&schema);

    assert!(fields[0].attrs.contains(&("min".into(), "1".into())));
    assert!(fields[0].attrs.contains(&("max".into(), "9".into())));
    assert!(fields[1].attrs.contains(&("min".into(), "0.01".into())));
    Ok(())
}
