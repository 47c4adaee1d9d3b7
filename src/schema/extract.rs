//! Schema extraction from parameter declarations.

use regex::Regex;

use crate::logging::debug;

use super::decl::{DefaultDecl, ParamDecl, TypeDecl};
use super::error::SchemaError;
use super::types::{ConstraintSet, Kind, ParamInfo, Schema, Value, join_values};

/// Primitive kinds allowed as choice option / list element types.
const OPTION_KINDS: [Kind; 4] = [Kind::Integer, Kind::Float, Kind::Text, Kind::Boolean];

/// Extract an ordered schema from a function's parameter declarations.
///
/// Every declaration must carry a type. Defaults are validated against the
/// fully assembled parameter at extraction time, so an invalid default is
/// a registration error rather than a deferred submission failure.
pub fn extract(decls: &[ParamDecl]) -> Result<Schema, SchemaError> {
    let mut params: Vec<ParamInfo> = Vec::with_capacity(decls.len());

    for decl in decls {
        if params.iter().any(|p| p.name == decl.name) {
            return Err(SchemaError::DuplicateParam {
                param: decl.name.clone(),
            });
        }

        let ty = decl.ty.as_ref().ok_or_else(|| SchemaError::MissingTypeAnnotation {
            param: decl.name.clone(),
        })?;

        let info = assemble(&decl.name, ty, decl.default.as_ref())?;

        if let Some(default) = &info.default {
            info.check(default).map_err(|violation| SchemaError::InvalidDefault {
                param: decl.name.clone(),
                reason: format!("'{}' {}", default, violation),
            })?;
        }

        debug!(param = %info.name, kind = %info.kind, "extracted parameter");
        params.push(info);
    }

    Ok(Schema::new(params))
}

fn assemble(
    name: &str,
    ty: &TypeDecl,
    default: Option<&DefaultDecl>,
) -> Result<ParamInfo, SchemaError> {
    match ty {
        TypeDecl::Integer { min, max } => Ok(ParamInfo {
            name: name.to_string(),
            kind: Kind::Integer,
            default: scalar_default(name, default)?,
            constraints: ConstraintSet {
                min: min.clone(),
                max: max.clone(),
                ..ConstraintSet::default()
            },
        }),
        TypeDecl::Float { min, max } => Ok(ParamInfo {
            name: name.to_string(),
            kind: Kind::Float,
            default: scalar_default(name, default)?,
            constraints: ConstraintSet {
                min: min.clone(),
                max: max.clone(),
                ..ConstraintSet::default()
            },
        }),
        TypeDecl::Text {
            min_length,
            max_length,
            pattern,
        } => {
            let compiled = match pattern {
                Some(p) => Some(Regex::new(p).map_err(|source| SchemaError::InvalidPattern {
                    param: name.to_string(),
                    pattern: p.clone(),
                    source,
                })?),
                None => None,
            };
            Ok(ParamInfo {
                name: name.to_string(),
                kind: Kind::Text,
                default: scalar_default(name, default)?,
                constraints: ConstraintSet {
                    min_length: *min_length,
                    max_length: *max_length,
                    pattern: compiled,
                    ..ConstraintSet::default()
                },
            })
        }
        TypeDecl::Boolean => Ok(ParamInfo {
            name: name.to_string(),
            kind: Kind::Boolean,
            default: scalar_default(name, default)?,
            constraints: ConstraintSet::default(),
        }),
        TypeDecl::Date => Ok(ParamInfo {
            name: name.to_string(),
            kind: Kind::Date,
            default: scalar_default(name, default)?,
            constraints: ConstraintSet::default(),
        }),
        TypeDecl::OneOf(options) => {
            check_options(name, options)?;
            Ok(ParamInfo {
                name: name.to_string(),
                kind: Kind::Choice,
                default: scalar_default(name, default)?,
                constraints: ConstraintSet {
                    options: options.clone(),
                    ..ConstraintSet::default()
                },
            })
        }
        TypeDecl::ListOf(item_kind) => {
            if !OPTION_KINDS.contains(item_kind) {
                return Err(SchemaError::UnsupportedType {
                    param: name.to_string(),
                    detail: format!(
                        "list of {} is not supported (supported: integer, float, text, boolean)",
                        item_kind
                    ),
                });
            }
            let options = list_default(name, item_kind, default)?;
            let first = options.first().cloned();
            Ok(ParamInfo {
                name: name.to_string(),
                kind: Kind::Choice,
                default: first,
                constraints: ConstraintSet {
                    options,
                    ..ConstraintSet::default()
                },
            })
        }
        TypeDecl::FileUpload { extensions } => Ok(ParamInfo {
            name: name.to_string(),
            kind: Kind::FileRef,
            default: scalar_default(name, default)?,
            constraints: ConstraintSet {
                allowed_extensions: extensions.clone(),
                ..ConstraintSet::default()
            },
        }),
    }
}

fn scalar_default(
    name: &str,
    default: Option<&DefaultDecl>,
) -> Result<Option<Value>, SchemaError> {
    match default {
        None => Ok(None),
        Some(DefaultDecl::Value(v)) => Ok(Some(v.clone())),
        Some(DefaultDecl::List(_)) => Err(SchemaError::InvalidDefault {
            param: name.to_string(),
            reason: "a list default is only valid for list-of types".to_string(),
        }),
    }
}

/// Validate the mandatory default of a `ListOf` parameter: a non-empty
/// list, homogeneous in the declared element kind. The list is the option
/// set.
fn list_default(
    name: &str,
    item_kind: &Kind,
    default: Option<&DefaultDecl>,
) -> Result<Vec<Value>, SchemaError> {
    let Some(default) = default else {
        return Err(SchemaError::InvalidChoiceDefault {
            param: name.to_string(),
            reason: "a list-of parameter must declare its options as the default value".to_string(),
        });
    };
    let DefaultDecl::List(options) = default else {
        return Err(SchemaError::InvalidChoiceDefault {
            param: name.to_string(),
            reason: "the default of a list-of parameter must be a list".to_string(),
        });
    };
    if options.is_empty() {
        return Err(SchemaError::InvalidChoiceDefault {
            param: name.to_string(),
            reason: "the option list must have at least one entry".to_string(),
        });
    }
    if let Some(bad) = options.iter().find(|v| v.kind() != *item_kind) {
        return Err(SchemaError::InvalidChoiceDefault {
            param: name.to_string(),
            reason: format!(
                "option '{}' is not a {} (options: [{}])",
                bad,
                item_kind,
                join_values(options)
            ),
        });
    }
    Ok(options.clone())
}

/// Validate an enumerated literal set: non-empty and homogeneous in one of
/// the primitive option kinds.
fn check_options(name: &str, options: &[Value]) -> Result<(), SchemaError> {
    let Some(first) = options.first() else {
        return Err(SchemaError::UnsupportedType {
            param: name.to_string(),
            detail: "an enumerated type needs at least one option".to_string(),
        });
    };
    let kind = first.kind();
    if !OPTION_KINDS.contains(&kind) {
        return Err(SchemaError::UnsupportedType {
            param: name.to_string(),
            detail: format!("{} literals are not supported as options", kind),
        });
    }
    if options.iter().any(|v| v.kind() != kind) {
        return Err(SchemaError::UnsupportedType {
            param: name.to_string(),
            detail: "mixed literal types in option set".to_string(),
        });
    }
    Ok(())
}
