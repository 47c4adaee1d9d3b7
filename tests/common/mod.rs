//! Common test utilities and fixtures.
//!
//! Builds a registry of small test functions and an in-process test
//! server around them.

#![cfg(feature = "server")]

use std::sync::Arc;

use anyhow::bail;
use axum_test::TestServer;
use tempfile::TempDir;

use funcweb::prelude::*;
use funcweb::server::{AppState, router};

/// A test server with its own temporary file store.
pub struct TestApp {
    pub server: TestServer,
    /// Held so the store directory outlives the test.
    #[allow(dead_code)]
    pub files_dir: TempDir,
    pub files: Arc<FileStore>,
}

impl TestApp {
    pub fn new() -> anyhow::Result<Self> {
        let files_dir = TempDir::new()?;
        let files = Arc::new(FileStore::open(files_dir.path())?);
        let state = AppState::new(Arc::new(test_registry()?), Arc::clone(&files));
        let server = TestServer::new(router(state))?;
        Ok(Self {
            server,
            files_dir,
            files,
        })
    }
}

/// Registry of functions covering every result and validation shape the
/// API tests exercise.
pub fn test_registry() -> std::result::Result<Registry, SchemaError> {
    let mut registry = Registry::new();

    registry.register(WebFunction::new(
        "greet",
        vec![
            ParamDecl::new("name", TypeDecl::text()).with_default(Value::Text("World".into())),
            ParamDecl::new("age", TypeDecl::integer_range(18, 120)).with_default(Value::Int(30)),
            ParamDecl::new("excited", TypeDecl::boolean()).with_default(Value::Bool(false)),
            ParamDecl::new("favorite_color", TypeDecl::color())
                .with_default(Value::Text("#ff0000".into())),
        ],
        |args| {
            let name = args.get("name").map(|v| v.to_string()).unwrap_or_default();
            let excited = matches!(args.get("excited"), Some(Value::Bool(true)));
            let punct = if excited { "!" } else { "." };
            Ok(ReturnValue::Text(format!("Hello, {}{}", name, punct)))
        },
    )?);

    registry.register(WebFunction::new(
        "make_report",
        vec![ParamDecl::new("title", TypeDecl::text()).with_default(Value::Text("report".into()))],
        |args| {
            let title = args.get("title").map(|v| v.to_string()).unwrap_or_default();
            Ok(ReturnValue::File {
                filename: format!("{}.txt", title),
                data: format!("contents of {}", title).into_bytes(),
            })
        },
    )?);

    registry.register(WebFunction::new(
        "scores_table",
        vec![],
        |_args| {
            Ok(ReturnValue::Record(vec![
                (
                    "name".to_string(),
                    ReturnValue::List(vec!["ada".into(), "grace".into()]),
                ),
                (
                    "score".to_string(),
                    ReturnValue::List(vec![ReturnValue::Int(10), ReturnValue::Int(12)]),
                ),
            ]))
        },
    )?);

    registry.register(WebFunction::new(
        "text_file_size",
        vec![ParamDecl::new("data", TypeDecl::text_file())],
        |args| {
            let Some(Value::Path(path)) = args.get("data") else {
                bail!("missing upload");
            };
            let len = std::fs::metadata(path)?.len();
            Ok(ReturnValue::Text(format!("{} bytes", len)))
        },
    )?);

    registry.register(WebFunction::new(
        "always_fails",
        vec![],
        |_args| bail!("nothing works"),
    )?);

    Ok(registry)
}
