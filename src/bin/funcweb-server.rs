//! funcweb HTTP API server with a small set of demo functions.

use anyhow::bail;
use clap::Parser;
use std::path::PathBuf;

use funcweb::prelude::*;
use funcweb::server::{Config, init_logging, serve};

/// funcweb HTTP API server.
#[derive(Parser, Debug)]
#[command(name = "funcweb-server")]
#[command(about = "HTTP API server exposing typed functions as web forms")]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "funcweb.toml")]
    config: PathBuf,
}

/// Demo functions served when the binary is run directly.
fn demo_registry() -> std::result::Result<Registry, SchemaError> {
    let mut registry = Registry::new();

    registry.register(WebFunction::new(
        "greet",
        vec![
            ParamDecl::new("name", TypeDecl::text()).with_default(Value::Text("World".into())),
            ParamDecl::new("times", TypeDecl::integer_range(1, 5)).with_default(Value::Int(1)),
            ParamDecl::new("excited", TypeDecl::boolean()).with_default(Value::Bool(false)),
            ParamDecl::new("mood", TypeDecl::ListOf(Kind::Text)).with_options([
                Value::Text("happy".into()),
                Value::Text("calm".into()),
                Value::Text("grumpy".into()),
            ]),
        ],
        |args| {
            let name = args
                .get("name")
                .map(|v| v.to_string())
                .unwrap_or_default();
            let times = match args.get("times") {
                Some(Value::Int(n)) => *n,
                _ => 1,
            };
            let excited = matches!(args.get("excited"), Some(Value::Bool(true)));
            let mood = args
                .get("mood")
                .map(|v| v.to_string())
                .unwrap_or_default();

            let punct = if excited { "!" } else { "." };
            let line = format!("Hello, {} ({}){}", name, mood, punct);
            let lines: Vec<String> = (0..times).map(|_| line.clone()).collect();
            Ok(ReturnValue::Text(lines.join("\n")))
        },
    )?);

    registry.register(WebFunction::new(
        "divide",
        vec![
            ParamDecl::new("numerator", TypeDecl::float()).with_default(Value::Float(1.0)),
            ParamDecl::new("denominator", TypeDecl::float()).with_default(Value::Float(1.0)),
        ],
        |args| {
            let n = match args.get("numerator") {
                Some(Value::Float(v)) => *v,
                _ => 0.0,
            };
            let d = match args.get("denominator") {
                Some(Value::Float(v)) => *v,
                _ => 0.0,
            };
            if d == 0.0 {
                bail!("division by zero");
            }
            Ok(ReturnValue::Float(n / d))
        },
    )?);

    Ok(registry)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // A missing config file is not an error; defaults apply.
    let config = if args.config.exists() {
        Config::from_file(&args.config)?
    } else {
        Config::default()
    };

    init_logging(&config.logging)?;

    let registry = demo_registry()?;
    tracing::info!("Serving {} function(s)", registry.len());

    serve(registry, config).await
}
