//! CLI runner - executes commands

use crate::cache::JsonSchemaValidator;
use crate::cli::commands::{Cli, Commands, InferenceArgs};
use crate::cli::server::{serve, ServerConfig};
use crate::error::{Error, Result, ResultExt};
use crate::schema::{InferenceOptions, SchemaInferrer};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Serve {
                host,
                port,
                public_origin,
                inference,
            } => {
                let mut config = ServerConfig::new(*port)
                    .with_host(host.clone())
                    .with_inference(inference.options());
                if let Some(origin) = public_origin {
                    config = config.with_public_origin(origin.clone());
                }
                serve(config).await
            }
            Commands::Infer {
                file,
                pretty,
                inference,
            } => self.infer(file.as_deref(), *pretty, *inference),
            Commands::Check { schema, data } => self.check(schema, data.as_deref()),
        }
    }

    fn infer(&self, file: Option<&Path>, pretty: bool, inference: InferenceArgs) -> Result<()> {
        let value = read_json(file)?;
        let output = render_schema(&value, inference.options(), pretty)?;
        println!("{output}");
        Ok(())
    }

    fn check(&self, schema: &Path, data: Option<&Path>) -> Result<()> {
        let schema = read_json(Some(schema))?;
        let data = read_json(data)?;

        let violations = JsonSchemaValidator::new().violations(&schema, &data)?;
        if violations.is_empty() {
            if self.cli.verbose {
                eprintln!("Document conforms to schema");
            }
            return Ok(());
        }

        for violation in &violations {
            eprintln!("{violation}");
        }
        Err(Error::Other(format!(
            "Document does not conform to schema ({} violation(s))",
            violations.len()
        )))
    }
}

/// Infer a schema and serialize it
pub fn render_schema(value: &Value, options: InferenceOptions, pretty: bool) -> Result<String> {
    let schema = SchemaInferrer::with_options(options).infer(value)?;
    let text = if pretty {
        serde_json::to_string_pretty(&schema)?
    } else {
        serde_json::to_string(&schema)?
    };
    Ok(text)
}

/// Read a JSON document from a file, or from stdin for `None` and `-`
pub fn read_json(path: Option<&Path>) -> Result<Value> {
    match path {
        Some(path) if path != Path::new("-") => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))
        }
        _ => {
            let mut contents = String::new();
            std::io::stdin()
                .read_to_string(&mut contents)
                .context("Failed to read stdin")?;
            Ok(serde_json::from_str(&contents)?)
        }
    }
}
