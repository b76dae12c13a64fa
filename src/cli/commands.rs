//! CLI commands and argument parsing

use crate::schema::{InferenceOptions, NestedArrayItems, DEFAULT_MAX_DEPTH};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Shape-aware response mocking CLI
#[derive(Parser, Debug)]
#[command(name = "shape-mock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the mock server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Origin the interception script posts back to
        /// (defaults to http://localhost:<port>)
        #[arg(long)]
        public_origin: Option<String>,

        #[command(flatten)]
        inference: InferenceArgs,
    },

    /// Infer the schema of a JSON document
    Infer {
        /// JSON file to read ("-" or absent = stdin)
        file: Option<PathBuf>,

        /// Pretty-print the schema
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        inference: InferenceArgs,
    },

    /// Check a JSON document against a schema file
    Check {
        /// Schema file (JSON)
        schema: PathBuf,

        /// JSON file to check ("-" or absent = stdin)
        data: Option<PathBuf>,
    },
}

/// Inference flags shared by `serve` and `infer`
#[derive(Args, Debug, Clone, Copy)]
pub struct InferenceArgs {
    /// Maximum nesting depth accepted
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Wrap array-valued properties twice, as older mock servers did
    #[arg(long)]
    pub legacy_array_items: bool,
}

impl InferenceArgs {
    /// Convert flags into inference options
    pub fn options(self) -> InferenceOptions {
        InferenceOptions {
            max_depth: self.max_depth,
            nested_array_items: if self.legacy_array_items {
                NestedArrayItems::Legacy
            } else {
                NestedArrayItems::Single
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["shape-mock", "serve"]).unwrap();
        match cli.command {
            Commands::Serve {
                host,
                port,
                public_origin,
                inference,
            } => {
                assert_eq!(host, "0.0.0.0");
                assert_eq!(port, 3000);
                assert!(public_origin.is_none());
                assert_eq!(inference.options(), InferenceOptions::default());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_infer_flags() {
        let cli = Cli::try_parse_from([
            "shape-mock",
            "infer",
            "body.json",
            "--pretty",
            "--max-depth",
            "8",
            "--legacy-array-items",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Infer {
                file,
                pretty,
                inference,
            } => {
                assert_eq!(file, Some(PathBuf::from("body.json")));
                assert!(pretty);
                let options = inference.options();
                assert_eq!(options.max_depth, 8);
                assert_eq!(options.nested_array_items, NestedArrayItems::Legacy);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_check_requires_schema() {
        assert!(Cli::try_parse_from(["shape-mock", "check"]).is_err());
    }
}
