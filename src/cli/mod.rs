//! CLI module
//!
//! Command-line interface for the mock server and offline inference.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP mock server
//! - `infer` - Print the inferred schema of a JSON document
//! - `check` - Validate a JSON document against a schema file

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, InferenceArgs};
pub use runner::{read_json, render_schema, Runner};
pub use server::{router, router_with_cache, serve, ServerConfig, OUTCOME_HEADER};
