//! Deployment configuration.
//!
//! Which endpoint the browser talks to is configuration, not core logic: the
//! public Rick and Morty API by default, or a local server such as
//! `http://localhost:8000/graphql` via flag or environment.

use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_ENDPOINT: &str = "https://rickandmortyapi.com/graphql";

#[derive(Debug, Parser)]
#[command(name = "citadel", about = "Terminal browser for GraphQL character and user data")]
pub struct Cli {
    /// GraphQL endpoint to query.
    #[arg(long, env = "CITADEL_GRAPHQL_URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Write diagnostic logs to this file. The terminal owns stdout, so
    /// logging is file-only and off unless requested.
    #[arg(long, env = "CITADEL_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}
