//! CLI argument parsing for the vendor request bridge.
//!
//! The CLI is intentionally thin: each command wires the same linear
//! pipeline with no policy of its own, so the core stages stay reusable
//! and independently testable.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for the bridge.
#[derive(Parser, Debug)]
#[command(
    name = "vbridge",
    version,
    about = "Fetch a document's fields and submit them as an ERP vendor request",
    after_help = "Examples:\n  vbridge preview Ab3xK9QmPdR2\n  vbridge submit Ab3xK9QmPdR2\n  vbridge submit Ab3xK9QmPdR2 --dry-run\n  vbridge submit Ab3xK9QmPdR2 --config endpoints.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Preview(PreviewArgs),
    Submit(SubmitArgs),
}

/// Preview command inputs: fetch and map, no submission.
#[derive(Parser, Debug)]
#[command(about = "Fetch a document and preview the field mapping")]
pub struct PreviewArgs {
    /// Document identifier; prints a hint and exits cleanly when omitted
    pub document: Option<String>,

    /// JSON file overriding endpoint settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Submit command inputs: the full fetch, map, collect, submit pipeline.
#[derive(Parser, Debug)]
#[command(about = "Fetch a document, collect its files, and submit the vendor request")]
pub struct SubmitArgs {
    /// Document identifier; prints a hint and exits cleanly when omitted
    pub document: Option<String>,

    /// JSON file overriding endpoint settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Assemble and print the payload without calling the ERP endpoint
    #[arg(long)]
    pub dry_run: bool,
}
