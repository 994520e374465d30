//! Vendor request bridge CLI.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vendor_bridge::cli::{Command, PreviewArgs, RootArgs, SubmitArgs};
use vendor_bridge::files::VENDOR_FILE_FIELDS;
use vendor_bridge::mapping::VENDOR_REQUEST_SPEC;
use vendor_bridge::restlet::SubmissionResult;
use vendor_bridge::{config, document, files, mapping, payload, report, restlet};

fn main() {
    init_tracing();
    let args = RootArgs::parse();
    let exit_code = match run(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(args: RootArgs) -> Result<i32> {
    match args.command {
        Command::Preview(args) => cmd_preview(args),
        Command::Submit(args) => cmd_submit(args),
    }
}

/// Fetch a document and render the mapping preview; no submission, no
/// file downloads.
fn cmd_preview(args: PreviewArgs) -> Result<i32> {
    let Some(document_id) = args.document else {
        return idle_hint();
    };
    let endpoints = config::load_endpoints(args.config.as_deref())?;
    let secrets = config::Secrets::from_env()?;
    let agent = config::http_agent(endpoints.timeout_secs);

    let doc = document::fetch_document(
        &agent,
        &endpoints.document_api_base,
        &secrets.document_api_token,
        &document_id,
    )?;
    let mapped = mapping::map_fields(&doc, &VENDOR_REQUEST_SPEC);
    report::print_preview(&document_id, &mapped.preview);
    Ok(0)
}

/// The full pipeline: fetch, map, preview, collect files, assemble, submit.
fn cmd_submit(args: SubmitArgs) -> Result<i32> {
    let Some(document_id) = args.document else {
        return idle_hint();
    };
    let endpoints = config::load_endpoints(args.config.as_deref())?;
    let secrets = config::Secrets::from_env()?;
    let agent = config::http_agent(endpoints.timeout_secs);

    let doc = document::fetch_document(
        &agent,
        &endpoints.document_api_base,
        &secrets.document_api_token,
        &document_id,
    )?;
    let mapped = mapping::map_fields(&doc, &VENDOR_REQUEST_SPEC);
    report::print_preview(&document_id, &mapped.preview);

    let collected = files::collect_files(&agent, &doc, VENDOR_FILE_FIELDS);
    report::print_collection(&collected);

    let payload = payload::assemble(&endpoints, mapped, &collected.entries);

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(0);
    }

    let result = restlet::submit(&agent, &endpoints, &secrets, &payload)?;
    report::print_outcome(&result);
    Ok(match result {
        SubmissionResult::Success { .. } => 0,
        SubmissionResult::Failure { .. } => 1,
    })
}

/// Absence of a document identifier is a valid idle state: no side effects.
fn idle_hint() -> Result<i32> {
    println!("Enter a document identifier to get started.");
    Ok(0)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
