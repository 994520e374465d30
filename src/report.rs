//! Terminal rendering: the mapping preview table, file collection notes,
//! and the final submission outcome.
//!
//! This is the only module that prints; the pipeline stages it renders have
//! no presentation dependencies of their own.
use crate::files::{CollectedFiles, SkippedFile};
use crate::mapping::PreviewRow;
use crate::restlet::SubmissionResult;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

/// Sentinel shown when a source field is absent from the document.
const MISSING: &str = "(missing)";
/// Sentinel shown when the submitted value will be empty.
const EMPTY: &str = "(empty)";

/// Build the preview table of every mapped field.
pub fn preview_table(rows: &[PreviewRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            header_cell("Source Field"),
            header_cell("Target Field"),
            header_cell("Source Value"),
            header_cell("Mapped Value"),
        ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.source_id),
            Cell::new(&row.target_key),
            Cell::new(row.raw.as_deref().unwrap_or(MISSING)),
            Cell::new(row.mapped.as_deref().unwrap_or(EMPTY)),
        ]);
    }
    table
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

/// Print the mapping preview ahead of submission.
pub fn print_preview(document_id: &str, rows: &[PreviewRow]) {
    println!("Mapping preview for document {document_id}:");
    println!("{}", preview_table(rows));
}

/// Print per-file collection results.
pub fn print_collection(collected: &CollectedFiles) {
    for entry in &collected.entries {
        println!("Collected file: {}", entry.name);
    }
    for SkippedFile { field_id, reason } in &collected.skipped {
        println!("Skipped {field_id}: {reason}");
    }
}

/// Print the terminal outcome of the run.
pub fn print_outcome(result: &SubmissionResult) {
    match result {
        SubmissionResult::Success {
            record_id,
            record_url,
        } => {
            println!("SUCCESS | record {record_id}");
            println!("Open record: {record_url}");
        }
        SubmissionResult::Failure { detail } => {
            println!("Submission failed: {detail}");
        }
    }
}
