//! File collection: resolve file-reference fields, download each through
//! scoped temp storage, and return transport-safe encoded entries.
//!
//! Collection is best-effort per field. A field without a retrievable file
//! reference, or a download that fails, is logged and skipped; it never
//! aborts the rest of the batch. Output order follows processing order and
//! is compacted: entries are numbered as they are found, not by the
//! requested field's position.
use crate::document::{FileRef, SourceDocument};
use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::io;
use tempfile::NamedTempFile;
use ureq::Agent;

/// Source fields expected to hold file attachments, in submission order.
pub const VENDOR_FILE_FIELDS: &[&str] = &["CollectFile1", "CollectFile2"];

/// Attachments are bounded so a mislinked artifact cannot exhaust memory.
const MAX_FILE_BYTES: u64 = 25 * 1024 * 1024;

/// One retrieved file: display name plus base64-encoded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub content_base64: String,
}

/// A field that produced no file entry, with the reason for the operator log.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub field_id: String,
    pub reason: String,
}

/// Collector output: entries in processing order plus the skip list.
#[derive(Debug, Clone, Default)]
pub struct CollectedFiles {
    pub entries: Vec<FileEntry>,
    pub skipped: Vec<SkippedFile>,
}

/// Encode raw bytes into the transport-safe form carried in the payload.
pub fn encode_content(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Fallback display name for a reference that carries none.
pub fn fallback_name(field_id: &str) -> String {
    format!("{field_id}.bin")
}

/// Collect files for the given field ids.
///
/// Never fails as a whole: each field either contributes an entry or a
/// skip record. Temp storage for a download is released before the next
/// field is processed, on success and failure alike.
pub fn collect_files(
    agent: &Agent,
    document: &SourceDocument,
    field_ids: &[&str],
) -> CollectedFiles {
    let mut collected = CollectedFiles::default();

    for field_id in field_ids.iter().copied() {
        let Some(file_ref) = document.file_ref_of(field_id) else {
            tracing::debug!(field_id, "no retrievable file reference, skipping");
            collected.skipped.push(SkippedFile {
                field_id: field_id.to_string(),
                reason: "no retrievable file reference".to_string(),
            });
            continue;
        };

        let name = file_ref
            .name
            .clone()
            .unwrap_or_else(|| fallback_name(field_id));

        match download(agent, &file_ref) {
            Ok(bytes) => {
                tracing::info!(field_id, name = %name, bytes = bytes.len(), "file collected");
                collected.entries.push(FileEntry {
                    name,
                    content_base64: encode_content(&bytes),
                });
            }
            Err(error) => {
                let reason = format!("{error:#}");
                tracing::warn!(field_id, %reason, "file download failed, skipping");
                collected.skipped.push(SkippedFile {
                    field_id: field_id.to_string(),
                    reason,
                });
            }
        }
    }

    collected
}

/// Download one file through a named temp file.
///
/// The temp file is dropped (and removed) when this function returns,
/// whether the download succeeded or not.
fn download(agent: &Agent, file_ref: &FileRef) -> Result<Vec<u8>> {
    let mut response = agent
        .get(&file_ref.url)
        .call()
        .context("request file content")?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("file host returned {status}"));
    }

    let mut temp = NamedTempFile::new().context("create temp file")?;
    let mut reader = response
        .body_mut()
        .with_config()
        .limit(MAX_FILE_BYTES)
        .reader();
    io::copy(&mut reader, temp.as_file_mut()).context("stream file to temp storage")?;

    let bytes = fs::read(temp.path()).context("read back temp file")?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encode_content_round_trips() {
        let original: Vec<u8> = (0..=255).collect();
        let encoded = encode_content(&original);
        let decoded = STANDARD.decode(encoded).expect("decode");
        assert_eq!(decoded, original);
    }

    #[test]
    fn encoded_content_is_ascii() {
        let encoded = encode_content(&[0x00, 0xff, 0x7f, 0x80]);
        assert!(encoded.is_ascii());
    }

    #[test]
    fn fallback_name_derives_from_field_id() {
        assert_eq!(fallback_name("CollectFile2"), "CollectFile2.bin");
    }

    #[test]
    fn fields_without_file_references_are_skipped_not_fatal() {
        let document: SourceDocument = serde_json::from_value(json!({
            "id": "doc-1",
            "fields": [
                { "field_id": "CollectFile1", "value": "just text" },
            ]
        }))
        .expect("deserialize test document");

        let agent = crate::config::http_agent(1);
        let collected = collect_files(&agent, &document, VENDOR_FILE_FIELDS);

        assert!(collected.entries.is_empty());
        assert_eq!(collected.skipped.len(), 2);
        assert_eq!(collected.skipped[0].field_id, "CollectFile1");
        assert_eq!(collected.skipped[1].field_id, "CollectFile2");
    }
}
