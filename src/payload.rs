//! Payload assembly: URL canonicalization plus the final submission object.
//!
//! Assembly has no failure mode of its own; everything that can go wrong
//! happens upstream. The output is built once per run and submitted once.
use crate::config::Endpoints;
use crate::files::FileEntry;
use crate::mapping::{MappedFields, WEBSITE_KEY};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Schemes accepted as-is by the website canonicalization rule.
const KNOWN_SCHEMES: [&str; 4] = ["http://", "https://", "ftp://", "file://"];

/// Canonicalize a website value to an absolute URL.
///
/// Blank input becomes `None`; a recognized scheme passes through; anything
/// else (authors often type just the host) is prefixed with `https://`.
pub fn canonicalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if KNOWN_SCHEMES.iter().any(|scheme| trimmed.starts_with(scheme)) {
        return Some(trimmed.to_string());
    }
    Some(format!("https://{trimmed}"))
}

/// The assembled submission object.
///
/// File entries are flattened into numbered `filename{i}`/`content{i}` key
/// pairs so the receiving script can associate each name with its content.
#[derive(Debug, Clone, Serialize)]
pub struct TargetPayload {
    pub folderid: String,
    pub customrec_type: String,
    pub otherfields: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub files: BTreeMap<String, String>,
}

/// Merge routing metadata, mapped fields, and collected files into one
/// payload, applying website canonicalization on the way in.
pub fn assemble(
    endpoints: &Endpoints,
    mapped: MappedFields,
    files: &[FileEntry],
) -> TargetPayload {
    let mut otherfields = mapped.values;

    if let Some(value) = otherfields.get(WEBSITE_KEY) {
        let canonical = value.as_str().and_then(canonicalize_url);
        otherfields.insert(
            WEBSITE_KEY.to_string(),
            canonical.map_or(Value::Null, Value::String),
        );
    }

    let mut file_pairs = BTreeMap::new();
    for (index, entry) in files.iter().enumerate() {
        let position = index + 1;
        file_pairs.insert(format!("filename{position}"), entry.name.clone());
        file_pairs.insert(format!("content{position}"), entry.content_base64.clone());
    }

    TargetPayload {
        folderid: endpoints.folder_id.clone(),
        customrec_type: endpoints.custom_record_type.clone(),
        otherfields,
        files: file_pairs,
    }
}
