//! Source document model and authenticated fetch.
//!
//! A document is fetched once per run and immutable afterwards. Field values
//! arrive as raw JSON: scalars, enumeration labels, or structured references
//! to remotely hosted files. The accessors here are the only place the rest
//! of the pipeline inspects that shape.
use crate::util::truncate_string;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use ureq::Agent;

/// Maximum diagnostic body bytes carried in a fetch error.
const ERROR_BODY_LIMIT: usize = 2048;

/// One document's identifier plus its ordered field list.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A (field_id, value) pair. Field ids are assumed unique; the first match
/// wins on lookup, mirroring the upstream API's own behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    pub field_id: String,
    #[serde(default)]
    pub value: Value,
}

/// A structured reference to a remotely hosted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub url: String,
    pub name: Option<String>,
}

impl SourceDocument {
    /// Look up a field's raw value; `None` for absent fields and null values.
    pub fn value_of(&self, field_id: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.field_id == field_id)
            .map(|field| &field.value)
            .filter(|value| !value.is_null())
    }

    /// Interpret a field's value as a file reference, if it is one.
    pub fn file_ref_of(&self, field_id: &str) -> Option<FileRef> {
        let value = self.value_of(field_id)?;
        let object = value.as_object()?;
        let url = object.get("url")?.as_str()?.to_string();
        if url.is_empty() {
            return None;
        }
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Some(FileRef { url, name })
    }
}

/// Render a raw field value for preview output.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Object(object) => object
            .get("name")
            .or_else(|| object.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        Value::Null => String::new(),
        Value::Array(_) => value.to_string(),
    }
}

/// Fetch one document's details by identifier.
///
/// Any transport failure or non-success status is fatal for the run: without
/// the document there is nothing to map or submit.
pub fn fetch_document(
    agent: &Agent,
    api_base: &str,
    api_token: &str,
    document_id: &str,
) -> Result<SourceDocument> {
    let url = format!("{api_base}/documents/{document_id}/details");
    tracing::info!(document_id, "fetching document details");

    let mut response = agent
        .get(&url)
        .header("Authorization", &format!("API-Key {api_token}"))
        .header("Content-Type", "application/json")
        .call()
        .with_context(|| format!("fetch document {document_id}"))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.body_mut().read_to_string().unwrap_or_default();
        return Err(anyhow!(
            "document API returned {status} for {document_id}: {}",
            truncate_string(&body, ERROR_BODY_LIMIT)
        ));
    }

    let document: SourceDocument = response
        .body_mut()
        .read_json()
        .context("parse document details JSON")?;
    tracing::info!(field_count = document.fields.len(), "document fetched");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(fields: Value) -> SourceDocument {
        serde_json::from_value(json!({ "id": "doc-1", "fields": fields }))
            .expect("deserialize test document")
    }

    #[test]
    fn value_of_finds_present_field() {
        let doc = document(json!([{ "field_id": "Text1", "value": "Acme GmbH" }]));
        assert_eq!(doc.value_of("Text1"), Some(&json!("Acme GmbH")));
    }

    #[test]
    fn value_of_treats_null_as_absent() {
        let doc = document(json!([{ "field_id": "Text1", "value": null }]));
        assert_eq!(doc.value_of("Text1"), None);
        assert_eq!(doc.value_of("Text9"), None);
    }

    #[test]
    fn field_without_value_key_deserializes_as_null() {
        let doc = document(json!([{ "field_id": "Text1" }]));
        assert_eq!(doc.value_of("Text1"), None);
    }

    #[test]
    fn file_ref_requires_structured_value_with_url() {
        let doc = document(json!([
            { "field_id": "CollectFile1", "value": { "url": "https://files.example.com/w9.pdf", "name": "w9.pdf" } },
            { "field_id": "CollectFile2", "value": "not a file" },
            { "field_id": "CollectFile3", "value": { "name": "orphan.pdf" } },
            { "field_id": "CollectFile4", "value": { "url": "" } },
        ]));
        assert_eq!(
            doc.file_ref_of("CollectFile1"),
            Some(FileRef {
                url: "https://files.example.com/w9.pdf".to_string(),
                name: Some("w9.pdf".to_string()),
            })
        );
        assert_eq!(doc.file_ref_of("CollectFile2"), None);
        assert_eq!(doc.file_ref_of("CollectFile3"), None);
        assert_eq!(doc.file_ref_of("CollectFile4"), None);
    }

    #[test]
    fn file_ref_name_is_optional() {
        let doc = document(json!([
            { "field_id": "CollectFile1", "value": { "url": "https://files.example.com/blob" } },
        ]));
        let file_ref = doc.file_ref_of("CollectFile1").expect("file ref");
        assert_eq!(file_ref.name, None);
    }

    #[test]
    fn display_value_renders_scalars_and_refs() {
        assert_eq!(display_value(&json!("Net 30")), "Net 30");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(
            display_value(&json!({ "url": "https://x", "name": "w9.pdf" })),
            "w9.pdf"
        );
        assert_eq!(display_value(&json!({ "url": "https://x" })), "https://x");
    }
}
