//! End-to-end tests over the pure pipeline: document in, payload out,
//! response interpreted. No network, no terminal.

use serde_json::{json, Value};
use vendor_bridge::config::Endpoints;
use vendor_bridge::files::FileEntry;
use vendor_bridge::mapping::{map_fields, VENDOR_REQUEST_SPEC};
use vendor_bridge::payload::assemble;
use vendor_bridge::restlet::{interpret_response, SubmissionResult};

/// A filled-out vendor request document, as the document API returns it.
fn sample_document() -> vendor_bridge::document::SourceDocument {
    serde_json::from_value(json!({
        "id": "Ab3xK9QmPdR2",
        "fields": [
            { "field_id": "Text1", "value": "Acme Tooling GmbH" },
            { "field_id": "Text1_1_1", "value": "ap@acme-tooling.example" },
            { "field_id": "Text1_1_1_1", "value": "acme-tooling.example" },
            { "field_id": "Text1_1", "value": "Hauptstrasse 12, Berlin" },
            { "field_id": "Dropdown2", "value": "Net 30" },
            { "field_id": "Text3", "value": "USD" },
            { "field_id": "Dropdown1", "value": "Wire" },
            { "field_id": "Text2", "value": "DE-123456789" },
            { "field_id": "Checkbox1", "value": false },
            { "field_id": "Dropdown3", "value": "PandaDoc United States- New Vendor Request Form" },
            { "field_id": "Dropdown4", "value": "Payment terms to be confirmed" },
            { "field_id": "Dropdown5", "value": "Finance" },
            { "field_id": "CollectFile1", "value": { "url": "https://files.example.com/w9.pdf", "name": "w9.pdf" } },
        ]
    }))
    .expect("deserialize sample document")
}

#[test]
fn document_maps_into_a_complete_payload() {
    let doc = sample_document();
    let mapped = map_fields(&doc, &VENDOR_REQUEST_SPEC);
    let files = vec![FileEntry {
        name: "w9.pdf".to_string(),
        content_base64: "JVBERi0xLjQ=".to_string(),
    }];
    let payload = assemble(&Endpoints::default(), mapped, &files);
    let rendered = serde_json::to_value(&payload).expect("serialize payload");

    assert_eq!(rendered["folderid"], json!("367946"));
    assert_eq!(rendered["customrec_type"], json!("customrecord_vendor_request"));

    let fields = &rendered["otherfields"];
    assert_eq!(fields["custrecord_company_name"], json!("Acme Tooling GmbH"));
    assert_eq!(fields["custrecord_vr_email"], json!("ap@acme-tooling.example"));
    // Bare host gained its scheme during assembly.
    assert_eq!(
        fields["custrecord_vr_website"],
        json!("https://acme-tooling.example")
    );
    // Enumerated labels became codes.
    assert_eq!(fields["custrecord_vr_payment_terms"], json!("1"));
    assert_eq!(fields["custrecord1531"], json!("1"));
    assert_eq!(fields["custrecord_vr_pref_pymt_method"], json!("4"));
    assert_eq!(fields["customform"], json!("45"));
    // Free text where a category label was expected: empty, not an error.
    assert_eq!(fields["custrecord_vr_category"], json!(""));
    // Scalars keep their type; overrides hold regardless of the document.
    assert_eq!(fields["custrecord_vr_1099"], json!(false));
    assert_eq!(fields["custrecord_department"], json!("12"));
    assert_eq!(fields["custrecord1553"], json!("N/A"));

    assert_eq!(rendered["filename1"], json!("w9.pdf"));
    assert_eq!(rendered["content1"], json!("JVBERi0xLjQ="));
}

#[test]
fn document_without_files_still_produces_a_payload() {
    let doc: vendor_bridge::document::SourceDocument = serde_json::from_value(json!({
        "id": "doc-2",
        "fields": [ { "field_id": "Text1", "value": "Solo Vendor Ltd" } ]
    }))
    .expect("deserialize document");

    let mapped = map_fields(&doc, &VENDOR_REQUEST_SPEC);
    let payload = assemble(&Endpoints::default(), mapped, &[]);
    let rendered = serde_json::to_value(&payload).expect("serialize payload");

    assert!(rendered.get("filename1").is_none());
    assert!(rendered.get("content1").is_none());
    assert_eq!(
        rendered["otherfields"]["custrecord_company_name"],
        json!("Solo Vendor Ltd")
    );
}

#[test]
fn every_spec_field_missing_yields_empty_values_not_errors() {
    let doc: vendor_bridge::document::SourceDocument =
        serde_json::from_value(json!({ "id": "doc-3", "fields": [] }))
            .expect("deserialize document");

    let mapped = map_fields(&doc, &VENDOR_REQUEST_SPEC);
    for entry in VENDOR_REQUEST_SPEC.entries {
        let value = mapped
            .values
            .get(entry.target_key)
            .unwrap_or_else(|| panic!("missing target key {}", entry.target_key));
        if VENDOR_REQUEST_SPEC
            .overrides
            .iter()
            .any(|(key, _)| *key == entry.target_key)
        {
            continue;
        }
        assert_eq!(value, &Value::String(String::new()));
    }
}

#[test]
fn blank_website_serializes_as_null() {
    let doc: vendor_bridge::document::SourceDocument = serde_json::from_value(json!({
        "id": "doc-4",
        "fields": [ { "field_id": "Text1_1_1_1", "value": "  " } ]
    }))
    .expect("deserialize document");

    let mapped = map_fields(&doc, &VENDOR_REQUEST_SPEC);
    let payload = assemble(&Endpoints::default(), mapped, &[]);
    let rendered = serde_json::to_value(&payload).expect("serialize payload");
    assert_eq!(rendered["otherfields"]["custrecord_vr_website"], Value::Null);
}

#[test]
fn submission_response_with_record_id_reports_success() {
    let endpoints = Endpoints::default();
    match interpret_response(&endpoints, 200, r#"{"recordId": 42}"#) {
        SubmissionResult::Success {
            record_id,
            record_url,
        } => {
            assert_eq!(record_id, "42");
            assert!(record_url.contains("id=42"));
        }
        SubmissionResult::Failure { detail } => panic!("expected success, got {detail}"),
    }
}

#[test]
fn submission_response_without_record_id_reports_failure_with_body() {
    let endpoints = Endpoints::default();
    let body = r#"{"status": "queued", "note": "manual review required"}"#;
    match interpret_response(&endpoints, 200, body) {
        SubmissionResult::Failure { detail } => {
            assert!(detail.contains("manual review required"));
        }
        SubmissionResult::Success { .. } => panic!("expected failure"),
    }
}
