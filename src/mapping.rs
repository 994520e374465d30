//! Static enumeration tables, the field-mapping spec, and the pure mapper.
//!
//! Mapping is a pure transform with no I/O: source fields in, target field
//! values plus a human-review projection out. Document authors may type free
//! text where a controlled option was expected, so an unrecognized label
//! resolves to an empty value instead of failing the batch; the preview makes
//! that substitution visible.
use crate::document::{display_value, SourceDocument};
use serde_json::Value;
use std::collections::BTreeMap;

/// Enumeration tables, each scoped to exactly one target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enumeration {
    PaymentTerms,
    Currency,
    PaymentMethod,
    Department,
    CustomForm,
    Category,
}

impl Enumeration {
    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Enumeration::PaymentTerms => &[("Net 15", "1"), ("Net 30", "1")],
            Enumeration::Currency => &[("UAH", "6"), ("PLN", "7"), ("USD", "1")],
            Enumeration::PaymentMethod => &[("ACH", "1"), ("Wire", "4")],
            Enumeration::Department => &[
                ("Finance", "3"),
                ("Operations", "7"),
                ("Procurement", "12"),
            ],
            Enumeration::CustomForm => {
                &[("PandaDoc United States- New Vendor Request Form", "45")]
            }
            Enumeration::Category => &[("Goods", "1"), ("Services", "2"), ("Contractor", "3")],
        }
    }

    /// Resolve a label to its target code; unknown labels yield `None`,
    /// never an error.
    pub fn code_for(self, label: &str) -> Option<&'static str> {
        self.table()
            .iter()
            .find(|(candidate, _)| *candidate == label)
            .map(|(_, code)| *code)
    }
}

/// One entry of the mapping spec: source field, target key, and the
/// enumeration table that applies, if any.
#[derive(Debug, Clone, Copy)]
pub struct SpecEntry {
    pub source_id: &'static str,
    pub target_key: &'static str,
    pub enumeration: Option<Enumeration>,
}

/// The static, ordered mapping configuration. Overrides are applied
/// unconditionally after the per-field loop and win over any mapped value
/// for the same key.
#[derive(Debug, Clone, Copy)]
pub struct MappingSpec {
    pub entries: &'static [SpecEntry],
    pub overrides: &'static [(&'static str, &'static str)],
}

/// Target field key receiving the website URL; the assembler canonicalizes it.
pub const WEBSITE_KEY: &str = "custrecord_vr_website";

const VENDOR_REQUEST_ENTRIES: &[SpecEntry] = &[
    SpecEntry {
        source_id: "Text1",
        target_key: "custrecord_company_name",
        enumeration: None,
    },
    SpecEntry {
        source_id: "Text1_1_1",
        target_key: "custrecord_vr_email",
        enumeration: None,
    },
    SpecEntry {
        source_id: "Text1_1_1_1",
        target_key: WEBSITE_KEY,
        enumeration: None,
    },
    SpecEntry {
        source_id: "Text1_1",
        target_key: "custrecord1524",
        enumeration: None,
    },
    SpecEntry {
        source_id: "Dropdown2",
        target_key: "custrecord_vr_payment_terms",
        enumeration: Some(Enumeration::PaymentTerms),
    },
    SpecEntry {
        source_id: "Text3",
        target_key: "custrecord1531",
        enumeration: Some(Enumeration::Currency),
    },
    SpecEntry {
        source_id: "Dropdown1",
        target_key: "custrecord_vr_pref_pymt_method",
        enumeration: Some(Enumeration::PaymentMethod),
    },
    SpecEntry {
        source_id: "Text2",
        target_key: "custrecord_vr_tax_id",
        enumeration: None,
    },
    SpecEntry {
        source_id: "Checkbox1",
        target_key: "custrecord_vr_1099",
        enumeration: None,
    },
    SpecEntry {
        source_id: "Dropdown3",
        target_key: "customform",
        enumeration: Some(Enumeration::CustomForm),
    },
    SpecEntry {
        source_id: "Dropdown4",
        target_key: "custrecord_vr_category",
        enumeration: Some(Enumeration::Category),
    },
    SpecEntry {
        source_id: "Dropdown5",
        target_key: "custrecord_department",
        enumeration: Some(Enumeration::Department),
    },
];

// The requesting side routes every vendor request to one department, and the
// legacy notes field is unused; both are pinned regardless of what the
// document says.
const VENDOR_REQUEST_OVERRIDES: &[(&str, &str)] =
    &[("custrecord_department", "12"), ("custrecord1553", "N/A")];

/// The vendor request mapping spec.
pub const VENDOR_REQUEST_SPEC: MappingSpec = MappingSpec {
    entries: VENDOR_REQUEST_ENTRIES,
    overrides: VENDOR_REQUEST_OVERRIDES,
};

/// Mapper output: target field values plus the preview projection.
#[derive(Debug, Clone)]
pub struct MappedFields {
    /// Target field key to final value, overrides already applied.
    pub values: BTreeMap<String, Value>,
    /// One row per spec entry, in spec order, for human review only.
    pub preview: Vec<PreviewRow>,
}

/// Raw and mapped view of one spec entry for the preview table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    pub source_id: String,
    pub target_key: String,
    /// Rendered source value; `None` when the field is absent.
    pub raw: Option<String>,
    /// Rendered value as it will be submitted; `None` when empty.
    pub mapped: Option<String>,
}

/// Map source fields into target field values.
///
/// Missing fields and unrecognized enumeration labels both resolve to an
/// explicit empty value; nothing in this loop can fail the run.
pub fn map_fields(document: &SourceDocument, spec: &MappingSpec) -> MappedFields {
    let mut values = BTreeMap::new();
    let mut preview = Vec::with_capacity(spec.entries.len());

    for entry in spec.entries {
        let raw = document.value_of(entry.source_id);
        let mapped = match (raw, entry.enumeration) {
            (None, _) => Value::String(String::new()),
            (Some(value), Some(enumeration)) => {
                let label = display_value(value);
                let code = enumeration.code_for(&label).unwrap_or_default();
                if code.is_empty() && !label.is_empty() {
                    tracing::debug!(
                        source_id = entry.source_id,
                        label = %label,
                        "unrecognized enumeration label, mapped to empty"
                    );
                }
                Value::String(code.to_string())
            }
            (Some(value), None) => value.clone(),
        };
        values.insert(entry.target_key.to_string(), mapped);
        preview.push(PreviewRow {
            source_id: entry.source_id.to_string(),
            target_key: entry.target_key.to_string(),
            raw: raw.map(display_value),
            mapped: None, // filled in below, once overrides are known
        });
    }

    for (key, value) in spec.overrides {
        values.insert((*key).to_string(), Value::String((*value).to_string()));
    }

    for row in &mut preview {
        row.mapped = values
            .get(&row.target_key)
            .map(display_value)
            .filter(|rendered| !rendered.is_empty());
    }

    MappedFields { values, preview }
}
