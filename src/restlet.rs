//! ERP RESTlet submission and response interpretation.
//!
//! Exactly one signed POST per run. The response is interpreted as success
//! only when a record identifier is present; every other outcome is a
//! failure that carries the full diagnostic detail forward to the operator.
//! No retries.
use crate::config::{Endpoints, Secrets};
use crate::oauth::{self, SigningCredentials};
use crate::payload::TargetPayload;
use crate::util::truncate_string;
use anyhow::{Context, Result};
use serde_json::Value;
use ureq::Agent;

/// Maximum diagnostic body bytes surfaced on failure.
const DETAIL_LIMIT: usize = 4096;

/// Terminal outcome of the single submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Success {
        record_id: String,
        record_url: String,
    },
    Failure {
        detail: String,
    },
}

/// Submit the payload to the RESTlet endpoint.
///
/// A transport-level failure (connect, timeout) is an error; a response of
/// any status is interpreted into a [`SubmissionResult`] so the body detail
/// reaches the operator.
pub fn submit(
    agent: &Agent,
    endpoints: &Endpoints,
    secrets: &Secrets,
    payload: &TargetPayload,
) -> Result<SubmissionResult> {
    let credentials = SigningCredentials {
        consumer_key: &secrets.consumer_key,
        consumer_secret: &secrets.consumer_secret,
        token_key: &secrets.token_key,
        token_secret: &secrets.token_secret,
        realm: &secrets.account_id,
    };
    let header = oauth::authorization_header(
        "POST",
        &endpoints.restlet_url,
        &credentials,
        &oauth::nonce(),
        oauth::unix_timestamp()?,
    )?;

    tracing::info!("submitting vendor request to RESTlet");
    let mut response = agent
        .post(&endpoints.restlet_url)
        .header("Authorization", &header)
        .send_json(payload)
        .context("post vendor request to RESTlet")?;

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .context("read RESTlet response body")?;

    Ok(interpret_response(endpoints, status, &body))
}

/// Interpret the RESTlet response body.
///
/// Success requires a parseable body with a usable `recordId`; anything
/// else is a failure carrying the parsed-but-incomplete body or the raw
/// text, never silently discarded.
pub fn interpret_response(endpoints: &Endpoints, status: u16, body: &str) -> SubmissionResult {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(error) => {
            return SubmissionResult::Failure {
                detail: format!(
                    "status {status}, unparseable response ({error}): {}",
                    truncate_string(body, DETAIL_LIMIT)
                ),
            };
        }
    };

    match record_id_of(&parsed) {
        Some(record_id) => {
            let record_url = deep_link(endpoints, &record_id);
            SubmissionResult::Success {
                record_id,
                record_url,
            }
        }
        None => SubmissionResult::Failure {
            detail: format!(
                "status {status}, no recordId in response: {}",
                truncate_string(body, DETAIL_LIMIT)
            ),
        },
    }
}

/// Extract a usable record identifier from the response body.
fn record_id_of(value: &Value) -> Option<String> {
    match value.get("recordId") {
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    }
}

/// Build the deep link into the ERP UI for a created record.
pub fn deep_link(endpoints: &Endpoints, record_id: &str) -> String {
    format!(
        "{}/app/common/custom/custrecordentry.nl?rectype={}&id={}",
        endpoints.ui_base, endpoints.record_type_code, record_id
    )
}
