//! Runtime configuration.
//!
//! Secrets come from the environment at process start and are never written
//! to disk or logged. Endpoint settings carry defaults and can be overridden
//! by an optional JSON file so the same binary serves sandbox and production
//! accounts.
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use ureq::Agent;

/// Environment variable holding the document API token.
pub const DOCUMENT_API_TOKEN_VAR: &str = "PANDADOC_API_TOKEN";
/// Environment variables holding the ERP account and signing credential set.
pub const ACCOUNT_ID_VAR: &str = "NETSUITE_ACCOUNT_ID";
pub const CONSUMER_KEY_VAR: &str = "NETSUITE_CONSUMER_KEY";
pub const CONSUMER_SECRET_VAR: &str = "NETSUITE_CONSUMER_SECRET";
pub const TOKEN_KEY_VAR: &str = "NETSUITE_TOKEN_KEY";
pub const TOKEN_SECRET_VAR: &str = "NETSUITE_TOKEN_SECRET";

/// Secret values supplied externally at process start.
#[derive(Clone)]
pub struct Secrets {
    /// Bearer token for the document API (sent as `API-Key <token>`).
    pub document_api_token: String,
    /// ERP account identifier, also used as the OAuth realm.
    pub account_id: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token_key: String,
    pub token_secret: String,
}

impl Secrets {
    /// Load all required secrets, failing with the variable name (never the
    /// value) when one is missing or blank.
    pub fn from_env() -> Result<Self> {
        Ok(Secrets {
            document_api_token: require_env(DOCUMENT_API_TOKEN_VAR)?,
            account_id: require_env(ACCOUNT_ID_VAR)?,
            consumer_key: require_env(CONSUMER_KEY_VAR)?,
            consumer_secret: require_env(CONSUMER_SECRET_VAR)?,
            token_key: require_env(TOKEN_KEY_VAR)?,
            token_secret: require_env(TOKEN_SECRET_VAR)?,
        })
    }
}

// Secrets must not leak through error chains or debug logging.
impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("document_api_token", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("token_key", &"<redacted>")
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

fn require_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow!("missing required environment variable {key}")),
    }
}

/// Endpoint and routing settings with sandbox-account defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Endpoints {
    /// Document API base URL, without a trailing slash.
    pub document_api_base: String,
    /// Full RESTlet URL including `script` and `deploy` query parameters.
    pub restlet_url: String,
    /// ERP UI base URL used for record deep links.
    pub ui_base: String,
    /// Destination folder for uploaded files.
    pub folder_id: String,
    /// Custom record type created by the RESTlet.
    pub custom_record_type: String,
    /// Numeric record type code used in deep links.
    pub record_type_code: String,
    /// Global timeout applied to every network call.
    pub timeout_secs: u64,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            document_api_base: "https://api.pandadoc.com/public/v1".to_string(),
            restlet_url:
                "https://4454619-sb1.restlets.api.netsuite.com/app/site/hosting/restlet.nl?script=3116&deploy=1"
                    .to_string(),
            ui_base: "https://4454619-sb1.app.netsuite.com".to_string(),
            folder_id: "367946".to_string(),
            custom_record_type: "customrecord_vendor_request".to_string(),
            record_type_code: "435".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Load endpoint settings, applying the optional JSON override file.
pub fn load_endpoints(path: Option<&Path>) -> Result<Endpoints> {
    let endpoints = match path {
        Some(path) => {
            let bytes = fs::read(path)
                .with_context(|| format!("read endpoint config {}", path.display()))?;
            serde_json::from_slice(&bytes).context("parse endpoint config JSON")?
        }
        None => Endpoints::default(),
    };
    validate_endpoints(&endpoints)?;
    Ok(endpoints)
}

/// Validate endpoint settings before any network call is made.
pub fn validate_endpoints(endpoints: &Endpoints) -> Result<()> {
    for (value, label) in [
        (&endpoints.document_api_base, "document_api_base"),
        (&endpoints.restlet_url, "restlet_url"),
        (&endpoints.ui_base, "ui_base"),
        (&endpoints.folder_id, "folder_id"),
        (&endpoints.custom_record_type, "custom_record_type"),
        (&endpoints.record_type_code, "record_type_code"),
    ] {
        if value.trim().is_empty() {
            return Err(anyhow!("{label} must be non-empty"));
        }
    }
    for (value, label) in [
        (&endpoints.document_api_base, "document_api_base"),
        (&endpoints.restlet_url, "restlet_url"),
        (&endpoints.ui_base, "ui_base"),
    ] {
        if !value.starts_with("https://") && !value.starts_with("http://") {
            return Err(anyhow!("{label} must be an http(s) URL (got {value:?})"));
        }
    }
    if endpoints.timeout_secs == 0 {
        return Err(anyhow!("timeout_secs must be greater than zero"));
    }
    Ok(())
}

/// Build the blocking HTTP agent shared by every network call.
///
/// The global timeout bounds a hung remote endpoint; the original tooling
/// had none, which let one unresponsive host stall the whole run.
pub fn http_agent(timeout_secs: u64) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .http_status_as_error(false)
        .build()
        .new_agent()
}
