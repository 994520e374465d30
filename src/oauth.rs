//! OAuth 1.0a request signing with HMAC-SHA256.
//!
//! The ERP's scripted endpoint authenticates with token-based credentials:
//! every request carries an `Authorization: OAuth ...` header whose signature
//! covers the HTTP method, the base URL, and the normalized query plus
//! `oauth_*` parameters (RFC 5849). The JSON body is not part of the
//! signature. Nonce and timestamp are injected by the caller so signing
//! stays deterministic under test.
use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// RFC 3986 unreserved characters pass through; everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const SIGNATURE_METHOD: &str = "HMAC-SHA256";
const OAUTH_VERSION: &str = "1.0";

/// The four-part signing credential set plus the account realm.
#[derive(Clone, Copy)]
pub struct SigningCredentials<'a> {
    pub consumer_key: &'a str,
    pub consumer_secret: &'a str,
    pub token_key: &'a str,
    pub token_secret: &'a str,
    pub realm: &'a str,
}

/// Generate a fresh request nonce.
pub fn nonce() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Current unix timestamp in seconds.
pub fn unix_timestamp() -> Result<u64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the unix epoch")?;
    Ok(elapsed.as_secs())
}

/// Build the `Authorization` header value for one signed request.
pub fn authorization_header(
    method: &str,
    url: &str,
    credentials: &SigningCredentials<'_>,
    nonce: &str,
    timestamp: u64,
) -> Result<String> {
    let timestamp = timestamp.to_string();
    let oauth_params: [(&str, &str); 6] = [
        ("oauth_consumer_key", credentials.consumer_key),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", SIGNATURE_METHOD),
        ("oauth_timestamp", timestamp.as_str()),
        ("oauth_token", credentials.token_key),
        ("oauth_version", OAUTH_VERSION),
    ];

    let base_string = signature_base_string(method, url, &oauth_params);
    let signature = sign(&base_string, credentials)?;

    let mut header = format!("OAuth realm=\"{}\"", credentials.realm);
    for (key, value) in oauth_params {
        header.push_str(&format!(", {key}=\"{}\"", encode(value)));
    }
    header.push_str(&format!(", oauth_signature=\"{}\"", encode(&signature)));
    Ok(header)
}

/// Percent-encode one parameter key or value.
fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, OAUTH_ENCODE_SET).to_string()
}

/// Split a request URL into its signature base URL and query parameters.
fn split_url(url: &str) -> (&str, Vec<(&str, &str)>) {
    let (base, query) = match url.split_once('?') {
        Some((base, query)) => (base, query),
        None => (url, ""),
    };
    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect();
    (base, params)
}

/// Assemble the RFC 5849 signature base string.
fn signature_base_string(method: &str, url: &str, oauth_params: &[(&str, &str)]) -> String {
    let (base_url, query_params) = split_url(url);

    let mut pairs: Vec<(String, String)> = query_params
        .iter()
        .chain(oauth_params.iter())
        .map(|(key, value)| (encode(key), encode(value)))
        .collect();
    pairs.sort();

    let param_string = pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(base_url),
        encode(&param_string)
    )
}

/// HMAC-SHA256 over the base string, base64-encoded.
fn sign(base_string: &str, credentials: &SigningCredentials<'_>) -> Result<String> {
    let key = format!(
        "{}&{}",
        encode(credentials.consumer_secret),
        encode(credentials.token_secret)
    );
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|_| anyhow!("initialize request signing key"))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
