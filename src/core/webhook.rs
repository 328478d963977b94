//! Webhook URL construction and delivery.
//!
//! The raw token only ever appears in the URL sent over the wire. Every URL
//! surfaced for display carries a character-masked stand-in instead, so the
//! token's length stays visible in logs but its value does not.

use reqwest::blocking::Client;
use serde_json::{json, Value};
use url::Url;

use crate::error::{Error, ErrorCode, Result};
use crate::inputs::TriggerInputs;

/// Query parameter Concourse reads the resource token from.
pub const WEBHOOK_TOKEN_PARAM: &str = "webhook_token";

const MASK_CHAR: char = '*';

fn delivery_error(e: reqwest::Error) -> Error {
    Error::new(
        ErrorCode::WebhookDeliveryFailed,
        format!("Webhook request failed: {}", e),
        json!({ "error": e.to_string() }),
    )
}

fn rejected_error(status: u16, body: &str) -> Error {
    Error::new(
        ErrorCode::WebhookRejected,
        format!("Webhook rejected: HTTP {}", status),
        json!({ "status": status, "body": body }),
    )
}

/// Builds the resource check URL for the configured pipeline coordinates.
///
/// The base URL's path is replaced with the fixed
/// `/api/v1/teams/{team}/pipelines/{pipeline}/resources/{resource}/check/webhook`
/// template and each pipeline variable is appended as a query parameter.
/// Deterministic, and the webhook token is never part of the result.
pub fn build_webhook_url(inputs: &TriggerInputs) -> Result<Url> {
    let mut url = Url::parse(&inputs.concourse_url)
        .map_err(|e| Error::input_invalid_url(&inputs.concourse_url, e.to_string()))?;

    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            Error::input_invalid_url(&inputs.concourse_url, "URL cannot carry a path")
        })?;
        segments.clear();
        segments.extend([
            "api",
            "v1",
            "teams",
            inputs.team.as_str(),
            "pipelines",
            inputs.pipeline.as_str(),
            "resources",
            inputs.resource.as_str(),
            "check",
            "webhook",
        ]);
    }

    for (key, value) in &inputs.pipeline_variables {
        url.query_pairs_mut()
            .append_pair(key, &variable_to_string(value));
    }

    Ok(url)
}

/// The URL actually posted: the check URL plus the raw token.
pub fn delivery_url(url: &Url, webhook_token: &str) -> Url {
    append_token(url, webhook_token)
}

/// Display form of the delivery URL. The token parameter is present but every
/// character is masked.
pub fn redacted_url(url: &Url, webhook_token: &str) -> Url {
    let mask: String = webhook_token.chars().map(|_| MASK_CHAR).collect();
    append_token(url, &mask)
}

fn append_token(url: &Url, token: &str) -> Url {
    let mut with_token = url.clone();
    with_token
        .query_pairs_mut()
        .append_pair(WEBHOOK_TOKEN_PARAM, token);
    with_token
}

fn variable_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => value.to_string(),
    }
}

/// Sends the single resource check POST.
///
/// Returns the HTTP status on success. Transport failures and non-2xx
/// responses are both terminal; there is no retry.
pub fn trigger(url: &Url, webhook_token: &str) -> Result<u16> {
    log_status!(
        "webhook",
        "Sending POST request to {}",
        redacted_url(url, webhook_token)
    );

    let response = Client::new()
        .post(delivery_url(url, webhook_token))
        .send()
        .map_err(delivery_error)?;

    let status = response.status();
    let body = response.text().map_err(delivery_error)?;

    if !status.is_success() {
        return Err(rejected_error(status.as_u16(), &body));
    }

    log_status!("webhook", "Webhook triggered successfully");
    Ok(status.as_u16())
}
