use std::time::Duration;

use serde_json::Value;

use crate::types::{FetchError, FetchResult};

//the service answers quickly or not at all
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/*
 * Compose the query URL: {base}/?from={FROM}&to={TO}[&date={DATE}].
 * Trailing slashes on the base are collapsed; a missing date means
 * "latest" on the service side. Inputs arrive already normalized, so the
 * printed URL is byte for byte the requested one.
 */
pub fn build_url(base_url: &str, from: &str, to: &str, date: Option<&str>) -> String {
    let mut url = format!(
        "{}/?from={}&to={}",
        base_url.trim_end_matches('/'),
        from,
        to
    );
    if let Some(date) = date {
        url.push_str("&date=");
        url.push_str(date);
    }
    url
}

/*
 * Interpret the service's envelope: {"error": "...", "data": {...}}.
 * An empty, missing or null error field means success and the whole
 * envelope is handed back untouched for persistence; a non-empty error
 * string is a service-reported failure; anything else is a malformed
 * envelope.
 */
pub fn parse_envelope(body: &str) -> FetchResult<Value> {
    let payload: Value = serde_json::from_str(body)
        .map_err(|_| FetchError::Protocol("Invalid JSON response from service.".to_string()))?;
    if !payload.is_object() {
        return Err(FetchError::Protocol(
            "Unexpected payload structure.".to_string(),
        ));
    }
    let service_error = match payload.get("error") {
        None | Some(Value::Null) => None,
        Some(Value::String(message)) if message.is_empty() => None,
        Some(Value::String(message)) => Some(FetchError::Service(message.clone())),
        Some(_) => Some(FetchError::Protocol(
            "Unexpected payload structure.".to_string(),
        )),
    };
    if let Some(err) = service_error {
        return Err(err);
    }
    Ok(payload)
}

/*
 * One blocking round trip. The API key travels as the form field "key"
 * while the query itself stays in the URL; that split is the service's
 * fixed contract. No retries, a failure is terminal for this query.
 */
pub fn call_service(url: &str, api_key: &str) -> FetchResult<Value> {
    let client = reqwest::blocking::ClientBuilder::new()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| FetchError::Network(e.to_string()))?;
    let response = client
        .post(url)
        .form(&[("key", api_key)])
        .send()
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|e| FetchError::Network(e.to_string()))?;
    if status.is_client_error() || status.is_server_error() {
        let details = body.trim();
        return Err(FetchError::Http {
            status: status.as_u16(),
            details: if details.is_empty() {
                "No details.".to_string()
            } else {
                details.to_string()
            },
        });
    }

    parse_envelope(&body)
}
