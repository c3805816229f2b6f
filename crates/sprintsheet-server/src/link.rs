//! Export link construction
//!
//! The dashboard hands browsers a link of the form
//! `<webhook>?data=<percent-encoded compact JSON>`; opening it performs the
//! `GET /exec` upsert.

use url::{form_urlencoded, Url};

/// Build the export link for a payload
///
/// The payload is re-encoded compactly and replaces any existing `data`
/// parameter; other query parameters on the webhook are kept.
pub fn export_link(webhook: &Url, payload: &serde_json::Value) -> Result<Url, serde_json::Error> {
    let data = serde_json::to_string(payload)?;
    let mut link = webhook.clone();
    let kept: Vec<(String, String)> = webhook
        .query_pairs()
        .filter(|(k, _)| k != "data")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    link.set_query(None);
    {
        let mut query = link.query_pairs_mut();
        for (k, v) in &kept {
            query.append_pair(k, v);
        }
        query.append_pair("data", &data);
    }
    Ok(link)
}

/// Payload carried by an export link, if any
#[must_use]
pub fn payload_of(link: &Url) -> Option<String> {
    link.query().and_then(data_param)
}

/// First `data` value of a raw query string, percent-decoded
///
/// Later `data` pairs and unknown keys are ignored.
#[must_use]
pub fn data_param(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "data")
        .map(|(_, v)| v.into_owned())
}
