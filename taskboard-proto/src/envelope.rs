//! Response envelopes used by the backend.
//!
//! Successful list/detail responses wrap their payload as
//! `{ "data": ... }`. Failed responses carry either `{ "message": "..." }`
//! or `{ "errors": [{ "message": "..." }, ...] }`.

use serde::{Deserialize, Serialize};

/// Message shown when an error body carries nothing usable.
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// `{ "data": T }` success wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    /// Wrapped payload.
    pub data: T,
}

/// One entry of an `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body of a non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Single-message form.
    #[serde(default)]
    pub message: Option<String>,
    /// Multi-message form.
    #[serde(default)]
    pub errors: Option<Vec<ErrorEntry>>,
}

impl ErrorBody {
    /// Parses an error body, tolerating any JSON (or non-JSON) payload.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// User-facing messages carried by this body.
    ///
    /// `message` takes precedence; otherwise one message per `errors`
    /// entry. Falls back to [`FALLBACK_ERROR_MESSAGE`] when neither form
    /// yields text.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        if let Some(message) = &self.message {
            return vec![message.clone()];
        }
        let listed: Vec<String> = self
            .errors
            .iter()
            .flatten()
            .filter_map(|entry| entry.message.clone())
            .collect();
        if listed.is_empty() {
            vec![FALLBACK_ERROR_MESSAGE.to_string()]
        } else {
            listed
        }
    }
}
