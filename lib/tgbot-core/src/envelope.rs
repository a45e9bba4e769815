//! The JSON envelope wrapping every Bot API response.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hints Telegram attaches to some failed calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseParameters {
    /// The group was migrated to a supergroup with this identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
    /// Seconds left to wait before the request can be repeated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// `{ ok, result, description, error_code, parameters }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// The decoded result, present when `ok` is `true`.
    pub result: Option<T>,
    /// Human readable failure description.
    #[serde(default)]
    pub description: Option<String>,
    /// Telegram error code.
    #[serde(default)]
    pub error_code: Option<i64>,
    /// Extra failure hints.
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

impl<T> Envelope<T> {
    /// Unwrap the `result` field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] when `ok` is `false`, and a deserialization
    /// error when a successful envelope carries no `result`.
    pub fn into_result(self) -> Result<T> {
        if !self.ok {
            return Err(Error::api(
                self.error_code.unwrap_or_default(),
                self.description
                    .unwrap_or_else(|| "no description".to_string()),
                self.parameters,
            ));
        }
        self.result
            .ok_or_else(|| Error::json_deserialization("result", "missing field `result`"))
    }
}
