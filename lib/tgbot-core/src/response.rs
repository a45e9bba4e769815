//! Buffered HTTP responses.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

/// What a transport hands back: status line, headers and the whole body.
///
/// Any status is a valid `Response`; deciding that only `200 OK` counts as
/// success is the executor's job.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

impl<B> Response<B> {
    /// Assemble a response. Header names are expected in lowercase.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Headers with a UTF-8 value.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Header value by lowercase name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Drop status and headers.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// `200 OK`, the only status the Bot API answers successful calls with.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Any 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }
}

impl Response<Bytes> {
    /// Decode the body, reporting the JSON path of a mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonDeserialization`](crate::Error::JsonDeserialization)
    /// for malformed JSON or a shape mismatch.
    pub fn json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }

    /// Body as text, invalid UTF-8 replaced by `U+FFFD`.
    #[must_use]
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static [u8]) -> Response {
        let headers = HashMap::from([("content-type".to_string(), "application/json".to_string())]);
        Response::new(status, headers, Bytes::from_static(body))
    }

    #[test]
    fn only_200_is_ok() {
        let ok = response(200, br#"{"ok":true}"#);
        assert!(ok.is_ok());
        assert_eq!(ok.header("content-type"), Some("application/json"));

        let created = response(201, b"");
        assert!(created.is_success());
        assert!(!created.is_ok());

        assert!(!response(404, b"").is_success());
    }

    #[test]
    fn decodes_json_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Chat {
            id: i64,
            #[serde(rename = "type")]
            kind: String,
        }

        let chat: Chat = response(200, br#"{"id":-100,"type":"supergroup"}"#)
            .json()
            .expect("chat");
        assert_eq!(chat.kind, "supergroup");
        assert_eq!(chat.id, -100);
    }

    #[test]
    fn lossy_text() {
        let response = response(502, b"Bad \xFFGateway");
        assert_eq!(response.text_lossy(), "Bad \u{FFFD}Gateway");
        assert_eq!(response.into_body().len(), 12);
    }
}
