//! Request bodies and JSON (de)serialization utilities.

use std::fmt;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use futures_util::StreamExt;

use crate::Result;

/// `Content-Type` values the client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `application/json`, for POST calls.
    Json,
    /// Plain text content type, as sent for multipart text fields.
    PlainText,
    /// `application/octet-stream`, for files of unknown type.
    OctetStream,
}

impl ContentType {
    /// Header value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::PlainText => "text/plain; charset=UTF-8",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A body streamed chunk by chunk while the request is in flight.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Request body.
#[derive(Default)]
pub enum Body {
    /// No body at all.
    #[default]
    Empty,
    /// Fully buffered body.
    Full(Bytes),
    /// Streamed body, used for multipart uploads.
    Stream(BodyStream),
}

impl Body {
    /// Wrap a stream of chunks.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self::Stream(Box::pin(stream))
    }

    /// Returns `true` for [`Body::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Buffered bytes, if the body is not streamed.
    #[must_use]
    pub const fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Full(bytes) => Some(bytes),
            Self::Empty | Self::Stream(_) => None,
        }
    }

    /// Drain the body into memory.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by a streamed body.
    pub async fn collect(self) -> Result<Bytes> {
        match self {
            Self::Empty => Ok(Bytes::new()),
            Self::Full(bytes) => Ok(bytes),
            Self::Stream(mut stream) => {
                let mut collected = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    collected.extend_from_slice(&chunk?);
                }
                Ok(collected.freeze())
            }
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Body::Empty"),
            Self::Full(bytes) => f.debug_tuple("Body::Full").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Body::Stream(..)"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::Full(bytes)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Full(Bytes::from(text))
    }
}

impl From<Vec<u8>> for Body {
    fn from(data: Vec<u8>) -> Self {
        Self::Full(Bytes::from(data))
    }
}

/// Encode a value as a JSON body.
///
/// # Errors
///
/// Returns [`Error::JsonSerialization`](crate::Error::JsonSerialization)
/// if `value` has no JSON form, e.g. a map with non-string keys.
///
/// # Example
///
/// ```
/// use tgbot_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Chat { chat_id: i64 }
///
/// let bytes = to_json(&Chat { chat_id: 42 }).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"chat_id":42}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

/// Decode a JSON body.
///
/// # Errors
///
/// Returns [`Error::JsonDeserialization`](crate::Error::JsonDeserialization)
/// naming the path of the field that failed, e.g. `result.chat.id`.
///
/// # Example
///
/// ```
/// use tgbot_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Chat { id: i64 }
///
/// let chat: Chat = from_json(br#"{"id":42}"#).expect("deserialize");
/// assert_eq!(chat, Chat { id: 42 });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|err| {
            crate::Error::json_deserialization(err.path().to_string(), err.inner().to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_strings() {
        assert_eq!(ContentType::Json.as_str(), "application/json");
        assert_eq!(ContentType::PlainText.to_string(), "text/plain; charset=UTF-8");
        assert_eq!(
            ContentType::OctetStream.as_str(),
            "application/octet-stream"
        );
    }

    #[test]
    fn from_json_reports_path() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Outer {
            result: Inner,
        }
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Inner {
            id: i64,
        }

        let err = from_json::<Outer>(br#"{"result":{"id":"nope"}}"#).expect_err("bad type");
        let crate::Error::JsonDeserialization { path, .. } = err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(path, "result.id");
    }

    #[test]
    fn from_json_rejects_malformed() {
        let err = from_json::<serde_json::Value>(b"{not json").expect_err("malformed");
        assert!(matches!(err, crate::Error::JsonDeserialization { .. }));
    }

    #[tokio::test]
    async fn collect_stream_body() {
        let chunks = vec![Ok(Bytes::from("hello ")), Ok(Bytes::from("world"))];
        let body = Body::stream(futures_util::stream::iter(chunks));
        assert!(body.as_bytes().is_none());

        let bytes = body.collect().await.expect("collect");
        assert_eq!(bytes.as_ref(), b"hello world");
    }

    #[tokio::test]
    async fn collect_stream_body_propagates_error() {
        let chunks = vec![
            Ok(Bytes::from("partial")),
            Err(crate::Error::connection("reset")),
        ];
        let body = Body::stream(futures_util::stream::iter(chunks));

        let err = body.collect().await.expect_err("stream error");
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn collect_buffered_bodies() {
        assert!(Body::Empty.collect().await.expect("empty").is_empty());
        let body = Body::from(String::from("{}"));
        assert_eq!(body.as_bytes().map(Bytes::as_ref), Some(b"{}".as_slice()));
    }
}
