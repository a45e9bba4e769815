//! Error types for tgbot.
//!
//! Every failure of a Bot API call, whatever the stage it happened at, is
//! reported through the single [`Error`] type.

use derive_more::{Display, Error, From};

use crate::ResponseParameters;

/// Why a Bot API call failed.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The server answered with a status other than `200 OK`.
    #[display("HTTP error {status} for {url}: {body}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Request URL, with the bot token redacted.
        url: String,
        /// Response body text, verbatim.
        body: String,
    },

    /// The envelope came back with `ok: false`.
    #[display("Telegram API error {error_code}: {description}")]
    #[from(skip)]
    Api {
        /// Telegram error code.
        error_code: i64,
        /// Human readable description.
        description: String,
        /// Extra hints attached to the failure.
        #[error(not(source))]
        parameters: Option<ResponseParameters>,
    },

    /// The server could not be reached, or the connection broke.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS handshake or certificate failure.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// The exchange did not finish within the transport deadline.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// I/O failure while reading an attachment or streaming a body.
    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),

    /// A request could not be built (bad token, method name, header).
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// The attachment does not point to a readable regular file.
    #[display("invalid attachment: {_0}")]
    #[from(skip)]
    InvalidAttachment(#[error(not(source))] String),

    /// Parameters could not be encoded as JSON.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// The response body does not decode into the expected envelope.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "result.chat.id").
        path: String,
        /// Error message.
        message: String,
    },

    /// The Bot API server URL does not parse.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result of a tgbot operation.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an HTTP error from the status, URL and body of a response.
    #[must_use]
    pub fn http(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Create an API error from a failed envelope.
    #[must_use]
    pub fn api(
        error_code: i64,
        description: impl Into<String>,
        parameters: Option<ResponseParameters>,
    ) -> Self {
        Self::Api {
            error_code,
            description: description.into(),
            parameters,
        }
    }

    /// Connection failure with a description.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// TLS failure with a description.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Request that could not be built.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Attachment that cannot be uploaded.
    #[must_use]
    pub fn invalid_attachment(message: impl Into<String>) -> Self {
        Self::InvalidAttachment(message.into())
    }

    /// Decode failure at a JSON path such as `result.chat.id`.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The transport deadline expired.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// The server could not be reached.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Status of a non-200 response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `error_code` of an `ok: false` envelope.
    #[must_use]
    pub const fn error_code(&self) -> Option<i64> {
        match self {
            Self::Api { error_code, .. } => Some(*error_code),
            _ => None,
        }
    }

    /// Non-200 response with a 4xx status.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Non-200 response with a 5xx status.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Seconds Telegram asked the caller to wait before retrying, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::Api {
                parameters: Some(parameters),
                ..
            } => parameters.retry_after,
            _ => None,
        }
    }

    /// Body text of a non-200 response, verbatim.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::http(404, "https://api.telegram.org/bot***/getMe", "Not Found");
        assert_eq!(
            err.to_string(),
            "HTTP error 404 for https://api.telegram.org/bot***/getMe: Not Found"
        );

        let err = Error::api(400, "Bad Request: chat not found", None);
        assert_eq!(
            err.to_string(),
            "Telegram API error 400: Bad Request: chat not found"
        );

        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");

        let err = Error::json_deserialization("result.id", "invalid type: string");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'result.id': invalid type: string"
        );
    }

    #[test]
    fn error_status() {
        let err = Error::http(404, "url", "");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = Error::http(502, "url", "Bad Gateway");
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_client_error());
        assert!(err.is_server_error());

        let err = Error::api(400, "Bad Request", None);
        assert_eq!(err.status(), None);
        assert_eq!(err.error_code(), Some(400));
    }

    #[test]
    fn error_body_is_verbatim() {
        let body = "{\"ok\":false,\n \"description\":\"Unauthorized\"}";
        let err = Error::http(401, "url", body);
        assert_eq!(err.body(), Some(body));
        assert!(Error::Timeout.body().is_none());
    }

    #[test]
    fn error_retry_after() {
        let parameters = ResponseParameters {
            migrate_to_chat_id: None,
            retry_after: Some(12),
        };
        let err = Error::api(429, "Too Many Requests: retry after 12", Some(parameters));
        assert_eq!(err.retry_after(), Some(12));
        assert_eq!(Error::api(400, "Bad Request", None).retry_after(), None);
        assert_eq!(Error::Timeout.retry_after(), None);
    }

    #[test]
    fn error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::from(io);
        assert!(matches!(err, Error::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_kind_predicates() {
        assert!(Error::Timeout.is_timeout());
        assert!(!Error::http(404, "url", "").is_timeout());
        assert!(Error::connection("reset").is_connection());
        assert!(!Error::Timeout.is_connection());
    }
}
