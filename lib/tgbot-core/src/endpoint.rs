//! Bot API endpoint URLs.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{Error, Result};

/// Public Bot API server.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

const REDACTED: &str = "***";

/// Base URL and bot token, fixed for the lifetime of a bot session.
///
/// Method URLs have the shape `<base>/bot<token>/<method>`.
/// The token is kept as a [`SecretString`] and only exposed to build
/// method URLs, so `Debug` output never shows it.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base: String,
    token: SecretString,
}

impl Endpoint {
    /// Create an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not an absolute URL, or if the token is
    /// empty or contains characters that would change the URL path.
    ///
    /// # Example
    ///
    /// ```
    /// use tgbot_core::Endpoint;
    ///
    /// let endpoint = Endpoint::new("https://api.telegram.org", "123:abc").expect("endpoint");
    /// let url = endpoint.method_url("getMe").expect("url");
    /// assert_eq!(url.as_str(), "https://api.telegram.org/bot123:abc/getMe");
    /// ```
    pub fn new(base: impl AsRef<str>, token: impl Into<String>) -> Result<Self> {
        Self::with_secret(base, SecretString::from(token.into()))
    }

    /// Create an endpoint from a token that is already secret.
    ///
    /// # Errors
    ///
    /// Same as [`Endpoint::new`].
    pub fn with_secret(base: impl AsRef<str>, token: SecretString) -> Result<Self> {
        let base = Url::parse(base.as_ref())?;
        if base.cannot_be_a_base() {
            return Err(Error::invalid_request(format!("{base} cannot be a base URL")));
        }

        let raw = token.expose_secret();
        if raw.is_empty() || raw.contains(['/', '?', '#']) || raw.contains(char::is_whitespace) {
            return Err(Error::invalid_request("malformed bot token"));
        }

        Ok(Self {
            base: base.as_str().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Endpoint on the public Bot API server.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed.
    pub fn telegram(token: impl Into<String>) -> Result<Self> {
        Self::new(DEFAULT_API_URL, token)
    }

    /// Base URL, without trailing slash.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// URL of a Bot API method.
    ///
    /// # Errors
    ///
    /// Returns an error if the method name is empty or not a single path
    /// segment.
    pub fn method_url(&self, method_name: &str) -> Result<Url> {
        if method_name.is_empty() || method_name.contains(['/', '?', '#']) {
            return Err(Error::invalid_request(format!(
                "invalid method name {method_name:?}"
            )));
        }
        let token = self.token.expose_secret();
        let url = Url::parse(&format!("{}/bot{token}/{method_name}", self.base))?;
        Ok(url)
    }

    /// Render a URL with the bot token masked, for logs and errors.
    ///
    /// The query string is kept. URLs outside this endpoint fall back to
    /// [`redact_url`].
    #[must_use]
    pub fn redact(&self, url: &Url) -> String {
        let prefix = format!("{}/bot", self.base);
        let rest = url
            .as_str()
            .strip_prefix(&prefix)
            .and_then(|tail| tail.find('/').map(|end| &tail[end..]));
        match rest {
            Some(rest) => format!("{prefix}{REDACTED}{rest}"),
            None => redact_url(url),
        }
    }
}

/// Mask a `bot<token>` path segment in any URL.
///
/// Used where the [`Endpoint`] is not at hand, e.g. transport logs. Bot
/// tokens always look like `<id>:<secret>`.
#[must_use]
pub fn redact_url(url: &Url) -> String {
    let text = url.to_string();
    let token_segment = url
        .path_segments()
        .and_then(|mut segments| segments.find(|s| s.starts_with("bot") && s.contains(':')));
    match token_segment {
        Some(segment) => text.replacen(&format!("/{segment}"), &format!("/bot{REDACTED}"), 1),
        None => text,
    }
}
